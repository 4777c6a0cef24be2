//! Item tests.
//!
//! Tests the item tools against the in-memory table:
//! - put_item / get_item round trip, absent items
//! - update_item with placeholders, return values and conditions
//! - query_table / scan_table counts, filters and pagination

use super::common::*;
use dynamo_mcp::GatewayErrorKind;
use serde_json::{Value, json};

async fn seed_users(ctx: &TestContext) {
    ctx.create_users_table().await;
    for (id, team, age) in [("1", "red", 30), ("2", "blue", 41), ("3", "red", 25), ("4", "blue", 37)] {
        let result = ctx
            .call(
                "put_item",
                json!({
                    "tableName": "Users",
                    "item": {"userId": id, "team": team, "age": age}
                }),
            )
            .await;
        assert_success(&result, "seed put_item");
    }
}

pub async fn test_put_then_get_round_trip() {
    println!("  🧪 test_put_then_get_round_trip");

    let ctx = TestContext::new();
    ctx.create_users_table().await;

    let item = json!({
        "userId": "123",
        "name": "Ada",
        "age": 36,
        "score": 99.5,
        "active": true,
        "nickname": null,
        "tags": ["admin", "ops"],
        "address": {"city": "London", "zip": "N1"}
    });
    let put = ctx
        .call("put_item", json!({"tableName": "Users", "item": item.clone()}))
        .await;
    assert_success(&put, "put_item");

    let get = ctx
        .call("get_item", json!({"tableName": "Users", "key": {"userId": "123"}}))
        .await;
    assert_success(&get, "get_item");
    assert_eq!(get.payload["item"], item);

    println!("     ✓ Item read back structurally equal");
}

pub async fn test_get_absent_item() {
    println!("  🧪 test_get_absent_item");

    let ctx = TestContext::new();
    ctx.create_users_table().await;

    let result = ctx
        .call("get_item", json!({"tableName": "Users", "key": {"userId": "123"}}))
        .await;
    assert_success(&result, "absent item is not an error");
    assert_eq!(result.payload["item"], Value::Null);

    let text = result.to_json_text();
    let wire: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(wire["item"], Value::Null);
    assert!(wire.as_object().unwrap().contains_key("item"));

    println!("     ✓ Absent item returns item: null");
}

pub async fn test_missing_key_never_calls_service() {
    println!("  🧪 test_missing_key_never_calls_service");

    let ctx = TestContext::new();
    let result = ctx.call("get_item", json!({"tableName": "Users"})).await;
    assert_failure(&result, "missing key");
    assert_eq!(result.error_kind, Some(GatewayErrorKind::Validation));
    assert!(result.message.contains("'key'"));

    let result = ctx.call("put_item", json!({"tableName": "Users", "item": "x"})).await;
    assert_failure(&result, "item must be an object");
    assert!(result.message.contains("must be object"));

    let result = ctx.call("scan_table", json!(["Users"])).await;
    assert_failure(&result, "array arguments");
    assert_eq!(result.error_kind, Some(GatewayErrorKind::Validation));

    assert!(ctx.backend.calls().is_empty());

    println!("     ✓ Validation failures stop before the service");
}

pub async fn test_update_item() {
    println!("  🧪 test_update_item");

    let ctx = TestContext::new();
    seed_users(&ctx).await;

    let silent = ctx
        .call(
            "update_item",
            json!({
                "tableName": "Users",
                "key": {"userId": "1"},
                "updateExpression": "SET #n = :n",
                "expressionAttributeNames": {"#n": "name"},
                "expressionAttributeValues": {":n": "Ada"}
            }),
        )
        .await;
    assert_success(&silent, "update_item");
    assert!(!silent.payload.contains_key("attributes"));

    let loud = ctx
        .call(
            "update_item",
            json!({
                "tableName": "Users",
                "key": {"userId": "1"},
                "updateExpression": "SET #a = :a",
                "expressionAttributeNames": {"#a": "age"},
                "expressionAttributeValues": {":a": 31},
                "returnValues": "ALL_NEW"
            }),
        )
        .await;
    assert_success(&loud, "update_item ALL_NEW");
    assert_eq!(
        loud.payload["attributes"],
        json!({"userId": "1", "team": "red", "age": 31, "name": "Ada"})
    );

    println!("     ✓ Update applied; attributes only when requested");
}

pub async fn test_conditional_update_failure() {
    println!("  🧪 test_conditional_update_failure");

    let ctx = TestContext::new();
    seed_users(&ctx).await;

    let result = ctx
        .call(
            "update_item",
            json!({
                "tableName": "Users",
                "key": {"userId": "2"},
                "updateExpression": "SET team = :new",
                "conditionExpression": "team = :expected",
                "expressionAttributeNames": {},
                "expressionAttributeValues": {":new": "green", ":expected": "red"}
            }),
        )
        .await;
    assert_failure(&result, "condition not met");
    assert_eq!(result.error_code.as_deref(), Some("ConditionalCheckFailedException"));
    assert!(result.message.starts_with("Error updating item: "));

    let unchanged = ctx
        .call("get_item", json!({"tableName": "Users", "key": {"userId": "2"}}))
        .await;
    assert_eq!(unchanged.payload["item"]["team"], "blue");

    println!("     ✓ Conditional check failure passed through");
}

pub async fn test_query_counts() {
    println!("  🧪 test_query_counts");

    let ctx = TestContext::new();
    seed_users(&ctx).await;

    let result = ctx
        .call(
            "query_table",
            json!({
                "tableName": "Users",
                "keyConditionExpression": "userId = :id",
                "expressionAttributeValues": {":id": "3"}
            }),
        )
        .await;
    assert_success(&result, "query_table");
    assert_eq!(result.payload["count"], 1);
    assert_eq!(result.payload["scannedCount"], 1);
    assert_eq!(result.payload["items"][0]["age"], 25);

    let filtered = ctx
        .call(
            "query_table",
            json!({
                "tableName": "Users",
                "keyConditionExpression": "userId = :id",
                "filterExpression": "team = :team",
                "expressionAttributeValues": {":id": "3", ":team": "blue"}
            }),
        )
        .await;
    assert_success(&filtered, "filtered query");
    assert_eq!(filtered.payload["count"], 0);
    assert_eq!(filtered.payload["scannedCount"], 1);
    assert_eq!(filtered.payload["items"], json!([]));

    println!("     ✓ count matches items, scannedCount >= count");
}

pub async fn test_scan_with_filter_and_pages() {
    println!("  🧪 test_scan_with_filter_and_pages");

    let ctx = TestContext::new();
    seed_users(&ctx).await;

    let filtered = ctx
        .call(
            "scan_table",
            json!({
                "tableName": "Users",
                "filterExpression": "#t = :team",
                "expressionAttributeNames": {"#t": "team"},
                "expressionAttributeValues": {":team": "red"}
            }),
        )
        .await;
    assert_success(&filtered, "filtered scan");
    let count = filtered.payload["count"].as_u64().unwrap();
    let scanned = filtered.payload["scannedCount"].as_u64().unwrap();
    assert_eq!(count, 2);
    assert_eq!(count as usize, filtered.payload["items"].as_array().unwrap().len());
    assert_eq!(scanned, 4);

    let first = ctx
        .call("scan_table", json!({"tableName": "Users", "limit": 3}))
        .await;
    assert_success(&first, "first page");
    assert_eq!(first.payload["count"], 3);
    let start = first.payload["lastEvaluatedKey"].clone();
    assert_eq!(start, json!({"userId": "3"}));

    let second = ctx
        .call(
            "scan_table",
            json!({"tableName": "Users", "limit": 3, "exclusiveStartKey": start}),
        )
        .await;
    assert_success(&second, "second page");
    assert_eq!(second.payload["items"], json!([{"userId": "4", "team": "blue", "age": 37}]));
    assert!(!second.payload.contains_key("lastEvaluatedKey"));

    println!("     ✓ Filters and pagination reported faithfully");
}

pub async fn test_fractional_limit_rejected() {
    println!("  🧪 test_fractional_limit_rejected");

    let ctx = TestContext::new();
    let result = ctx
        .call("scan_table", json!({"tableName": "Users", "limit": 1.5}))
        .await;
    assert_failure(&result, "fractional limit");
    assert_eq!(result.error_kind, Some(GatewayErrorKind::InvalidRequest));
    assert!(ctx.backend.calls().is_empty());

    println!("     ✓ Non-integer limit rejected locally");
}

pub async fn run_all_tests() {
    println!("\n📦 Running Item Tests\n");

    test_put_then_get_round_trip().await;
    test_get_absent_item().await;
    test_missing_key_never_calls_service().await;
    test_update_item().await;
    test_conditional_update_failure().await;
    test_query_counts().await;
    test_scan_with_filter_and_pages().await;
    test_fractional_limit_rejected().await;

    println!("\n✅ All item tests passed!\n");
}
