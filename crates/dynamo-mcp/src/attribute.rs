//! Conversion between plain JSON values and DynamoDB attribute values.
//!
//! Outbound, JSON maps onto the attribute types one to one:
//!
//! | JSON    | AttributeValue |
//! |---------|----------------|
//! | string  | `S`            |
//! | number  | `N`            |
//! | boolean | `BOOL`         |
//! | null    | `NULL`         |
//! | array   | `L`            |
//! | object  | `M`            |
//!
//! Inbound additionally handles the types JSON has no native form for:
//! binary values become base64 text and sets become arrays.

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// An item or key in attribute-value form.
pub type Item = HashMap<String, AttributeValue>;

/// Convert a JSON value to an attribute value.
pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute_value).collect()),
        Value::Object(map) => AttributeValue::M(to_item(map)),
    }
}

/// Convert a JSON object to an item, key, or placeholder-value map.
pub fn to_item(map: &Map<String, Value>) -> Item {
    map.iter()
        .map(|(name, value)| (name.clone(), to_attribute_value(value)))
        .collect()
}

/// Convert an attribute value to plain JSON.
pub fn from_attribute_value(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_value(n),
        AttributeValue::B(blob) => binary_value(blob),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Ss(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(items) => Value::Array(items.iter().map(|n| number_value(n)).collect()),
        AttributeValue::Bs(items) => Value::Array(items.iter().map(binary_value).collect()),
        AttributeValue::L(items) => Value::Array(items.iter().map(from_attribute_value).collect()),
        AttributeValue::M(map) => from_item(map),
        _ => Value::Null,
    }
}

/// Convert an item to a JSON object.
pub fn from_item(item: &Item) -> Value {
    Value::Object(
        item.iter()
            .map(|(name, value)| (name.clone(), from_attribute_value(value)))
            .collect(),
    )
}

/// Convert a list of items to a JSON array.
pub fn from_items(items: &[Item]) -> Value {
    Value::Array(items.iter().map(from_item).collect())
}

/// Parse DynamoDB number text. Falls back to the raw string when the value
/// does not fit a JSON number (e.g. 38-digit decimals).
fn number_value(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(u) = text.parse::<u64>() {
        return Value::Number(u.into());
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

fn binary_value(blob: &Blob) -> Value {
    Value::String(STANDARD.encode(blob.as_ref()))
}
