//! Shared test infrastructure for the DynamoDB MCP end-to-end tests.
//!
//! This module provides:
//! - An in-memory DynamoDB stand-in (`FakeDynamo`) that records every call
//! - Test context wiring a dispatcher and server to the fake
//! - Helper functions for test assertions

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::create_table::{CreateTableInput, CreateTableOutput};
use aws_sdk_dynamodb::operation::describe_table::{DescribeTableInput, DescribeTableOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::list_tables::{ListTablesInput, ListTablesOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanInput, ScanOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use aws_sdk_dynamodb::operation::update_table::{UpdateTableInput, UpdateTableOutput};
use aws_sdk_dynamodb::types::{
    AttributeValue, GlobalSecondaryIndexDescription, IndexStatus, KeySchemaElement, KeyType,
    LocalSecondaryIndexDescription, ProvisionedThroughput, ProvisionedThroughputDescription,
    ReturnValue, TableDescription, TableStatus,
};
use dynamo_core::McpConfig;
use dynamo_mcp::attribute::Item;
use dynamo_mcp::{Dispatcher, McpServer, ResultEnvelope, ServiceError};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

// =============================================================================
// IN-MEMORY DYNAMODB
// =============================================================================

#[derive(Debug, Clone)]
struct FakeTable {
    description: TableDescription,
    items: Vec<Item>,
}

impl FakeTable {
    fn key_names(&self) -> Vec<String> {
        self.description
            .key_schema()
            .iter()
            .map(|k| k.attribute_name().to_string())
            .collect()
    }

    fn key_of(&self, item: &Item) -> Item {
        self.key_names()
            .into_iter()
            .filter_map(|name| item.get(&name).map(|v| (name, v.clone())))
            .collect()
    }

    fn position(&self, key: &Item) -> Option<usize> {
        self.items.iter().position(|item| &self.key_of(item) == key)
    }

    fn refresh_count(&mut self) {
        self.description.item_count = Some(self.items.len() as i64);
    }
}

#[derive(Default)]
struct FakeState {
    tables: BTreeMap<String, FakeTable>,
    calls: Vec<&'static str>,
}

/// In-memory DynamoDB with just enough expression support for the tests:
/// equality conditions joined by `AND`, and `SET a = :v` updates.
#[derive(Default)]
pub struct FakeDynamo {
    state: Mutex<FakeState>,
}

fn not_found(table: &str) -> ServiceError {
    ServiceError::new(
        Some("ResourceNotFoundException"),
        format!(
            "ResourceNotFoundException: Requested resource not found: Table: {} not found",
            table
        ),
    )
}

fn validation_exception(message: impl std::fmt::Display) -> ServiceError {
    ServiceError::new(
        Some("ValidationException"),
        format!("ValidationException: {}", message),
    )
}

fn throughput_description(tp: Option<&ProvisionedThroughput>) -> Option<ProvisionedThroughputDescription> {
    tp.map(|tp| {
        ProvisionedThroughputDescription::builder()
            .read_capacity_units(tp.read_capacity_units())
            .write_capacity_units(tp.write_capacity_units())
            .build()
    })
}

/// Resolve `#name` and `:value` placeholders in a single `a = b` clause.
fn equality(
    clause: &str,
    names: Option<&HashMap<String, String>>,
    values: Option<&Item>,
) -> Result<(String, AttributeValue), ServiceError> {
    let (lhs, rhs) = clause
        .split_once('=')
        .ok_or_else(|| validation_exception(format!("unsupported expression: {}", clause)))?;
    let (lhs, rhs) = (lhs.trim(), rhs.trim());
    let attribute = match lhs.strip_prefix('#') {
        Some(_) => names
            .and_then(|n| n.get(lhs))
            .cloned()
            .ok_or_else(|| validation_exception(format!("undefined name placeholder: {}", lhs)))?,
        None => lhs.to_string(),
    };
    let value = values
        .and_then(|v| v.get(rhs))
        .cloned()
        .ok_or_else(|| validation_exception(format!("undefined value placeholder: {}", rhs)))?;
    Ok((attribute, value))
}

fn conditions(
    expression: Option<&str>,
    names: Option<&HashMap<String, String>>,
    values: Option<&Item>,
) -> Result<Vec<(String, AttributeValue)>, ServiceError> {
    match expression {
        None => Ok(Vec::new()),
        Some(expr) => expr
            .split(" AND ")
            .map(|clause| equality(clause, names, values))
            .collect(),
    }
}

fn matches(item: &Item, conditions: &[(String, AttributeValue)]) -> bool {
    conditions
        .iter()
        .all(|(name, value)| item.get(name) == Some(value))
}

/// One page of a query/scan: `Limit` caps evaluated items, the filter runs
/// on what was evaluated.
fn page(
    table: &FakeTable,
    key_conditions: &[(String, AttributeValue)],
    filter: &[(String, AttributeValue)],
    limit: Option<i32>,
    start: Option<&Item>,
) -> (Vec<Item>, i32, Option<Item>) {
    let mut candidates: Vec<&Item> = table
        .items
        .iter()
        .filter(|item| matches(item, key_conditions))
        .collect();
    if let Some(start) = start {
        if let Some(pos) = candidates.iter().position(|item| &table.key_of(item) == start) {
            candidates.drain(..=pos);
        }
    }

    let limit = limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
    let truncated = candidates.len() > limit;
    let evaluated: Vec<&Item> = candidates.into_iter().take(limit).collect();
    let last_key = if truncated {
        evaluated.last().map(|item| table.key_of(item))
    } else {
        None
    };

    let scanned = evaluated.len() as i32;
    let items = evaluated
        .into_iter()
        .filter(|item| matches(item, filter))
        .cloned()
        .collect();
    (items, scanned, last_key)
}

impl FakeDynamo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn description(&self, table: &str) -> Option<TableDescription> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(|t| t.description.clone())
    }

    fn with_state<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut FakeState) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op);
        f(&mut state)
    }
}

#[async_trait]
impl dynamo_mcp::DynamoBackend for FakeDynamo {
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput, ServiceError> {
        self.with_state("CreateTable", |state| {
            let name = input.table_name().unwrap_or_default().to_string();
            if state.tables.contains_key(&name) {
                return Err(ServiceError::new(
                    Some("ResourceInUseException"),
                    format!("ResourceInUseException: Table already exists: {}", name),
                ));
            }
            if input.key_schema().is_empty() {
                return Err(validation_exception("KeySchema must not be empty"));
            }

            let local_indexes: Vec<LocalSecondaryIndexDescription> = input
                .local_secondary_indexes()
                .iter()
                .map(|lsi| {
                    LocalSecondaryIndexDescription::builder()
                        .index_name(lsi.index_name())
                        .set_key_schema(Some(lsi.key_schema().to_vec()))
                        .set_projection(lsi.projection().cloned())
                        .build()
                })
                .collect();

            let description = TableDescription::builder()
                .table_name(&name)
                .table_arn(format!("arn:aws:dynamodb:us-east-1:000000000000:table/{}", name))
                .table_status(TableStatus::Active)
                .set_key_schema(Some(input.key_schema().to_vec()))
                .set_attribute_definitions(Some(input.attribute_definitions().to_vec()))
                .set_provisioned_throughput(throughput_description(input.provisioned_throughput()))
                .set_local_secondary_indexes((!local_indexes.is_empty()).then_some(local_indexes))
                .item_count(0)
                .build();

            state.tables.insert(
                name,
                FakeTable {
                    description: description.clone(),
                    items: Vec::new(),
                },
            );
            Ok(CreateTableOutput::builder()
                .table_description(description)
                .build())
        })
    }

    async fn list_tables(&self, input: ListTablesInput) -> Result<ListTablesOutput, ServiceError> {
        self.with_state("ListTables", |state| {
            let names: Vec<String> = state
                .tables
                .keys()
                .filter(|name| {
                    input
                        .exclusive_start_table_name()
                        .is_none_or(|start| name.as_str() > start)
                })
                .cloned()
                .collect();
            let limit = input.limit().map(|l| l as usize).unwrap_or(100);
            let truncated = names.len() > limit;
            let page: Vec<String> = names.into_iter().take(limit).collect();
            let last = if truncated { page.last().cloned() } else { None };
            Ok(ListTablesOutput::builder()
                .set_table_names(Some(page))
                .set_last_evaluated_table_name(last)
                .build())
        })
    }

    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, ServiceError> {
        self.with_state("DescribeTable", |state| {
            let name = input.table_name().unwrap_or_default();
            let table = state.tables.get(name).ok_or_else(|| not_found(name))?;
            Ok(DescribeTableOutput::builder()
                .table(table.description.clone())
                .build())
        })
    }

    async fn update_table(&self, input: UpdateTableInput) -> Result<UpdateTableOutput, ServiceError> {
        self.with_state("UpdateTable", |state| {
            let name = input.table_name().unwrap_or_default();
            let table = state.tables.get_mut(name).ok_or_else(|| not_found(name))?;
            let description = &mut table.description;

            if let Some(tp) = throughput_description(input.provisioned_throughput()) {
                description.provisioned_throughput = Some(tp);
            }

            for update in input.global_secondary_index_updates() {
                let indexes = description.global_secondary_indexes.get_or_insert_with(Vec::new);
                if let Some(create) = update.create() {
                    if indexes.iter().any(|i| i.index_name() == Some(create.index_name())) {
                        return Err(validation_exception(format!(
                            "Attempting to create an index which already exists: {}",
                            create.index_name()
                        )));
                    }
                    indexes.push(
                        GlobalSecondaryIndexDescription::builder()
                            .index_name(create.index_name())
                            .index_status(IndexStatus::Creating)
                            .set_key_schema(Some(create.key_schema().to_vec()))
                            .set_projection(create.projection().cloned())
                            .set_provisioned_throughput(throughput_description(
                                create.provisioned_throughput(),
                            ))
                            .build(),
                    );
                }
                if let Some(change) = update.update() {
                    let index = indexes
                        .iter_mut()
                        .find(|i| i.index_name() == Some(change.index_name()))
                        .ok_or_else(|| {
                            ServiceError::new(
                                Some("ResourceNotFoundException"),
                                format!(
                                    "ResourceNotFoundException: Requested resource not found: Index: {} not found",
                                    change.index_name()
                                ),
                            )
                        })?;
                    index.provisioned_throughput =
                        throughput_description(change.provisioned_throughput());
                }
            }

            for def in input.attribute_definitions() {
                let defs = description.attribute_definitions.get_or_insert_with(Vec::new);
                if !defs.iter().any(|d| d.attribute_name() == def.attribute_name()) {
                    defs.push(def.clone());
                }
            }

            Ok(UpdateTableOutput::builder()
                .table_description(description.clone())
                .build())
        })
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, ServiceError> {
        self.with_state("PutItem", |state| {
            let name = input.table_name().unwrap_or_default();
            let table = state.tables.get_mut(name).ok_or_else(|| not_found(name))?;
            let item = input.item().cloned().unwrap_or_default();
            if table.key_names().iter().any(|k| !item.contains_key(k)) {
                return Err(validation_exception(
                    "One or more parameter values were invalid: Missing the key in the item",
                ));
            }
            let key = table.key_of(&item);
            match table.position(&key) {
                Some(pos) => table.items[pos] = item,
                None => table.items.push(item),
            }
            table.refresh_count();
            Ok(PutItemOutput::builder().build())
        })
    }

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, ServiceError> {
        self.with_state("GetItem", |state| {
            let name = input.table_name().unwrap_or_default();
            let table = state.tables.get(name).ok_or_else(|| not_found(name))?;
            let key = input.key().cloned().unwrap_or_default();
            let item = table.position(&key).map(|pos| table.items[pos].clone());
            Ok(GetItemOutput::builder().set_item(item).build())
        })
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, ServiceError> {
        self.with_state("UpdateItem", |state| {
            let name = input.table_name().unwrap_or_default();
            let table = state.tables.get_mut(name).ok_or_else(|| not_found(name))?;
            let key = input.key().cloned().unwrap_or_default();
            let names = input.expression_attribute_names();
            let values = input.expression_attribute_values();

            let position = table.position(&key);
            let condition = conditions(input.condition_expression(), names, values)?;
            let current = position.map(|pos| table.items[pos].clone());
            if !condition.is_empty() && !current.as_ref().is_some_and(|item| matches(item, &condition)) {
                return Err(ServiceError::new(
                    Some("ConditionalCheckFailedException"),
                    "ConditionalCheckFailedException: The conditional request failed",
                ));
            }

            let assignments = input
                .update_expression()
                .unwrap_or_default()
                .trim()
                .strip_prefix("SET ")
                .ok_or_else(|| validation_exception("only SET updates are supported"))?;
            let mut item = current.unwrap_or_else(|| key.clone());
            for clause in assignments.split(',') {
                let (attribute, value) = equality(clause, names, values)?;
                item.insert(attribute, value);
            }

            match position {
                Some(pos) => table.items[pos] = item.clone(),
                None => table.items.push(item.clone()),
            }
            table.refresh_count();

            let attributes = match input.return_values() {
                Some(ReturnValue::AllNew) => Some(item),
                _ => None,
            };
            Ok(UpdateItemOutput::builder().set_attributes(attributes).build())
        })
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, ServiceError> {
        self.with_state("Query", |state| {
            let name = input.table_name().unwrap_or_default();
            let table = state.tables.get(name).ok_or_else(|| not_found(name))?;
            let names = input.expression_attribute_names();
            let values = input.expression_attribute_values();
            let key_conditions = conditions(input.key_condition_expression(), names, values)?;
            if key_conditions.is_empty() {
                return Err(validation_exception("KeyConditionExpression is required"));
            }
            let filter = conditions(input.filter_expression(), names, values)?;
            let (items, scanned, last_key) = page(
                table,
                &key_conditions,
                &filter,
                input.limit(),
                input.exclusive_start_key(),
            );
            Ok(QueryOutput::builder()
                .count(items.len() as i32)
                .scanned_count(scanned)
                .set_items(Some(items))
                .set_last_evaluated_key(last_key)
                .build())
        })
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, ServiceError> {
        self.with_state("Scan", |state| {
            let name = input.table_name().unwrap_or_default();
            let table = state.tables.get(name).ok_or_else(|| not_found(name))?;
            let filter = conditions(
                input.filter_expression(),
                input.expression_attribute_names(),
                input.expression_attribute_values(),
            )?;
            let (items, scanned, last_key) =
                page(table, &[], &filter, input.limit(), input.exclusive_start_key());
            Ok(ScanOutput::builder()
                .count(items.len() as i32)
                .scanned_count(scanned)
                .set_items(Some(items))
                .set_last_evaluated_key(last_key)
                .build())
        })
    }
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub backend: Arc<FakeDynamo>,
    pub dispatcher: Dispatcher,
}

impl TestContext {
    pub fn new() -> Self {
        let backend = Arc::new(FakeDynamo::new());
        let dispatcher = Dispatcher::with_catalog(backend.clone());
        Self { backend, dispatcher }
    }

    pub fn server(&self) -> McpServer {
        McpServer::new(McpConfig::default(), self.dispatcher.clone())
    }

    pub async fn call(&self, tool: &str, arguments: Value) -> ResultEnvelope {
        self.dispatcher.dispatch(tool, &arguments).await
    }

    /// Create a `Users` table keyed by `userId`.
    pub async fn create_users_table(&self) {
        let result = self
            .call(
                "create_table",
                serde_json::json!({
                    "tableName": "Users",
                    "partitionKey": "userId",
                    "partitionKeyType": "S",
                    "readCapacity": 5,
                    "writeCapacity": 5
                }),
            )
            .await;
        assert_success(&result, "create Users table");
    }
}

// =============================================================================
// ASSERTION HELPERS
// =============================================================================

/// Assert that a result is successful
pub fn assert_success(result: &ResultEnvelope, msg: &str) {
    assert!(result.success, "{}: {:?}", msg, result);
}

/// Assert that a result is a failure
pub fn assert_failure(result: &ResultEnvelope, msg: &str) {
    assert!(!result.success, "{}: {:?}", msg, result);
}

/// Key schema as `(name, HASH|RANGE)` pairs.
pub fn key_pairs(schema: &[KeySchemaElement]) -> Vec<(String, KeyType)> {
    schema
        .iter()
        .map(|k| (k.attribute_name().to_string(), k.key_type().clone()))
        .collect()
}
