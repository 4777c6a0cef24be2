//! Tool execution: one adapter per tool.
//!
//! Each adapter takes already-validated arguments, builds exactly one
//! DynamoDB request, issues it through the [`DynamoBackend`], and turns the
//! response (or error) into a [`ResultEnvelope`]. Nothing is retried and no
//! adapter pre-checks remote state; service errors pass through verbatim.
//!
//! | Tool | Service call |
//! |------|--------------|
//! | `create_table`, `create_lsi` | `CreateTable` |
//! | `list_tables` | `ListTables` |
//! | `describe_table` | `DescribeTable` |
//! | `create_gsi`, `update_gsi`, `update_capacity` | `UpdateTable` |
//! | `put_item` / `get_item` / `update_item` | `PutItem` / `GetItem` / `UpdateItem` |
//! | `query_table` / `scan_table` | `Query` / `Scan` |

use crate::attribute::{self, Item};
use crate::client::{DynamoBackend, ServiceError};
use crate::describe;
use crate::envelope::{GatewayErrorKind, ResultEnvelope};
use crate::tools::Tool;
use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::create_table::CreateTableInput;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableInput;
use aws_sdk_dynamodb::operation::get_item::GetItemInput;
use aws_sdk_dynamodb::operation::list_tables::ListTablesInput;
use aws_sdk_dynamodb::operation::put_item::PutItemInput;
use aws_sdk_dynamodb::operation::query::QueryInput;
use aws_sdk_dynamodb::operation::scan::ScanInput;
use aws_sdk_dynamodb::operation::update_item::UpdateItemInput;
use aws_sdk_dynamodb::operation::update_table::UpdateTableInput;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, CreateGlobalSecondaryIndexAction, GlobalSecondaryIndexUpdate, KeySchemaElement,
    KeyType, LocalSecondaryIndex, Projection, ProjectionType, ProvisionedThroughput, ReturnValue,
    ScalarAttributeType, UpdateGlobalSecondaryIndexAction,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Capacity used by `create_lsi` when the caller does not supply one.
pub const DEFAULT_LSI_CAPACITY: i64 = 5;

/// Why an adapter could not produce a successful result.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// An argument is structurally valid but unusable, e.g. a fractional capacity.
    #[error("{0}")]
    InvalidArgument(String),

    /// The SDK refused to build the request.
    #[error("failed to build request: {0}")]
    Request(#[from] BuildError),

    /// The service call failed.
    #[error("error {context}: {source}")]
    Service {
        context: &'static str,
        source: ServiceError,
    },
}

impl AdapterError {
    fn service(context: &'static str) -> impl FnOnce(ServiceError) -> Self {
        move |source| AdapterError::Service { context, source }
    }

    /// Fold into a failure envelope.
    pub fn into_envelope(self) -> ResultEnvelope {
        match self {
            AdapterError::InvalidArgument(message) => {
                ResultEnvelope::failure(GatewayErrorKind::InvalidRequest, message)
            }
            AdapterError::Request(err) => ResultEnvelope::failure(
                GatewayErrorKind::InvalidRequest,
                format!("Failed to build request: {}", err),
            ),
            AdapterError::Service { context, source } => ResultEnvelope::service(context, &source),
        }
    }
}

// =============================================================================
// ARGUMENT ACCESS
// =============================================================================

/// Typed read access to a validated argument map.
struct Args<'a>(&'a Map<String, Value>);

impl<'a> Args<'a> {
    fn str(&self, name: &str) -> Result<&'a str, AdapterError> {
        self.opt_str(name)
            .ok_or_else(|| AdapterError::InvalidArgument(format!("'{}' must be a string", name)))
    }

    fn opt_str(&self, name: &str) -> Option<&'a str> {
        self.0.get(name).and_then(Value::as_str)
    }

    fn object(&self, name: &str) -> Result<&'a Map<String, Value>, AdapterError> {
        self.opt_object(name)
            .ok_or_else(|| AdapterError::InvalidArgument(format!("'{}' must be an object", name)))
    }

    fn opt_object(&self, name: &str) -> Option<&'a Map<String, Value>> {
        self.0.get(name).and_then(Value::as_object)
    }

    fn opt_str_list(&self, name: &str) -> Option<Vec<String>> {
        self.0.get(name).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    fn opt_whole(&self, name: &str) -> Result<Option<i64>, AdapterError> {
        let Some(value) = self.0.get(name) else {
            return Ok(None);
        };
        let whole = value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        });
        whole.map(Some).ok_or_else(|| {
            AdapterError::InvalidArgument(format!("'{}' must be a whole number, got {}", name, value))
        })
    }

    fn capacity(&self, name: &str) -> Result<i64, AdapterError> {
        self.opt_capacity(name)?
            .ok_or_else(|| AdapterError::InvalidArgument(format!("'{}' is required", name)))
    }

    fn opt_capacity(&self, name: &str) -> Result<Option<i64>, AdapterError> {
        match self.opt_whole(name)? {
            Some(units) if units < 0 => Err(AdapterError::InvalidArgument(format!(
                "'{}' must not be negative",
                name
            ))),
            other => Ok(other),
        }
    }

    fn opt_limit(&self, name: &str) -> Result<Option<i32>, AdapterError> {
        self.opt_whole(name)?
            .map(|n| {
                i32::try_from(n).map_err(|_| {
                    AdapterError::InvalidArgument(format!("'{}' is out of range: {}", name, n))
                })
            })
            .transpose()
    }

    /// `expressionAttributeNames`: every value must be a string.
    fn opt_names(&self) -> Result<Option<HashMap<String, String>>, AdapterError> {
        let Some(map) = self.opt_object("expressionAttributeNames") else {
            return Ok(None);
        };
        map.iter()
            .map(|(placeholder, value)| match value.as_str() {
                Some(name) => Ok((placeholder.clone(), name.to_string())),
                None => Err(AdapterError::InvalidArgument(format!(
                    "expressionAttributeNames['{}'] must be a string",
                    placeholder
                ))),
            })
            .collect::<Result<HashMap<_, _>, _>>()
            .map(Some)
    }

    fn opt_values(&self) -> Option<Item> {
        self.opt_object("expressionAttributeValues").map(attribute::to_item)
    }

    fn opt_item(&self, name: &str) -> Option<Item> {
        self.opt_object(name).map(attribute::to_item)
    }
}

// =============================================================================
// REQUEST BUILDING HELPERS
// =============================================================================

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement, AdapterError> {
    Ok(KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()?)
}

fn throughput(read: i64, write: i64) -> Result<ProvisionedThroughput, AdapterError> {
    Ok(ProvisionedThroughput::builder()
        .read_capacity_units(read)
        .write_capacity_units(write)
        .build()?)
}

/// Projection for a secondary index. `NonKeyAttributes` is only sent for
/// `INCLUDE`; the service rejects it for the other projection types.
fn projection(projection_type: &str, non_key_attributes: Option<Vec<String>>) -> Projection {
    let projection_type = ProjectionType::from(projection_type);
    let non_key_attributes = match projection_type {
        ProjectionType::Include => non_key_attributes,
        _ => None,
    };
    Projection::builder()
        .projection_type(projection_type)
        .set_non_key_attributes(non_key_attributes)
        .build()
}

/// Key schema plus the attribute definitions it needs, without duplicates.
#[derive(Default)]
struct KeyDefinitions {
    definitions: Vec<AttributeDefinition>,
}

impl KeyDefinitions {
    fn define(&mut self, name: &str, attribute_type: &str) -> Result<(), AdapterError> {
        if self
            .definitions
            .iter()
            .any(|d| d.attribute_name() == name)
        {
            return Ok(());
        }
        self.definitions.push(
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::from(attribute_type))
                .build()?,
        );
        Ok(())
    }

    /// Build `[HASH]` or `[HASH, RANGE]`, defining each attribute.
    fn key_schema(
        &mut self,
        partition: (&str, &str),
        sort: Option<(&str, &str)>,
    ) -> Result<Vec<KeySchemaElement>, AdapterError> {
        self.define(partition.0, partition.1)?;
        let mut schema = vec![key_element(partition.0, KeyType::Hash)?];
        if let Some((name, attribute_type)) = sort {
            self.define(name, attribute_type)?;
            schema.push(key_element(name, KeyType::Range)?);
        }
        Ok(schema)
    }

    fn into_inner(self) -> Vec<AttributeDefinition> {
        self.definitions
    }
}

/// Resolve an optional sort key pair. A name without a type is unusable.
fn sort_key<'a>(
    args: &Args<'a>,
    name_field: &str,
    type_field: &str,
) -> Result<Option<(&'a str, &'a str)>, AdapterError> {
    match (args.opt_str(name_field), args.opt_str(type_field)) {
        (Some(name), Some(attribute_type)) => Ok(Some((name, attribute_type))),
        (Some(_), None) => Err(AdapterError::InvalidArgument(format!(
            "'{}' is required when '{}' is set",
            type_field, name_field
        ))),
        (None, _) => Ok(None),
    }
}

// =============================================================================
// TOOL EXECUTOR
// =============================================================================

/// Runs tool adapters against a shared DynamoDB backend.
#[derive(Clone)]
pub struct ToolExecutor {
    backend: Arc<dyn DynamoBackend>,
}

impl ToolExecutor {
    /// Create a new tool executor.
    pub fn new(backend: Arc<dyn DynamoBackend>) -> Self {
        Self { backend }
    }

    /// Execute a tool with validated arguments.
    pub async fn execute(&self, tool: Tool, arguments: &Map<String, Value>) -> ResultEnvelope {
        let args = Args(arguments);
        let result = match tool {
            Tool::CreateTable => self.create_table(&args).await,
            Tool::ListTables => self.list_tables(&args).await,
            Tool::DescribeTable => self.describe_table(&args).await,
            Tool::CreateGsi => self.create_gsi(&args).await,
            Tool::UpdateGsi => self.update_gsi(&args).await,
            Tool::CreateLsi => self.create_lsi(&args).await,
            Tool::UpdateCapacity => self.update_capacity(&args).await,
            Tool::PutItem => self.put_item(&args).await,
            Tool::GetItem => self.get_item(&args).await,
            Tool::UpdateItem => self.update_item(&args).await,
            Tool::QueryTable => self.query_table(&args).await,
            Tool::ScanTable => self.scan_table(&args).await,
        };

        result.unwrap_or_else(|err| {
            if let AdapterError::Service { source, .. } = &err {
                tracing::warn!(
                    tool = %tool,
                    code = source.code.as_deref().unwrap_or("unknown"),
                    "DynamoDB call failed"
                );
            }
            err.into_envelope()
        })
    }

    async fn create_table(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let mut keys = KeyDefinitions::default();
        let key_schema = keys.key_schema(
            (args.str("partitionKey")?, args.str("partitionKeyType")?),
            sort_key(args, "sortKey", "sortKeyType")?,
        )?;

        let input = CreateTableInput::builder()
            .table_name(args.str("tableName")?)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(keys.into_inner()))
            .provisioned_throughput(throughput(
                args.capacity("readCapacity")?,
                args.capacity("writeCapacity")?,
            )?)
            .build()?;

        let output = self
            .backend
            .create_table(input)
            .await
            .map_err(AdapterError::service("creating table"))?;

        Ok(ResultEnvelope::ok("Table created successfully").with_opt(
            "details",
            output.table_description.as_ref().map(describe::table_description),
        ))
    }

    async fn list_tables(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let input = ListTablesInput::builder()
            .set_limit(args.opt_limit("limit")?)
            .set_exclusive_start_table_name(args.opt_str("exclusiveStartTableName").map(str::to_string))
            .build()?;

        let output = self
            .backend
            .list_tables(input)
            .await
            .map_err(AdapterError::service("listing tables"))?;

        Ok(ResultEnvelope::ok("Tables listed successfully")
            .with("tables", output.table_names.unwrap_or_default())
            .with_opt(
                "lastEvaluatedTable",
                output.last_evaluated_table_name.map(Value::String),
            ))
    }

    async fn describe_table(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let input = DescribeTableInput::builder()
            .table_name(args.str("tableName")?)
            .build()?;

        let output = self
            .backend
            .describe_table(input)
            .await
            .map_err(AdapterError::service("describing table"))?;

        Ok(ResultEnvelope::ok("Table described successfully")
            .with_opt("details", output.table.as_ref().map(describe::table_description)))
    }

    async fn create_gsi(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let mut keys = KeyDefinitions::default();
        let key_schema = keys.key_schema(
            (args.str("partitionKey")?, args.str("partitionKeyType")?),
            sort_key(args, "sortKey", "sortKeyType")?,
        )?;

        let action = CreateGlobalSecondaryIndexAction::builder()
            .index_name(args.str("indexName")?)
            .set_key_schema(Some(key_schema))
            .projection(projection(
                args.str("projectionType")?,
                args.opt_str_list("nonKeyAttributes"),
            ))
            .provisioned_throughput(throughput(
                args.capacity("readCapacity")?,
                args.capacity("writeCapacity")?,
            )?)
            .build()?;

        let input = UpdateTableInput::builder()
            .table_name(args.str("tableName")?)
            .set_attribute_definitions(Some(keys.into_inner()))
            .global_secondary_index_updates(GlobalSecondaryIndexUpdate::builder().create(action).build())
            .build()?;

        let output = self
            .backend
            .update_table(input)
            .await
            .map_err(AdapterError::service("creating GSI"))?;

        Ok(ResultEnvelope::ok("GSI creation initiated").with_opt(
            "details",
            output.table_description.as_ref().map(describe::table_description),
        ))
    }

    async fn update_gsi(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let action = UpdateGlobalSecondaryIndexAction::builder()
            .index_name(args.str("indexName")?)
            .provisioned_throughput(throughput(
                args.capacity("readCapacity")?,
                args.capacity("writeCapacity")?,
            )?)
            .build()?;

        let input = UpdateTableInput::builder()
            .table_name(args.str("tableName")?)
            .global_secondary_index_updates(GlobalSecondaryIndexUpdate::builder().update(action).build())
            .build()?;

        let output = self
            .backend
            .update_table(input)
            .await
            .map_err(AdapterError::service("updating GSI"))?;

        Ok(ResultEnvelope::ok("GSI capacity update initiated").with_opt(
            "details",
            output.table_description.as_ref().map(describe::table_description),
        ))
    }

    /// Local indexes can only be declared at table creation, so this always
    /// creates a new table and never updates an existing one.
    async fn create_lsi(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let partition = (args.str("partitionKey")?, args.str("partitionKeyType")?);
        let index_sort = (args.str("sortKey")?, args.str("sortKeyType")?);
        let table_sort = sort_key(args, "tableSortKey", "tableSortKeyType")?.unwrap_or(index_sort);

        let mut keys = KeyDefinitions::default();
        let table_key_schema = keys.key_schema(partition, Some(table_sort))?;
        let index_key_schema = keys.key_schema(partition, Some(index_sort))?;

        let index = LocalSecondaryIndex::builder()
            .index_name(args.str("indexName")?)
            .set_key_schema(Some(index_key_schema))
            .projection(projection(
                args.str("projectionType")?,
                args.opt_str_list("nonKeyAttributes"),
            ))
            .build()?;

        let read = args.opt_capacity("readCapacity")?.unwrap_or(DEFAULT_LSI_CAPACITY);
        let write = args.opt_capacity("writeCapacity")?.unwrap_or(DEFAULT_LSI_CAPACITY);

        let input = CreateTableInput::builder()
            .table_name(args.str("tableName")?)
            .set_key_schema(Some(table_key_schema))
            .set_attribute_definitions(Some(keys.into_inner()))
            .local_secondary_indexes(index)
            .provisioned_throughput(throughput(read, write)?)
            .build()?;

        let output = self
            .backend
            .create_table(input)
            .await
            .map_err(AdapterError::service("creating table with LSI"))?;

        Ok(ResultEnvelope::ok("Table with LSI created successfully").with_opt(
            "details",
            output.table_description.as_ref().map(describe::table_description),
        ))
    }

    async fn update_capacity(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let input = UpdateTableInput::builder()
            .table_name(args.str("tableName")?)
            .provisioned_throughput(throughput(
                args.capacity("readCapacity")?,
                args.capacity("writeCapacity")?,
            )?)
            .build()?;

        let output = self
            .backend
            .update_table(input)
            .await
            .map_err(AdapterError::service("updating capacity"))?;

        Ok(ResultEnvelope::ok("Capacity updated successfully").with_opt(
            "details",
            output.table_description.as_ref().map(describe::table_description),
        ))
    }

    async fn put_item(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let input = PutItemInput::builder()
            .table_name(args.str("tableName")?)
            .set_item(Some(attribute::to_item(args.object("item")?)))
            .build()?;

        self.backend
            .put_item(input)
            .await
            .map_err(AdapterError::service("putting item"))?;

        Ok(ResultEnvelope::ok("Item added successfully"))
    }

    async fn get_item(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let input = GetItemInput::builder()
            .table_name(args.str("tableName")?)
            .set_key(Some(attribute::to_item(args.object("key")?)))
            .build()?;

        let output = self
            .backend
            .get_item(input)
            .await
            .map_err(AdapterError::service("getting item"))?;

        // A missing item is a successful read of nothing.
        let item = output
            .item
            .as_ref()
            .map(attribute::from_item)
            .unwrap_or(Value::Null);

        Ok(ResultEnvelope::ok("Item retrieved successfully").with("item", item))
    }

    async fn update_item(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let return_values = ReturnValue::from(args.opt_str("returnValues").unwrap_or("NONE"));

        let input = UpdateItemInput::builder()
            .table_name(args.str("tableName")?)
            .set_key(Some(attribute::to_item(args.object("key")?)))
            .update_expression(args.str("updateExpression")?)
            .set_expression_attribute_names(args.opt_names()?)
            .set_expression_attribute_values(args.opt_values())
            .set_condition_expression(args.opt_str("conditionExpression").map(str::to_string))
            .return_values(return_values)
            .build()?;

        let output = self
            .backend
            .update_item(input)
            .await
            .map_err(AdapterError::service("updating item"))?;

        Ok(ResultEnvelope::ok("Item updated successfully")
            .with_opt("attributes", output.attributes.as_ref().map(attribute::from_item)))
    }

    async fn query_table(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let input = QueryInput::builder()
            .table_name(args.str("tableName")?)
            .set_index_name(args.opt_str("indexName").map(str::to_string))
            .key_condition_expression(args.str("keyConditionExpression")?)
            .set_filter_expression(args.opt_str("filterExpression").map(str::to_string))
            .set_expression_attribute_names(args.opt_names()?)
            .set_expression_attribute_values(args.opt_values())
            .set_limit(args.opt_limit("limit")?)
            .set_exclusive_start_key(args.opt_item("exclusiveStartKey"))
            .build()?;

        let output = self
            .backend
            .query(input)
            .await
            .map_err(AdapterError::service("querying table"))?;

        Ok(page_envelope(
            "Query executed successfully",
            output.items.unwrap_or_default(),
            output.scanned_count,
            output.last_evaluated_key,
        ))
    }

    async fn scan_table(&self, args: &Args<'_>) -> Result<ResultEnvelope, AdapterError> {
        let input = ScanInput::builder()
            .table_name(args.str("tableName")?)
            .set_index_name(args.opt_str("indexName").map(str::to_string))
            .set_filter_expression(args.opt_str("filterExpression").map(str::to_string))
            .set_expression_attribute_names(args.opt_names()?)
            .set_expression_attribute_values(args.opt_values())
            .set_limit(args.opt_limit("limit")?)
            .set_exclusive_start_key(args.opt_item("exclusiveStartKey"))
            .build()?;

        let output = self
            .backend
            .scan(input)
            .await
            .map_err(AdapterError::service("scanning table"))?;

        Ok(page_envelope(
            "Scan executed successfully",
            output.items.unwrap_or_default(),
            output.scanned_count,
            output.last_evaluated_key,
        ))
    }
}

/// Envelope for a page of query/scan results. `count` always equals the
/// number of returned items.
fn page_envelope(
    message: &str,
    items: Vec<Item>,
    scanned_count: i32,
    last_evaluated_key: Option<Item>,
) -> ResultEnvelope {
    ResultEnvelope::ok(message)
        .with("count", items.len())
        .with("scannedCount", scanned_count)
        .with("items", attribute::from_items(&items))
        .with_opt("lastEvaluatedKey", last_evaluated_key.as_ref().map(attribute::from_item))
}
