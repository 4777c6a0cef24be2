//! Tool catalog and registry.
//!
//! The catalog is closed: every tool is a variant of [`Tool`], and the
//! registry is built once at startup from [`Tool::ALL`]. Adding a tool is a
//! code change. Delete operations are deliberately absent.

use crate::error::McpError;
use crate::protocol::ToolDefinition;
use crate::schema::{FieldKind, FieldSpec, ToolSpec};
use std::collections::HashMap;
use std::fmt;

const KEY_TYPES: &[&str] = &["S", "N", "B"];
const PROJECTION_TYPES: &[&str] = &["ALL", "KEYS_ONLY", "INCLUDE"];
const RETURN_VALUES: &[&str] = &["NONE", "ALL_OLD", "UPDATED_OLD", "ALL_NEW", "UPDATED_NEW"];

/// Every tool the gateway exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    CreateTable,
    ListTables,
    DescribeTable,
    CreateGsi,
    UpdateGsi,
    CreateLsi,
    UpdateCapacity,
    PutItem,
    GetItem,
    UpdateItem,
    QueryTable,
    ScanTable,
}

impl Tool {
    /// All tools, in the order they are advertised.
    pub const ALL: [Tool; 12] = [
        Tool::CreateTable,
        Tool::ListTables,
        Tool::DescribeTable,
        Tool::CreateGsi,
        Tool::UpdateGsi,
        Tool::CreateLsi,
        Tool::UpdateCapacity,
        Tool::PutItem,
        Tool::GetItem,
        Tool::UpdateItem,
        Tool::QueryTable,
        Tool::ScanTable,
    ];

    /// Wire name of the tool.
    pub fn name(self) -> &'static str {
        match self {
            Tool::CreateTable => "create_table",
            Tool::ListTables => "list_tables",
            Tool::DescribeTable => "describe_table",
            Tool::CreateGsi => "create_gsi",
            Tool::UpdateGsi => "update_gsi",
            Tool::CreateLsi => "create_lsi",
            Tool::UpdateCapacity => "update_capacity",
            Tool::PutItem => "put_item",
            Tool::GetItem => "get_item",
            Tool::UpdateItem => "update_item",
            Tool::QueryTable => "query_table",
            Tool::ScanTable => "scan_table",
        }
    }

    /// Resolve a wire name.
    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Input schema and description of the tool.
    pub fn spec(self) -> ToolSpec {
        use FieldKind::*;

        let table = FieldSpec::required("tableName", String, "Name of the table");
        let read = FieldSpec::required("readCapacity", Number, "Provisioned read capacity units");
        let write =
            FieldSpec::required("writeCapacity", Number, "Provisioned write capacity units");
        let names = FieldSpec::optional(
            "expressionAttributeNames",
            Object,
            "Placeholder names used in expressions, e.g. {\"#n\": \"name\"}",
        );
        let values = FieldSpec::optional(
            "expressionAttributeValues",
            Object,
            "Placeholder values used in expressions, e.g. {\":v\": 1}",
        );
        let filter =
            FieldSpec::optional("filterExpression", String, "Filter applied after reading items");
        let limit = FieldSpec::optional("limit", Number, "Maximum number of items to evaluate");
        let start_key = FieldSpec::optional(
            "exclusiveStartKey",
            Object,
            "Primary key to resume from (lastEvaluatedKey of a previous page)",
        );
        let index = FieldSpec::optional("indexName", String, "Secondary index to read instead of the table");

        let (description, fields, read_only) = match self {
            Tool::CreateTable => (
                "Creates a new DynamoDB table with provisioned throughput",
                vec![
                    table,
                    FieldSpec::required("partitionKey", String, "Name of the partition key"),
                    FieldSpec::required("partitionKeyType", String, "Type of the partition key")
                        .one_of(KEY_TYPES),
                    FieldSpec::optional("sortKey", String, "Name of the sort key"),
                    FieldSpec::optional("sortKeyType", String, "Type of the sort key")
                        .one_of(KEY_TYPES),
                    read,
                    write,
                ],
                false,
            ),
            Tool::ListTables => (
                "Lists DynamoDB table names, one page at a time",
                vec![
                    FieldSpec::optional("limit", Number, "Maximum number of table names to return"),
                    FieldSpec::optional(
                        "exclusiveStartTableName",
                        String,
                        "Table name to start listing after (lastEvaluatedTable of a previous page)",
                    ),
                ],
                true,
            ),
            Tool::DescribeTable => (
                "Returns the full description of a DynamoDB table",
                vec![table],
                true,
            ),
            Tool::CreateGsi => (
                "Adds a global secondary index to an existing table",
                vec![
                    table,
                    FieldSpec::required("indexName", String, "Name of the new index"),
                    FieldSpec::required("partitionKey", String, "Partition key of the index"),
                    FieldSpec::required("partitionKeyType", String, "Type of the index partition key")
                        .one_of(KEY_TYPES),
                    FieldSpec::optional("sortKey", String, "Sort key of the index"),
                    FieldSpec::optional("sortKeyType", String, "Type of the index sort key")
                        .one_of(KEY_TYPES),
                    FieldSpec::required("projectionType", String, "Attributes copied into the index")
                        .one_of(PROJECTION_TYPES),
                    FieldSpec::optional(
                        "nonKeyAttributes",
                        StringArray,
                        "Extra attributes to project when projectionType is INCLUDE",
                    ),
                    read,
                    write,
                ],
                false,
            ),
            Tool::UpdateGsi => (
                "Changes the provisioned throughput of a global secondary index",
                vec![
                    table,
                    FieldSpec::required("indexName", String, "Name of the index to update"),
                    read,
                    write,
                ],
                false,
            ),
            Tool::CreateLsi => (
                "Creates a new table that carries a local secondary index (local indexes can only be defined at table creation)",
                vec![
                    table,
                    FieldSpec::required("indexName", String, "Name of the local index"),
                    FieldSpec::required("partitionKey", String, "Partition key shared by table and index"),
                    FieldSpec::required("partitionKeyType", String, "Type of the partition key")
                        .one_of(KEY_TYPES),
                    FieldSpec::required("sortKey", String, "Sort key of the local index"),
                    FieldSpec::required("sortKeyType", String, "Type of the index sort key")
                        .one_of(KEY_TYPES),
                    FieldSpec::optional(
                        "tableSortKey",
                        String,
                        "Sort key of the table itself; defaults to the index sort key",
                    ),
                    FieldSpec::optional("tableSortKeyType", String, "Type of the table sort key")
                        .one_of(KEY_TYPES),
                    FieldSpec::required("projectionType", String, "Attributes copied into the index")
                        .one_of(PROJECTION_TYPES),
                    FieldSpec::optional(
                        "nonKeyAttributes",
                        StringArray,
                        "Extra attributes to project when projectionType is INCLUDE",
                    ),
                    FieldSpec::optional("readCapacity", Number, "Provisioned read capacity units (default 5)"),
                    FieldSpec::optional("writeCapacity", Number, "Provisioned write capacity units (default 5)"),
                ],
                false,
            ),
            Tool::UpdateCapacity => (
                "Changes the provisioned throughput of a table",
                vec![table, read, write],
                false,
            ),
            Tool::PutItem => (
                "Inserts or fully replaces an item",
                vec![
                    table,
                    FieldSpec::required("item", Object, "The complete item, including its primary key"),
                ],
                false,
            ),
            Tool::GetItem => (
                "Fetches a single item by primary key",
                vec![
                    table,
                    FieldSpec::required("key", Object, "Primary key of the item"),
                ],
                true,
            ),
            Tool::UpdateItem => (
                "Applies an update expression to a single item",
                vec![
                    table,
                    FieldSpec::required("key", Object, "Primary key of the item"),
                    FieldSpec::required(
                        "updateExpression",
                        String,
                        "Update expression, e.g. \"SET #n = :v\"",
                    ),
                    FieldSpec { required: true, ..names },
                    FieldSpec { required: true, ..values },
                    FieldSpec::optional(
                        "conditionExpression",
                        String,
                        "Condition that must hold for the update to apply",
                    ),
                    FieldSpec::optional("returnValues", String, "Which attributes to return (default NONE)")
                        .one_of(RETURN_VALUES),
                ],
                false,
            ),
            Tool::QueryTable => (
                "Queries a table or index by key condition",
                vec![
                    table,
                    FieldSpec::required(
                        "keyConditionExpression",
                        String,
                        "Key condition, e.g. \"userId = :id\"",
                    ),
                    FieldSpec { required: true, ..values },
                    names,
                    filter,
                    limit,
                    index,
                    start_key,
                ],
                true,
            ),
            Tool::ScanTable => (
                "Scans every item of a table or index",
                vec![table, filter, values, names, limit, index, start_key],
                true,
            ),
        };

        ToolSpec {
            name: self.name(),
            description,
            fields,
            read_only,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tool together with its resolved schema.
#[derive(Debug, Clone)]
pub struct RegisteredTool {
    pub tool: Tool,
    pub spec: ToolSpec,
}

/// Registry of available MCP tools.
///
/// Insertion order is preserved so `tools/list` is stable across calls.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full DynamoDB catalog.
    pub fn catalog() -> Self {
        let tools: Vec<RegisteredTool> = Tool::ALL
            .into_iter()
            .map(|tool| RegisteredTool {
                tool,
                spec: tool.spec(),
            })
            .collect();
        let by_name = tools
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.spec.name, idx))
            .collect();
        Self { tools, by_name }
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Tool) -> Result<(), McpError> {
        let spec = tool.spec();
        if self.by_name.contains_key(spec.name) {
            return Err(McpError::DuplicateTool {
                name: spec.name.to_string(),
            });
        }
        self.by_name.insert(spec.name, self.tools.len());
        self.tools.push(RegisteredTool { tool, spec });
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.by_name.get(name).map(|&idx| &self.tools[idx])
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// List all tools in registration order.
    pub fn list(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.iter()
    }

    /// Wire definitions for `tools/list`.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.spec.to_definition()).collect()
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tool names.
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.spec.name).collect()
    }
}
