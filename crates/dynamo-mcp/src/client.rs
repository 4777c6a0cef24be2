//! The external database seam.
//!
//! Adapters talk to DynamoDB only through [`DynamoBackend`], which takes and
//! returns the SDK's own operation input/output types. [`SdkBackend`] is the
//! production implementation; tests substitute an in-memory fake.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::create_table::{CreateTableInput, CreateTableOutput};
use aws_sdk_dynamodb::operation::describe_table::{DescribeTableInput, DescribeTableOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::list_tables::{ListTablesInput, ListTablesOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanInput, ScanOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use aws_sdk_dynamodb::operation::update_table::{UpdateTableInput, UpdateTableOutput};
use dynamo_core::AwsConfig;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// A failure reported by the external database service or its client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    /// Service error code, e.g. `ResourceNotFoundException`.
    pub code: Option<String>,
    /// Full error text, including the underlying cause chain.
    pub message: String,
}

impl ServiceError {
    /// Create a service error.
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

impl<E, R> From<SdkError<E, R>> for ServiceError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: fmt::Debug,
{
    fn from(err: SdkError<E, R>) -> Self {
        let service = err.as_service_error();
        let code = service.and_then(|e| e.code()).map(str::to_string);
        let message = match (&code, service.and_then(|e| e.message())) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            _ => DisplayErrorContext(&err).to_string(),
        };
        Self { code, message }
    }
}

/// The DynamoDB operations the gateway issues.
///
/// Each method is exactly one service round trip. Implementations must not
/// retry on their own behalf beyond what the underlying client does.
#[async_trait]
pub trait DynamoBackend: Send + Sync {
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput, ServiceError>;

    async fn list_tables(&self, input: ListTablesInput) -> Result<ListTablesOutput, ServiceError>;

    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, ServiceError>;

    async fn update_table(&self, input: UpdateTableInput) -> Result<UpdateTableOutput, ServiceError>;

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, ServiceError>;

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, ServiceError>;

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, ServiceError>;

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, ServiceError>;

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, ServiceError>;
}

/// [`DynamoBackend`] backed by the AWS SDK client.
#[derive(Debug, Clone)]
pub struct SdkBackend {
    client: Client,
}

impl SdkBackend {
    /// Wrap an existing SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS provider chain plus overrides.
    ///
    /// Credentials are resolved lazily, so missing credentials surface as a
    /// service error on the first call rather than here.
    pub async fn from_config(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared_config = loader.load().await;

        tracing::debug!(
            region = ?shared_config.region(),
            endpoint = ?config.endpoint_url,
            "DynamoDB client configured"
        );

        Self::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl DynamoBackend for SdkBackend {
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput, ServiceError> {
        self.client
            .create_table()
            .set_table_name(input.table_name)
            .set_attribute_definitions(input.attribute_definitions)
            .set_key_schema(input.key_schema)
            .set_local_secondary_indexes(input.local_secondary_indexes)
            .set_global_secondary_indexes(input.global_secondary_indexes)
            .set_billing_mode(input.billing_mode)
            .set_provisioned_throughput(input.provisioned_throughput)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn list_tables(&self, input: ListTablesInput) -> Result<ListTablesOutput, ServiceError> {
        self.client
            .list_tables()
            .set_exclusive_start_table_name(input.exclusive_start_table_name)
            .set_limit(input.limit)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, ServiceError> {
        self.client
            .describe_table()
            .set_table_name(input.table_name)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn update_table(&self, input: UpdateTableInput) -> Result<UpdateTableOutput, ServiceError> {
        self.client
            .update_table()
            .set_table_name(input.table_name)
            .set_attribute_definitions(input.attribute_definitions)
            .set_billing_mode(input.billing_mode)
            .set_provisioned_throughput(input.provisioned_throughput)
            .set_global_secondary_index_updates(input.global_secondary_index_updates)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, ServiceError> {
        self.client
            .put_item()
            .set_table_name(input.table_name)
            .set_item(input.item)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, ServiceError> {
        self.client
            .get_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_consistent_read(input.consistent_read)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, ServiceError> {
        self.client
            .update_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_update_expression(input.update_expression)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, ServiceError> {
        self.client
            .query()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_key_condition_expression(input.key_condition_expression)
            .set_filter_expression(input.filter_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_limit(input.limit)
            .set_exclusive_start_key(input.exclusive_start_key)
            .send()
            .await
            .map_err(ServiceError::from)
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, ServiceError> {
        self.client
            .scan()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_filter_expression(input.filter_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_limit(input.limit)
            .set_exclusive_start_key(input.exclusive_start_key)
            .send()
            .await
            .map_err(ServiceError::from)
    }
}
