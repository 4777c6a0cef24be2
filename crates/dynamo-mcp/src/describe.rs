//! Rendering of table descriptions as plain JSON.
//!
//! The SDK's description types are not serializable, so every field is copied
//! into JSON by hand. Keys use the service's own PascalCase names
//! (`TableName`, `KeySchema`, ...) so the output matches the service's wire
//! shape. Absent fields are omitted.

use aws_sdk_dynamodb::primitives::{DateTime, DateTimeFormat};
use aws_sdk_dynamodb::types::{
    ArchivalSummary, AttributeDefinition, BillingModeSummary, GlobalSecondaryIndexDescription,
    GlobalSecondaryIndexWarmThroughputDescription, GlobalTableWitnessDescription,
    KeySchemaElement, LocalSecondaryIndexDescription, OnDemandThroughput,
    OnDemandThroughputOverride, Projection, ProvisionedThroughputDescription,
    ProvisionedThroughputOverride, ReplicaDescription, ReplicaGlobalSecondaryIndexDescription,
    RestoreSummary, SearchSchemaElement, SseDescription, StreamSpecification, TableClassSummary,
    TableDescription, TableWarmThroughputDescription, VectorIndexDescription,
};
use serde_json::{Map, Value, json};

/// Render a table description.
pub fn table_description(desc: &TableDescription) -> Value {
    Fields::new()
        .list("AttributeDefinitions", desc.attribute_definitions.as_deref(), attribute_definition)
        .text("TableName", desc.table_name.as_deref())
        .list("KeySchema", desc.key_schema.as_deref(), key_element)
        .name("TableStatus", desc.table_status.as_ref())
        .time("CreationDateTime", desc.creation_date_time.as_ref())
        .nested("ProvisionedThroughput", desc.provisioned_throughput.as_ref(), throughput)
        .value("TableSizeBytes", desc.table_size_bytes)
        .value("ItemCount", desc.item_count)
        .text("TableArn", desc.table_arn.as_deref())
        .text("TableId", desc.table_id.as_deref())
        .nested("BillingModeSummary", desc.billing_mode_summary.as_ref(), billing_mode)
        .list("LocalSecondaryIndexes", desc.local_secondary_indexes.as_deref(), local_index)
        .list("GlobalSecondaryIndexes", desc.global_secondary_indexes.as_deref(), global_index)
        .nested("StreamSpecification", desc.stream_specification.as_ref(), stream)
        .text("LatestStreamLabel", desc.latest_stream_label.as_deref())
        .text("LatestStreamArn", desc.latest_stream_arn.as_deref())
        .text("GlobalTableVersion", desc.global_table_version.as_deref())
        .list("Replicas", desc.replicas.as_deref(), replica)
        .list("GlobalTableWitnesses", desc.global_table_witnesses.as_deref(), witness)
        .name(
            "GlobalTableSettingsReplicationMode",
            desc.global_table_settings_replication_mode.as_ref(),
        )
        .nested("RestoreSummary", desc.restore_summary.as_ref(), restore)
        .nested("SSEDescription", desc.sse_description.as_ref(), sse)
        .nested("ArchivalSummary", desc.archival_summary.as_ref(), archival)
        .nested("TableClassSummary", desc.table_class_summary.as_ref(), table_class)
        .value("DeletionProtectionEnabled", desc.deletion_protection_enabled)
        .nested("OnDemandThroughput", desc.on_demand_throughput.as_ref(), on_demand)
        .nested("WarmThroughput", desc.warm_throughput.as_ref(), table_warm_throughput)
        .name("MultiRegionConsistency", desc.multi_region_consistency.as_ref())
        .list("VectorIndexes", desc.vector_indexes.as_deref(), vector_index)
        .build()
}

// =============================================================================
// Indexes
// =============================================================================

fn global_index(index: &GlobalSecondaryIndexDescription) -> Value {
    Fields::new()
        .text("IndexName", index.index_name.as_deref())
        .list("KeySchema", index.key_schema.as_deref(), key_element)
        .nested("Projection", index.projection.as_ref(), projection)
        .name("IndexStatus", index.index_status.as_ref())
        .value("Backfilling", index.backfilling)
        .nested("ProvisionedThroughput", index.provisioned_throughput.as_ref(), throughput)
        .value("IndexSizeBytes", index.index_size_bytes)
        .value("ItemCount", index.item_count)
        .text("IndexArn", index.index_arn.as_deref())
        .nested("OnDemandThroughput", index.on_demand_throughput.as_ref(), on_demand)
        .nested("WarmThroughput", index.warm_throughput.as_ref(), index_warm_throughput)
        .build()
}

fn local_index(index: &LocalSecondaryIndexDescription) -> Value {
    Fields::new()
        .text("IndexName", index.index_name.as_deref())
        .list("KeySchema", index.key_schema.as_deref(), key_element)
        .nested("Projection", index.projection.as_ref(), projection)
        .value("IndexSizeBytes", index.index_size_bytes)
        .value("ItemCount", index.item_count)
        .text("IndexArn", index.index_arn.as_deref())
        .build()
}

fn vector_index(index: &VectorIndexDescription) -> Value {
    Fields::new()
        .text("IndexName", index.index_name.as_deref())
        .list("SearchSchema", index.search_schema.as_deref(), search_element)
        .nested("Projection", index.projection.as_ref(), projection)
        .nested("VectorAttribute", index.vector_attribute.as_ref(), |attr| {
            json!({ "AttributeName": attr.attribute_name() })
        })
        .value("Dimensions", index.dimensions)
        .name("DistanceFunction", index.distance_function.as_ref())
        .name("IndexStatus", index.index_status.as_ref())
        .value("Backfilling", index.backfilling)
        .value("IndexSizeBytes", index.index_size_bytes)
        .value("ItemCount", index.item_count)
        .text("IndexArn", index.index_arn.as_deref())
        .build()
}

fn key_element(element: &KeySchemaElement) -> Value {
    json!({
        "AttributeName": element.attribute_name(),
        "KeyType": element.key_type().as_str(),
    })
}

fn search_element(element: &SearchSchemaElement) -> Value {
    json!({
        "AttributeName": element.attribute_name(),
        "SearchSchemaElementType": element.search_schema_element_type().as_str(),
    })
}

fn attribute_definition(def: &AttributeDefinition) -> Value {
    json!({
        "AttributeName": def.attribute_name(),
        "AttributeType": def.attribute_type().as_str(),
    })
}

fn projection(projection: &Projection) -> Value {
    Fields::new()
        .name("ProjectionType", projection.projection_type.as_ref())
        .value("NonKeyAttributes", projection.non_key_attributes.clone())
        .build()
}

// =============================================================================
// Capacity
// =============================================================================

fn throughput(tp: &ProvisionedThroughputDescription) -> Value {
    Fields::new()
        .time("LastIncreaseDateTime", tp.last_increase_date_time.as_ref())
        .time("LastDecreaseDateTime", tp.last_decrease_date_time.as_ref())
        .value("NumberOfDecreasesToday", tp.number_of_decreases_today)
        .value("ReadCapacityUnits", tp.read_capacity_units)
        .value("WriteCapacityUnits", tp.write_capacity_units)
        .build()
}

fn billing_mode(summary: &BillingModeSummary) -> Value {
    Fields::new()
        .name("BillingMode", summary.billing_mode.as_ref())
        .time(
            "LastUpdateToPayPerRequestDateTime",
            summary.last_update_to_pay_per_request_date_time.as_ref(),
        )
        .build()
}

fn on_demand(tp: &OnDemandThroughput) -> Value {
    Fields::new()
        .value("MaxReadRequestUnits", tp.max_read_request_units)
        .value("MaxWriteRequestUnits", tp.max_write_request_units)
        .build()
}

fn table_warm_throughput(tp: &TableWarmThroughputDescription) -> Value {
    Fields::new()
        .value("ReadUnitsPerSecond", tp.read_units_per_second)
        .value("WriteUnitsPerSecond", tp.write_units_per_second)
        .name("Status", tp.status.as_ref())
        .build()
}

fn index_warm_throughput(tp: &GlobalSecondaryIndexWarmThroughputDescription) -> Value {
    Fields::new()
        .value("ReadUnitsPerSecond", tp.read_units_per_second)
        .value("WriteUnitsPerSecond", tp.write_units_per_second)
        .name("Status", tp.status.as_ref())
        .build()
}

fn throughput_override(tp: &ProvisionedThroughputOverride) -> Value {
    Fields::new()
        .value("ReadCapacityUnits", tp.read_capacity_units)
        .build()
}

fn on_demand_override(tp: &OnDemandThroughputOverride) -> Value {
    Fields::new()
        .value("MaxReadRequestUnits", tp.max_read_request_units)
        .build()
}

// =============================================================================
// Table features
// =============================================================================

fn stream(spec: &StreamSpecification) -> Value {
    Fields::new()
        .value("StreamEnabled", Some(spec.stream_enabled))
        .name("StreamViewType", spec.stream_view_type.as_ref())
        .build()
}

fn sse(desc: &SseDescription) -> Value {
    Fields::new()
        .name("Status", desc.status.as_ref())
        .name("SSEType", desc.sse_type.as_ref())
        .text("KMSMasterKeyArn", desc.kms_master_key_arn.as_deref())
        .time(
            "InaccessibleEncryptionDateTime",
            desc.inaccessible_encryption_date_time.as_ref(),
        )
        .build()
}

fn table_class(summary: &TableClassSummary) -> Value {
    Fields::new()
        .name("TableClass", summary.table_class.as_ref())
        .time("LastUpdateDateTime", summary.last_update_date_time.as_ref())
        .build()
}

fn archival(summary: &ArchivalSummary) -> Value {
    Fields::new()
        .time("ArchivalDateTime", summary.archival_date_time.as_ref())
        .text("ArchivalReason", summary.archival_reason.as_deref())
        .text("ArchivalBackupArn", summary.archival_backup_arn.as_deref())
        .build()
}

fn restore(summary: &RestoreSummary) -> Value {
    Fields::new()
        .text("SourceBackupArn", summary.source_backup_arn.as_deref())
        .text("SourceTableArn", summary.source_table_arn.as_deref())
        .time("RestoreDateTime", Some(&summary.restore_date_time))
        .value("RestoreInProgress", Some(summary.restore_in_progress))
        .build()
}

fn replica(replica: &ReplicaDescription) -> Value {
    Fields::new()
        .text("RegionName", replica.region_name.as_deref())
        .name("ReplicaStatus", replica.replica_status.as_ref())
        .text("ReplicaArn", replica.replica_arn.as_deref())
        .text("ReplicaStatusDescription", replica.replica_status_description.as_deref())
        .text(
            "ReplicaStatusPercentProgress",
            replica.replica_status_percent_progress.as_deref(),
        )
        .text("KMSMasterKeyId", replica.kms_master_key_id.as_deref())
        .nested(
            "ProvisionedThroughputOverride",
            replica.provisioned_throughput_override.as_ref(),
            throughput_override,
        )
        .nested(
            "OnDemandThroughputOverride",
            replica.on_demand_throughput_override.as_ref(),
            on_demand_override,
        )
        .nested("WarmThroughput", replica.warm_throughput.as_ref(), table_warm_throughput)
        .list(
            "GlobalSecondaryIndexes",
            replica.global_secondary_indexes.as_deref(),
            replica_index,
        )
        .time(
            "ReplicaInaccessibleDateTime",
            replica.replica_inaccessible_date_time.as_ref(),
        )
        .nested(
            "ReplicaTableClassSummary",
            replica.replica_table_class_summary.as_ref(),
            table_class,
        )
        .name(
            "GlobalTableSettingsReplicationMode",
            replica.global_table_settings_replication_mode.as_ref(),
        )
        .build()
}

fn replica_index(index: &ReplicaGlobalSecondaryIndexDescription) -> Value {
    Fields::new()
        .text("IndexName", index.index_name.as_deref())
        .nested(
            "ProvisionedThroughputOverride",
            index.provisioned_throughput_override.as_ref(),
            throughput_override,
        )
        .nested(
            "OnDemandThroughputOverride",
            index.on_demand_throughput_override.as_ref(),
            on_demand_override,
        )
        .nested("WarmThroughput", index.warm_throughput.as_ref(), index_warm_throughput)
        .build()
}

fn witness(witness: &GlobalTableWitnessDescription) -> Value {
    Fields::new()
        .text("RegionName", witness.region_name.as_deref())
        .name("WitnessStatus", witness.witness_status.as_ref())
        .build()
}

// =============================================================================
// Object builder
// =============================================================================

/// JSON object builder that skips absent fields.
struct Fields(Map<String, Value>);

impl Fields {
    fn new() -> Self {
        Self(Map::new())
    }

    fn value(mut self, key: &str, value: Option<impl Into<Value>>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    fn text(self, key: &str, value: Option<&str>) -> Self {
        self.value(key, value)
    }

    /// Service enums render as their wire string.
    fn name(self, key: &str, value: Option<&impl AsRef<str>>) -> Self {
        self.value(key, value.map(|v| v.as_ref().to_string()))
    }

    fn time(self, key: &str, value: Option<&DateTime>) -> Self {
        self.value(key, value.map(timestamp))
    }

    fn nested<T>(self, key: &str, value: Option<&T>, render: impl Fn(&T) -> Value) -> Self {
        self.value(key, value.map(render))
    }

    fn list<T>(self, key: &str, values: Option<&[T]>, render: impl Fn(&T) -> Value) -> Self {
        self.value(
            key,
            values.map(|values| Value::Array(values.iter().map(render).collect())),
        )
    }

    fn build(self) -> Value {
        Value::Object(self.0)
    }
}

fn timestamp(dt: &DateTime) -> Value {
    dt.fmt(DateTimeFormat::DateTime)
        .map(Value::String)
        .unwrap_or_else(|_| Value::from(dt.secs()))
}
