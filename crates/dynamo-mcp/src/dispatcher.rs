//! Routes a tool call by name: lookup, validation, execution.

use crate::client::DynamoBackend;
use crate::envelope::ResultEnvelope;
use crate::executor::ToolExecutor;
use crate::tools::ToolRegistry;
use crate::validator::ArgumentValidator;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Dispatches tool calls to their adapters.
///
/// Every call produces exactly one [`ResultEnvelope`]; no failure escapes
/// as an error or panic, and no service call is made for a call that fails
/// lookup or validation.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
}

impl Dispatcher {
    /// Create a dispatcher over an explicit registry.
    pub fn new(registry: ToolRegistry, backend: Arc<dyn DynamoBackend>) -> Self {
        Self {
            registry: Arc::new(registry),
            executor: ToolExecutor::new(backend),
        }
    }

    /// Create a dispatcher over the full tool catalog.
    pub fn with_catalog(backend: Arc<dyn DynamoBackend>) -> Self {
        Self::new(ToolRegistry::catalog(), backend)
    }

    /// The registry this dispatcher routes into.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one tool call.
    pub async fn dispatch(&self, name: &str, arguments: &Value) -> ResultEnvelope {
        let Some(registered) = self.registry.get(name) else {
            tracing::info!(tool = %name, "Unknown tool requested");
            return ResultEnvelope::unknown_tool(name);
        };

        let arguments = match ArgumentValidator::new(&registered.spec).validate_value(arguments) {
            Ok(arguments) => arguments,
            Err(err) => {
                tracing::info!(tool = %name, error = %err, "Tool arguments rejected");
                return ResultEnvelope::validation(name, &err);
            }
        };

        tracing::debug!(tool = %name, "Dispatching tool call");
        let started = Instant::now();
        let envelope = self.executor.execute(registered.tool, &arguments).await;

        tracing::info!(
            tool = %name,
            success = envelope.success,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tool call completed"
        );

        envelope
    }
}
