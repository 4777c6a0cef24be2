//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log filter settings. `RUST_LOG` still wins when it is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `dynamo_mcp=debug,info`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
