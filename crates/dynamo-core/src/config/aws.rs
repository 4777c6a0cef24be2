//! External database client configuration.
//!
//! Credentials are never stored here. They come from the standard AWS
//! environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`,
//! `AWS_SESSION_TOKEN`) through the SDK's default provider chain, and are
//! only checked by the service on first use.

use serde::{Deserialize, Serialize};

/// Connection settings for the DynamoDB client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsConfig {
    /// Region override. `AWS_REGION` replaces the file value when set.
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint, e.g. `http://localhost:8000` for DynamoDB Local.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Named profile from the shared AWS config files. `AWS_PROFILE` replaces
    /// the file value when set.
    #[serde(default)]
    pub profile: Option<String>,
}

impl AwsConfig {
    /// Whether the client targets a non-default endpoint.
    pub fn has_custom_endpoint(&self) -> bool {
        self.endpoint_url.is_some()
    }
}
