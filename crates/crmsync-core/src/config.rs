//! Configuration types for the sync system

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote profile API settings
    pub api: ApiConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Remote profile API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the remote profile API, without a trailing slash
    pub base_url: String,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deadline for a single outbound request (in seconds)
    ///
    /// This is the only timeout in the system; there is no retry tier above
    /// it. Handed to the transport builder at wiring time.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl SyncConfig {
    /// Create a configuration for the given remote base URL with default
    /// engine settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Configuration is usable
    /// - `Err(Error::Config)`: Base URL is empty or not http(s)
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(Error::config("API base URL must not be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::config(format!(
                "API base URL must be http(s): {}",
                base_url
            )));
        }
        Ok(())
    }
}
