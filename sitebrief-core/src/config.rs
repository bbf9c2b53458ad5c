use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for the remote summarization endpoint.
///
/// Every field has a default, so a config file only needs the values it
/// overrides. Without an `api_key` every module gets the local heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
