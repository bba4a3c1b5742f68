//! Client configuration.

use crate::batch::BatchConfig;
use crate::error::{ClientError, ClientResult};
use alloy::primitives::Address;
use ethereal_signer::KeySource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Exchange deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Testnet,
    Mainnet,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Testnet => "https://api.etherealtest.net",
            Self::Mainnet => "https://api.ethereal.trade",
        }
    }
}

/// Client configuration, usually loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment's URL (local gateways, tests).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout (ms). Default: 10,000.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Max concurrent submissions per batch. 0 = unbounded. Default: 16.
    #[serde(default = "default_max_batch_concurrency")]
    pub max_batch_concurrency: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Environment variable holding the hex private key. Default: `ETHEREAL_PK`.
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
    /// Key file; takes precedence over `private_key_env` when set.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,
    /// If set, the loaded key must derive to this address.
    #[serde(default)]
    pub expected_address: Option<String>,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_batch_concurrency() -> usize {
    16
}

fn default_user_agent() -> String {
    format!("ethereal-rs/{}", env!("CARGO_PKG_VERSION"))
}

fn default_private_key_env() -> String {
    "ETHEREAL_PK".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            request_timeout_ms: default_request_timeout_ms(),
            max_batch_concurrency: default_max_batch_concurrency(),
            user_agent: default_user_agent(),
            private_key_env: default_private_key_env(),
            private_key_file: None,
            expected_address: None,
        }
    }
}

impl ClientConfig {
    /// Defaults pointed at an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ClientError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ClientResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {e}")))
    }

    /// Base URL without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn key_source(&self) -> KeySource {
        match &self.private_key_file {
            Some(path) => KeySource::File { path: path.clone() },
            None => KeySource::EnvVar {
                var_name: self.private_key_env.clone(),
            },
        }
    }

    pub fn expected_address(&self) -> ClientResult<Option<Address>> {
        self.expected_address
            .as_deref()
            .map(|s| {
                s.trim()
                    .parse::<Address>()
                    .map_err(|e| ClientError::Config(format!("invalid expected_address {s:?}: {e}")))
            })
            .transpose()
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            max_concurrency: self.max_batch_concurrency,
        }
    }
}
