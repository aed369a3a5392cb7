//! Provider configuration.
//!
//! The provider needs an API endpoint and a credential. Both can be supplied
//! programmatically or picked up from the environment:
//!
//! - `SILO_API_KEY` - API key (required)
//! - `SILO_API_HOST` - API endpoint (optional, defaults to the public API)

use serde::{Deserialize, Serialize};
use url::Url;

/// Default Silo API endpoint.
pub const DEFAULT_API_HOST: &str = "https://api.silo.dev";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while assembling provider configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("invalid API host: {0}")]
    InvalidHost(#[from] url::ParseError),
}

/// Connection settings for the Silo API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the Silo API.
    #[serde(default = "default_host")]
    pub host: String,

    /// API key sent in the `X-Api-Key` header.
    pub api_key: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User agent reported to the API.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("silo-provider/{}", env!("CARGO_PKG_VERSION"))
}

impl ApiConfig {
    /// Configuration for `api_key` against the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            api_key: api_key.into(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Replace the API endpoint.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Read configuration from `SILO_API_KEY` and, if set, `SILO_API_HOST`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            std::env::var("SILO_API_KEY").map_err(|_| ConfigError::MissingEnv("SILO_API_KEY"))?;

        let mut config = Self::new(api_key);
        if let Ok(host) = std::env::var("SILO_API_HOST") {
            config.host = host;
        }
        config.validate()?;

        Ok(config)
    }

    /// Check that the configured host parses as an absolute URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.host)?;
        Ok(())
    }
}
