//! Provider-level error handling.
//!
//! API errors pass through unwrapped so callers can react to the underlying
//! status; timeouts and import failures are wrapped with enough context to
//! identify the resource involved.

use std::time::Duration;

use crate::{api::ApiError, config::ConfigError};

/// Error type for resource adapter operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A bounded poll exceeded its deadline.
    #[error("timed out after {after:?} waiting for {resource} to be {operation}")]
    Timeout {
        resource: String,
        operation: &'static str,
        after: Duration,
    },

    /// Import identifier did not match the expected format.
    #[error("invalid import ID, must be of the form <organization>.<slug_perm>, got: {0}")]
    InvalidImportId(String),

    /// Import is not implemented for this resource type.
    #[error("resource type {0} does not support import")]
    ImportUnsupported(&'static str),

    /// A required attribute is absent from the declared state.
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),

    /// An attribute value does not satisfy the resource schema.
    #[error("invalid value for attribute `{key}`: {reason}")]
    InvalidAttribute { key: &'static str, reason: String },

    /// A request payload failed validation before being sent.
    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl ProviderError {
    /// True when the underlying cause is an absent remote resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(ApiError::NotFound))
    }
}
