//! Error classification for Silo API responses.

use http::StatusCode;

/// Error type for Silo API operations.
///
/// The status codes the adapters react to get their own variants; anything
/// else is carried as `Unexpected` with the raw response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote resource does not exist (404).
    #[error("resource not found")]
    NotFound,

    /// The API rejected the request as semantically invalid (422).
    #[error("unprocessable request: {0}")]
    Unprocessable(String),

    /// Any other non-success status.
    #[error("unexpected API response: {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
}
