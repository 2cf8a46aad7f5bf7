//! Test error types.

use folio_core::PageError;
use thiserror::Error;

/// Errors that can occur while sending a test request.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be built.
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// The response body was not what the caller asked for.
    #[error("body read error: {0}")]
    BodyRead(String),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The page handler failed.
    #[error("page error: {0}")]
    Page(#[from] PageError),
}
