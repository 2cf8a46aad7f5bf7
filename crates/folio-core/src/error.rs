//! Handler failures.
//!
//! Expected outcomes such as an unknown path, an unbound method, or a form
//! that fails validation are values. They never travel as errors.
//! [`PageError`] is reserved for what the pipeline cannot recover from. It
//! marks the request span failed and is handed to the transport, which picks
//! the final status.

use std::time::Duration;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`PageError`].
pub type PageResult<T> = Result<T, PageError>;

/// Classification of a [`PageError`], used for span status and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The handler or something it called failed.
    Fault,
    /// The request exceeded its time budget.
    Timeout,
    /// The connection went away before a response was produced.
    Aborted,
}

impl ErrorKind {
    /// Stable lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fault => "fault",
            Self::Timeout => "timeout",
            Self::Aborted => "aborted",
        }
    }
}

/// An unexpected failure while handling a request.
///
/// ```
/// use folio_core::{ErrorKind, PageError};
///
/// fn load() -> Result<(), PageError> {
///     let err = std::io::Error::new(std::io::ErrorKind::Other, "store offline");
///     Err(PageError::from_error(err))
/// }
///
/// let err = load().unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Fault);
/// assert_eq!(err.to_string(), "handler fault: store offline");
/// ```
#[derive(Error, Debug)]
pub enum PageError {
    /// A handler fault.
    #[error("handler fault: {message}")]
    Fault {
        /// Human-readable description.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The request timed out and its handler was cancelled.
    #[error("request timed out after {}ms", after.as_millis())]
    Timeout {
        /// The budget that was exceeded.
        after: Duration,
    },

    /// The request was abandoned before completion.
    #[error("request aborted")]
    Aborted,
}

impl PageError {
    /// A fault with a message and no underlying error.
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
            source: None,
        }
    }

    /// A fault wrapping an underlying error.
    #[must_use]
    pub fn from_error(err: impl Into<anyhow::Error>) -> Self {
        let source = err.into();
        Self::Fault {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// A timeout after `after`.
    #[must_use]
    pub const fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// The error's classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Fault { .. } => ErrorKind::Fault,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Aborted => ErrorKind::Aborted,
        }
    }

    /// The status the transport answers with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Fault { .. } | Self::Aborted => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        Self::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_fault_without_source() {
        let err = PageError::fault("boom");
        assert_eq!(err.kind(), ErrorKind::Fault);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_anyhow_conversion_keeps_source() {
        let err: PageError = anyhow::anyhow!("database locked").into();
        assert_eq!(err.to_string(), "handler fault: database locked");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_question_mark_in_handler_code() {
        fn parse(input: &str) -> PageResult<u32> {
            let n: u32 = input.parse().map_err(PageError::from_error)?;
            Ok(n)
        }
        assert_eq!(parse("7").unwrap(), 7);
        assert_eq!(parse("x").unwrap_err().kind(), ErrorKind::Fault);
    }

    #[test]
    fn test_timeout() {
        let err = PageError::timeout(Duration::from_millis(250));
        assert_eq!(err.kind().as_str(), "timeout");
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.to_string(), "request timed out after 250ms");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ErrorKind::Aborted).unwrap(), "\"aborted\"");
    }
}
