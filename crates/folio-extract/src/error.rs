//! Extraction error types.
//!
//! These cover a request whose query string or body cannot even be read as
//! fields. A body that parses but fails a schema is a [`Validation`] outcome
//! instead.
//!
//! [`Validation`]: crate::Validation

use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// Where the unreadable data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// The URL query string.
    Query,
    /// The request body.
    Body,
    /// The `Content-Type` header.
    ContentType,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::ContentType => write!(f, "content-type"),
        }
    }
}

/// A request part could not be read as fields.
///
/// ```rust
/// use folio_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::payload_too_large(1024, 2048);
/// assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
/// assert_eq!(err.origin(), ExtractionSource::Body);
/// ```
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The body exceeded the configured limit.
    #[error("payload too large: max {limit} bytes, got {actual} bytes")]
    PayloadTooLarge {
        /// Configured limit.
        limit: usize,
        /// Received size.
        actual: usize,
    },

    /// The body was sent with a content type the parser does not read.
    #[error("unsupported content type: expected '{expected}', got '{}'", actual.as_deref().unwrap_or("none"))]
    UnsupportedMediaType {
        /// The accepted media type.
        expected: &'static str,
        /// The received media type, if any.
        actual: Option<String>,
    },

    /// The data was not valid UTF-8.
    #[error("invalid UTF-8 in {origin}: {details}")]
    InvalidUtf8 {
        /// Where the bytes came from.
        origin: ExtractionSource,
        /// Decoder message.
        details: String,
    },

    /// The data was not well-formed `application/x-www-form-urlencoded`.
    #[error("malformed {origin}: {details}")]
    Malformed {
        /// Where the data came from.
        origin: ExtractionSource,
        /// Parser message.
        details: String,
    },
}

impl ExtractionError {
    /// Creates an error for a body that is too large.
    #[must_use]
    pub fn payload_too_large(limit: usize, actual: usize) -> Self {
        Self::PayloadTooLarge { limit, actual }
    }

    /// Creates an error for a content type the parser does not read.
    #[must_use]
    pub fn unsupported_media_type(expected: &'static str, actual: Option<&str>) -> Self {
        Self::UnsupportedMediaType {
            expected,
            actual: actual.map(str::to_string),
        }
    }

    /// Creates an error for data that could not be decoded.
    #[must_use]
    pub fn malformed(origin: ExtractionSource, details: impl Into<String>) -> Self {
        Self::Malformed {
            origin,
            details: details.into(),
        }
    }

    /// Where the failure happened.
    #[must_use]
    pub fn origin(&self) -> ExtractionSource {
        match self {
            Self::PayloadTooLarge { .. } => ExtractionSource::Body,
            Self::UnsupportedMediaType { .. } => ExtractionSource::ContentType,
            Self::InvalidUtf8 { origin, .. } | Self::Malformed { origin, .. } => *origin,
        }
    }

    /// The status used when the pipeline answers with this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InvalidUtf8 { .. } | Self::Malformed { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable code for error bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            Self::InvalidUtf8 { .. } => "INVALID_ENCODING",
            Self::Malformed { .. } => "MALFORMED_FIELDS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_too_large() {
        let err = ExtractionError::payload_too_large(1024, 2048);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn test_unsupported_media_type_without_header() {
        let err = ExtractionError::unsupported_media_type("application/x-www-form-urlencoded", None);
        assert_eq!(err.origin(), ExtractionSource::ContentType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().ends_with("got 'none'"));
    }

    #[test]
    fn test_malformed_query() {
        let err = ExtractionError::malformed(ExtractionSource::Query, "bad escape");
        assert_eq!(err.origin(), ExtractionSource::Query);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "malformed query: bad escape");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::ContentType.to_string(), "content-type");
    }
}
