//! Query string and form body parsing.
//!
//! Both produce a [`FieldMap`]. Nothing here knows about schemas: values stay
//! strings until a [`FormSchema`](crate::FormSchema) coerces them.

use folio_core::FieldMap;
use http::{header, HeaderMap};

use crate::error::{ExtractionError, ExtractionSource};

/// Default maximum body size for form parsing (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// The only body media type the form parser reads.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Parses a raw query string (without the leading `?`).
///
/// ```rust
/// use folio_extract::parse_query;
///
/// let query = parse_query(Some("action=filter&filter=active")).unwrap();
/// assert_eq!(query.get("action"), Some("filter"));
/// assert!(parse_query(None).unwrap().is_empty());
/// ```
pub fn parse_query(raw: Option<&str>) -> Result<FieldMap, ExtractionError> {
    match raw {
        None | Some("") => Ok(FieldMap::new()),
        Some(raw) => decode(raw, ExtractionSource::Query),
    }
}

/// Parses a URL-encoded request body.
///
/// An empty body yields an empty map whatever its content type, so plain
/// `POST` buttons without fields still reach their handler.
///
/// ```rust
/// use folio_extract::{parse_form, DEFAULT_MAX_BODY_SIZE};
/// use http::{header, HeaderMap, HeaderValue};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::CONTENT_TYPE,
///     HeaderValue::from_static("application/x-www-form-urlencoded"),
/// );
///
/// let form = parse_form(&headers, b"todo=Buy+milk", DEFAULT_MAX_BODY_SIZE).unwrap();
/// assert_eq!(form.get("todo"), Some("Buy milk"));
/// ```
pub fn parse_form(headers: &HeaderMap, body: &[u8], limit: usize) -> Result<FieldMap, ExtractionError> {
    if body.len() > limit {
        return Err(ExtractionError::payload_too_large(limit, body.len()));
    }
    if body.is_empty() {
        return Ok(FieldMap::new());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let accepted = content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.essence_str() == FORM_URLENCODED);
    if !accepted {
        return Err(ExtractionError::unsupported_media_type(
            FORM_URLENCODED,
            content_type,
        ));
    }

    let text = std::str::from_utf8(body).map_err(|e| ExtractionError::InvalidUtf8 {
        origin: ExtractionSource::Body,
        details: e.to_string(),
    })?;
    decode(text, ExtractionSource::Body)
}

fn decode(raw: &str, origin: ExtractionSource) -> Result<FieldMap, ExtractionError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
        .map_err(|e| ExtractionError::malformed(origin, e.to_string()))?;
    Ok(pairs.into_iter().collect())
}
