//! Request context types.
//!
//! The [`RequestContext`] is built once per request, after routing and body
//! parsing, and handed to exactly one handler. It is never mutated after
//! construction.

use std::time::Instant;

use folio_router::PageMethod;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::FieldMap;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines for consecutive requests
/// sortable by id.
///
/// ```
/// use folio_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Everything a handler may read about the request it serves.
///
/// - the resolved query parameters (dynamic route segments first, then the
///   URL query string)
/// - the parsed form fields of the submitted body
/// - whether the caller asked for a fragment rather than a full document
///
/// ```
/// use folio_core::{FieldMap, RequestContext};
/// use folio_router::PageMethod;
///
/// let ctx = RequestContext::builder(PageMethod::Post, "/items")
///     .form([("name", "Buy milk")].into_iter().collect())
///     .fragment(true)
///     .build();
///
/// assert_eq!(ctx.form().get("name"), Some("Buy milk"));
/// assert!(ctx.is_fragment());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: PageMethod,
    path: String,
    pattern: Option<String>,
    query: FieldMap,
    form: FieldMap,
    fragment: bool,
    started_at: Instant,
}

impl RequestContext {
    /// Starts building a context for `method` on `path`.
    #[must_use]
    pub fn builder(method: PageMethod, path: impl Into<String>) -> RequestContextBuilder {
        RequestContextBuilder {
            request_id: None,
            method,
            path: path.into(),
            pattern: None,
            query: FieldMap::new(),
            form: FieldMap::new(),
            fragment: false,
        }
    }

    /// The request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The request method.
    #[must_use]
    pub const fn method(&self) -> PageMethod {
        self.method
    }

    /// The request path, without query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The route pattern that matched, when known.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Resolved query parameters.
    #[must_use]
    pub fn query(&self) -> &FieldMap {
        &self.query
    }

    /// Submitted form fields.
    #[must_use]
    pub fn form(&self) -> &FieldMap {
        &self.form
    }

    /// Whether only the updated portion of the page was requested.
    #[must_use]
    pub const fn is_fragment(&self) -> bool {
        self.fragment
    }

    /// When the context was built.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Builder for [`RequestContext`].
#[derive(Debug, Clone)]
pub struct RequestContextBuilder {
    request_id: Option<RequestId>,
    method: PageMethod,
    path: String,
    pattern: Option<String>,
    query: FieldMap,
    form: FieldMap,
    fragment: bool,
}

impl RequestContextBuilder {
    /// Uses an existing request ID instead of generating one.
    pub fn request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Records the matched route pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the resolved query parameters.
    pub fn query(mut self, query: FieldMap) -> Self {
        self.query = query;
        self
    }

    /// Sets the submitted form fields.
    pub fn form(mut self, form: FieldMap) -> Self {
        self.form = form;
        self
    }

    /// Marks the request as a fragment request.
    pub fn fragment(mut self, fragment: bool) -> Self {
        self.fragment = fragment;
        self
    }

    /// Finishes the context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            request_id: self.request_id.unwrap_or_default(),
            method: self.method,
            path: self.path,
            pattern: self.pattern,
            query: self.query,
            form: self.form,
            fragment: self.fragment,
            started_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn test_request_id_serializes_transparently() {
        let id = RequestId::from(Uuid::nil());
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"00000000-0000-0000-0000-000000000000\""
        );
    }

    #[test]
    fn test_builder_defaults() {
        let ctx = RequestContext::builder(PageMethod::Get, "/").build();
        assert_eq!(ctx.method(), PageMethod::Get);
        assert_eq!(ctx.path(), "/");
        assert!(ctx.query().is_empty());
        assert!(ctx.form().is_empty());
        assert!(!ctx.is_fragment());
        assert_eq!(ctx.pattern(), None);
    }

    #[test]
    fn test_builder_keeps_given_request_id() {
        let id = RequestId::new();
        let ctx = RequestContext::builder(PageMethod::Delete, "/todo/destroy")
            .request_id(id)
            .pattern("/todo/destroy")
            .build();
        assert_eq!(ctx.request_id(), id);
        assert_eq!(ctx.pattern(), Some("/todo/destroy"));
    }
}
