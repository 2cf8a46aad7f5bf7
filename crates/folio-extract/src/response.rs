//! Response builders for common HTTP response types.
//!
//! | Builder | Content-Type | Description |
//! |---------|--------------|-------------|
//! | [`HtmlResponse`] | `text/html; charset=utf-8` | Serialized render tree or raw markup |
//! | [`JsonResponse`] | `application/json` | JSON serialized body |
//! | [`TextResponse`] | `text/plain; charset=utf-8` | Plain text |
//! | [`Redirect`] | n/a | `303 See Other` and friends |
//!
//! Every builder yields an `http::Response<Bytes>`, the body type the rest of
//! the pipeline passes around.

use bytes::Bytes;
use folio_core::{Markup, StatusText};
use http::{header, HeaderValue, Response, StatusCode};
use serde::Serialize;

use crate::error::ExtractionError;
use crate::schema::Issue;

/// Content type of rendered markup.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type of JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of plain-text bodies.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// HTML response builder.
///
/// ```rust
/// use folio_core::el;
/// use folio_extract::response::HtmlResponse;
///
/// let response = HtmlResponse::render(&el("h1").text("todos").into()).into_response();
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.body().as_ref(), b"<h1>todos</h1>");
/// ```
#[derive(Debug, Clone)]
pub struct HtmlResponse {
    body: String,
    status: StatusCode,
}

impl HtmlResponse {
    /// Wraps already serialized markup with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Serializes a render tree with status 200 OK.
    #[must_use]
    pub fn render(markup: &Markup) -> Self {
        Self::new(markup.render())
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// The body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        build(self.status, HTML_CONTENT_TYPE, Bytes::from(self.body))
    }
}

/// JSON response builder.
///
/// ```rust
/// use folio_extract::response::JsonResponse;
///
/// let response = JsonResponse::new(vec!["a", "b"]).into_response();
/// assert_eq!(response.body().as_ref(), br#"["a","b"]"#);
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// The status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds the HTTP response.
    ///
    /// A value that fails to serialize yields a bare 500.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        match serde_json::to_vec(&self.data) {
            Ok(body) => build(self.status, JSON_CONTENT_TYPE, Bytes::from(body)),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize JSON response");
                build(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    TEXT_CONTENT_TYPE,
                    Bytes::from_static(b"Internal Server Error"),
                )
            }
        }
    }
}

/// Plain text response builder.
#[derive(Debug, Clone)]
pub struct TextResponse {
    body: String,
    status: StatusCode,
    status_text: Option<String>,
}

impl TextResponse {
    /// Creates a text response with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
            status_text: None,
        }
    }

    /// A 404 whose body and status text are `text`.
    #[must_use]
    pub fn not_found(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            body: text.clone(),
            status: StatusCode::NOT_FOUND,
            status_text: Some(text),
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Attaches a [`StatusText`] extension.
    #[must_use]
    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = build(self.status, TEXT_CONTENT_TYPE, Bytes::from(self.body));
        if let Some(text) = self.status_text {
            response.extensions_mut().insert(StatusText::new(text));
        }
        response
    }
}

/// Redirect builder.
///
/// ```rust
/// use folio_extract::response::Redirect;
///
/// let response = Redirect::see_other("/").into_response();
/// assert_eq!(response.status(), http::StatusCode::SEE_OTHER);
/// assert_eq!(response.headers()["location"], "/");
/// ```
#[derive(Debug, Clone)]
pub struct Redirect {
    status: StatusCode,
    location: String,
}

impl Redirect {
    /// `303 See Other`, the usual answer to a form post.
    #[must_use]
    pub fn see_other(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SEE_OTHER,
            location: location.into(),
        }
    }

    /// `302 Found`.
    #[must_use]
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FOUND,
            location: location.into(),
        }
    }

    /// Builds the HTTP response.
    ///
    /// A location that is not a valid header value yields a bare 500.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        match HeaderValue::try_from(self.location) {
            Ok(location) => {
                let mut response = Response::new(Bytes::new());
                *response.status_mut() = self.status;
                response.headers_mut().insert(header::LOCATION, location);
                response
            }
            Err(err) => {
                tracing::error!(error = %err, "invalid redirect location");
                let mut response = Response::new(Bytes::new());
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}

/// The default answer to a failed validation: 422 with a JSON array of
/// `{field, message}` records, one per issue.
///
/// ```rust
/// use folio_extract::{response::validation_failure, Issue};
///
/// let response = validation_failure(&[Issue::new("todo", "Required")]);
/// assert_eq!(response.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
/// assert_eq!(
///     response.body().as_ref(),
///     br#"[{"field":"todo","message":"Required"}]"#
/// );
/// ```
#[must_use]
pub fn validation_failure(issues: &[Issue]) -> Response<Bytes> {
    JsonResponse::new(issues)
        .with_status(StatusCode::UNPROCESSABLE_ENTITY)
        .into_response()
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

/// The answer to a request whose query or body cannot be read.
#[must_use]
pub fn extraction_failure(err: &ExtractionError) -> Response<Bytes> {
    JsonResponse::new(ErrorBody {
        code: err.error_code(),
        message: err.to_string(),
    })
    .with_status(err.status_code())
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::el;

    fn content_type(response: &Response<Bytes>) -> &str {
        response.headers()[header::CONTENT_TYPE].to_str().unwrap()
    }

    #[test]
    fn test_html_response() {
        let response = HtmlResponse::render(&el("p").text("a&b").into())
            .with_status(StatusCode::CREATED)
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(content_type(&response), HTML_CONTENT_TYPE);
        assert_eq!(response.body().as_ref(), b"<p>a&amp;b</p>");
    }

    #[test]
    fn test_validation_failure_lists_all_issues() {
        let response = validation_failure(&[
            Issue::new("name", "Required"),
            Issue::new("qty", "Expected integer, received \"x\""),
        ]);
        assert_eq!(content_type(&response), JSON_CONTENT_TYPE);
        let body: Vec<Issue> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body[1].field, "qty");
    }

    #[test]
    fn test_not_found_text_carries_status_text() {
        let response = TextResponse::not_found("Not Found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(StatusText::of(&response), Some("Not Found"));
        assert_eq!(content_type(&response), TEXT_CONTENT_TYPE);
    }

    #[test]
    fn test_extraction_failure_body() {
        let err = ExtractionError::payload_too_large(1, 2);
        let response = extraction_failure(&err);
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_redirect_with_bad_location() {
        let response = Redirect::to("/bad\nlocation").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::LOCATION).is_none());
    }
}
