//! The render decision.
//!
//! A terminal outcome is sent untouched. A render tree is sent bare to a
//! fragment request and inside the layout otherwise, always as
//! `text/html; charset=utf-8` with status 200.

use bytes::Bytes;
use folio_core::{Layout, PageOutcome};
use folio_extract::response::HtmlResponse;
use http::{HeaderMap, Response};

/// Default name of the header that marks a fragment request.
pub const DEFAULT_FRAGMENT_HEADER: &str = "HX-Request";

/// Whether `headers` carry `name` with the value `true` (any case) or `1`.
///
/// ```rust
/// use folio_server::render::is_fragment_request;
/// use http::{HeaderMap, HeaderValue};
///
/// let mut headers = HeaderMap::new();
/// assert!(!is_fragment_request(&headers, "HX-Request"));
///
/// headers.insert("hx-request", HeaderValue::from_static("true"));
/// assert!(is_fragment_request(&headers, "HX-Request"));
/// ```
pub fn is_fragment_request(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Turns a handler outcome into the response.
pub fn finalize(outcome: PageOutcome, fragment: bool, layout: &dyn Layout) -> Response<Bytes> {
    match outcome {
        PageOutcome::Terminal(response) => response,
        PageOutcome::Render(tree) => {
            let tree = if fragment { tree } else { layout.compose(tree) };
            HtmlResponse::render(&tree).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{el, DocumentLayout, Markup};
    use folio_extract::response::JsonResponse;
    use http::{header, HeaderValue, StatusCode};

    fn tree() -> Markup {
        el("section").attr("class", "todoapp").text("todos").into()
    }

    fn body(response: &Response<Bytes>) -> &str {
        std::str::from_utf8(response.body()).unwrap()
    }

    #[test]
    fn test_fragment_is_bare() {
        let layout = DocumentLayout::new("todos");
        let response = finalize(PageOutcome::render(tree()), true, &layout);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(body(&response), r#"<section class="todoapp">todos</section>"#);
    }

    #[test]
    fn test_full_page_is_wrapped() {
        let layout = DocumentLayout::new("todos");
        let response = finalize(PageOutcome::render(tree()), false, &layout);

        let html = body(&response);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<head>"));
        assert!(html.contains(r#"<body><section class="todoapp">todos</section></body>"#));
    }

    #[test]
    fn test_terminal_passes_through() {
        let layout = DocumentLayout::new("todos");
        let terminal = JsonResponse::new(["a"])
            .with_status(StatusCode::CREATED)
            .into_response();
        let response = finalize(PageOutcome::terminal(terminal), false, &layout);

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().as_ref(), br#"["a"]"#);
    }

    #[test]
    fn test_same_input_same_bytes() {
        let layout = DocumentLayout::new("todos");
        for fragment in [true, false] {
            let a = finalize(PageOutcome::render(tree()), fragment, &layout);
            let b = finalize(PageOutcome::render(tree()), fragment, &layout);
            assert_eq!(a.body(), b.body());
        }
    }

    #[test]
    fn test_fragment_header_values() {
        let check = |value: &'static str| {
            let mut headers = HeaderMap::new();
            headers.insert("hx-request", HeaderValue::from_static(value));
            is_fragment_request(&headers, DEFAULT_FRAGMENT_HEADER)
        };
        assert!(check("true"));
        assert!(check("TRUE"));
        assert!(check("1"));
        assert!(!check("false"));
        assert!(!check("yes"));
        assert!(!check(""));
    }
}
