//! Handler selection and invocation.
//!
//! A page answers a method only if its definition binds a handler to it.
//! Methods outside [`PageMethod`] (`HEAD`, `OPTIONS`, ...) are never bound.

use bytes::Bytes;
use folio_core::{BoxedHandler, PageDefinition, PageMethod, PageOutcome, PageResult, RequestContext};
use folio_extract::response::TextResponse;
use http::{Method, Response};

/// The handler a page binds to a request method.
#[derive(Clone)]
pub enum Selection<'p> {
    /// The page answers the method with this handler.
    Handler(PageMethod, &'p BoxedHandler),
    /// The page defines nothing for the method.
    Unsupported,
}

impl std::fmt::Debug for Selection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handler(method, _) => f.debug_tuple("Handler").field(method).finish(),
            Self::Unsupported => f.write_str("Unsupported"),
        }
    }
}

/// Picks the handler `page` binds to `method`.
///
/// ```rust
/// use folio_core::{el, PageDefinition, PageOutcome, RequestContext};
/// use folio_server::invoke::{select, Selection};
/// use http::Method;
///
/// let page = PageDefinition::new()
///     .post(|_ctx: RequestContext| async { Ok(PageOutcome::render(el("li"))) });
///
/// assert!(matches!(select(&page, &Method::POST), Selection::Handler(..)));
/// assert!(matches!(select(&page, &Method::GET), Selection::Unsupported));
/// assert!(matches!(select(&page, &Method::HEAD), Selection::Unsupported));
/// ```
pub fn select<'p>(page: &'p PageDefinition, method: &Method) -> Selection<'p> {
    PageMethod::from_http(method)
        .and_then(|m| page.handler(m).map(|handler| Selection::Handler(m, handler)))
        .unwrap_or(Selection::Unsupported)
}

/// Runs `handler` with `ctx`.
pub async fn invoke(handler: &BoxedHandler, ctx: RequestContext) -> PageResult<PageOutcome> {
    handler.handle(ctx).await
}

/// The status text of a 404 for an unsupported method.
#[must_use]
pub fn unsupported_status_text(route: &str, method: &Method) -> String {
    format!("{route} doesn't handle '{method}' method")
}

/// The 404 answered for an unsupported method.
#[must_use]
pub fn unsupported(route: &str, method: &Method) -> Response<Bytes> {
    TextResponse::not_found(unsupported_status_text(route, method)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{el, StatusText};
    use http::StatusCode;

    fn page() -> PageDefinition {
        PageDefinition::new().get(|ctx: RequestContext| async move {
            Ok(PageOutcome::render(el("p").text(ctx.path().to_string())))
        })
    }

    #[tokio::test]
    async fn test_selected_handler_runs() {
        let page = page();
        let Selection::Handler(method, handler) = select(&page, &Method::GET) else {
            panic!("GET should be bound");
        };
        assert_eq!(method, PageMethod::Get);

        let ctx = RequestContext::builder(method, "/items").build();
        match invoke(handler, ctx).await.unwrap() {
            PageOutcome::Render(markup) => assert_eq!(markup.render(), "<p>/items</p>"),
            PageOutcome::Terminal(_) => panic!("expected render tree"),
        }
    }

    #[test]
    fn test_every_unbound_method_is_unsupported() {
        let page = page();
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS] {
            assert!(matches!(select(&page, &method), Selection::Unsupported));
        }
    }

    #[test]
    fn test_unsupported_response() {
        let response = unsupported("/items", &Method::DELETE);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            StatusText::of(&response),
            Some("/items doesn't handle 'DELETE' method")
        );
    }
}
