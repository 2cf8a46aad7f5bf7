//! The handler contract.
//!
//! A [`Handler`] is bound to one method of one page. It receives the
//! request's [`RequestContext`] by value and produces a [`PageOutcome`].
//! Async closures implement it directly; synchronous functions go through
//! [`sync_handler`].

use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};

use crate::context::RequestContext;
use crate::error::PageResult;
use crate::outcome::PageOutcome;

/// A function bound to one method on one route.
///
/// # Example
///
/// ```rust
/// use folio_core::{el, Handler, PageOutcome, RequestContext};
/// use folio_router::PageMethod;
///
/// let hello = |ctx: RequestContext| async move {
///     let name = ctx.query().get("name").unwrap_or("world").to_string();
///     Ok(PageOutcome::render(el("p").text(format!("hello {name}"))))
/// };
///
/// let ctx = RequestContext::builder(PageMethod::Get, "/").build();
/// let outcome = tokio_test::block_on(hello.handle(ctx)).unwrap();
/// assert!(!outcome.is_terminal());
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn handle(&self, ctx: RequestContext) -> BoxFuture<'static, PageResult<PageOutcome>>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PageResult<PageOutcome>> + Send + 'static,
{
    fn handle(&self, ctx: RequestContext) -> BoxFuture<'static, PageResult<PageOutcome>> {
        Box::pin(self(ctx))
    }
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Adapts a synchronous function into a [`Handler`].
#[derive(Debug, Clone)]
pub struct SyncHandler<F> {
    func: F,
}

/// Wraps a synchronous function as a [`Handler`].
///
/// ```rust
/// use folio_core::{el, sync_handler, PageDefinition, PageOutcome};
///
/// let page = PageDefinition::new()
///     .get(sync_handler(|_ctx| Ok(PageOutcome::render(el("h1").text("todos")))));
/// assert_eq!(page.allowed().len(), 1);
/// ```
pub fn sync_handler<F>(func: F) -> SyncHandler<F>
where
    F: Fn(RequestContext) -> PageResult<PageOutcome> + Send + Sync + 'static,
{
    SyncHandler { func }
}

impl<F> Handler for SyncHandler<F>
where
    F: Fn(RequestContext) -> PageResult<PageOutcome> + Send + Sync + 'static,
{
    fn handle(&self, ctx: RequestContext) -> BoxFuture<'static, PageResult<PageOutcome>> {
        Box::pin(future::ready((self.func)(ctx)))
    }
}
