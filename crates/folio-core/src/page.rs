//! Page definitions.

use std::fmt;
use std::sync::Arc;

use folio_router::{MethodMap, PageMethod};

use crate::handler::{BoxedHandler, Handler};

/// The handlers one page exposes, at most one per [`PageMethod`].
///
/// A method without a handler is unsupported for the page. The pipeline
/// answers it with a 404 naming the path and method.
///
/// ```rust
/// use folio_core::{el, PageDefinition, PageOutcome, RequestContext};
/// use folio_router::PageMethod;
///
/// let page = PageDefinition::new()
///     .get(|_ctx: RequestContext| async { Ok(PageOutcome::render(el("main"))) });
///
/// assert!(page.handler(PageMethod::Get).is_some());
/// assert!(page.handler(PageMethod::Post).is_none());
/// ```
#[derive(Clone, Default)]
pub struct PageDefinition {
    methods: MethodMap<BoxedHandler>,
}

impl PageDefinition {
    /// A page with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `method`.
    #[must_use]
    pub fn on(mut self, method: PageMethod, handler: impl Handler) -> Self {
        self.methods.set(method, Arc::new(handler));
        self
    }

    /// Binds a `GET` handler.
    #[must_use]
    pub fn get(self, handler: impl Handler) -> Self {
        self.on(PageMethod::Get, handler)
    }

    /// Binds a `POST` handler.
    #[must_use]
    pub fn post(self, handler: impl Handler) -> Self {
        self.on(PageMethod::Post, handler)
    }

    /// Binds a `PUT` handler.
    #[must_use]
    pub fn put(self, handler: impl Handler) -> Self {
        self.on(PageMethod::Put, handler)
    }

    /// Binds a `PATCH` handler.
    #[must_use]
    pub fn patch(self, handler: impl Handler) -> Self {
        self.on(PageMethod::Patch, handler)
    }

    /// Binds a `DELETE` handler.
    #[must_use]
    pub fn delete(self, handler: impl Handler) -> Self {
        self.on(PageMethod::Delete, handler)
    }

    /// The handler for `method`, or `None` when the page does not support it.
    #[must_use]
    pub fn handler(&self, method: PageMethod) -> Option<&BoxedHandler> {
        self.methods.handler(method)
    }

    /// Methods this page supports.
    #[must_use]
    pub fn allowed(&self) -> Vec<PageMethod> {
        self.methods.allowed()
    }
}

impl From<MethodMap<BoxedHandler>> for PageDefinition {
    fn from(methods: MethodMap<BoxedHandler>) -> Self {
        Self { methods }
    }
}

impl fmt::Debug for PageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDefinition")
            .field("allowed", &self.allowed())
            .finish()
    }
}
