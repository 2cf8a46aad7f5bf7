//! The route table.
//!
//! Built once at startup, read-only afterwards. Pages are registered either
//! by their file path below the pages root, which goes through
//! [`page_pattern`], or by an explicit pattern.
//!
//! Resolution order for a request path:
//!
//! 1. a path under the asset prefix is an [`Resolution::Asset`], whatever
//!    pages exist
//! 2. otherwise the router's precedence applies: at every segment a literal
//!    child beats a `{param}` child, which beats a `*rest` catch-all, with
//!    backtracking when a branch dead-ends
//! 3. no match is [`Resolution::NotFound`]

use folio_core::PageDefinition;
use folio_router::{page_pattern, RouteMatch, Router};

use crate::error::{ServerError, ServerResult};

/// Default prefix under which static assets are served.
pub const DEFAULT_ASSET_PREFIX: &str = "/static/";

/// What a request path resolved to.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// A static asset; holds the path relative to the asset directory.
    Asset(&'a str),
    /// A page.
    Page(RouteMatch<'a, PageDefinition>),
    /// Nothing.
    NotFound,
}

/// Maps request paths to page definitions.
///
/// ```rust
/// use folio_core::{el, PageDefinition, PageOutcome, RequestContext};
/// use folio_server::{Resolution, RouteTable};
///
/// let page = || PageDefinition::new()
///     .get(|_ctx: RequestContext| async { Ok(PageOutcome::render(el("main"))) });
///
/// let table = RouteTable::builder()
///     .page("index.rs", page())?
///     .page("todo/[id].rs", page())?
///     .build();
///
/// match table.resolve("/todo/42") {
///     Resolution::Page(found) => {
///         assert_eq!(found.pattern, "/todo/{id}");
///         assert_eq!(found.params.get("id"), Some("42"));
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// assert!(matches!(table.resolve("/static/index.css"), Resolution::Asset("index.css")));
/// # Ok::<(), folio_server::ServerError>(())
/// ```
#[derive(Debug)]
pub struct RouteTable {
    router: Router<PageDefinition>,
    asset_prefix: Option<String>,
}

impl RouteTable {
    /// Starts an empty table that serves assets under [`DEFAULT_ASSET_PREFIX`].
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Resolves a percent-decoded path without query string.
    ///
    /// Lookup ignores the method; whether the page answers it is decided
    /// when the handler is selected.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Resolution<'a> {
        if let Some(prefix) = &self.asset_prefix {
            if let Some(relative) = path.strip_prefix(prefix.as_str()) {
                return Resolution::Asset(relative);
            }
        }
        match self.router.at(path) {
            Some(found) => Resolution::Page(found),
            None => Resolution::NotFound,
        }
    }

    /// The prefix under which assets are served, if any.
    #[must_use]
    pub fn asset_prefix(&self) -> Option<&str> {
        self.asset_prefix.as_deref()
    }

    /// Every registered pattern, in precedence order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.router.patterns()
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.router.len()
    }

    /// Returns `true` when no page is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }
}

/// Builder for [`RouteTable`].
#[derive(Debug)]
pub struct RouteTableBuilder {
    router: Router<PageDefinition>,
    asset_prefix: Option<String>,
}

impl Default for RouteTableBuilder {
    fn default() -> Self {
        Self {
            router: Router::new(),
            asset_prefix: Some(DEFAULT_ASSET_PREFIX.to_string()),
        }
    }
}

impl RouteTableBuilder {
    /// Registers a page by its file path below the pages root.
    ///
    /// Layout and private files (a `_` prefixed segment) are rejected with
    /// [`ServerError::NotRoutable`].
    pub fn page(self, file: &str, page: PageDefinition) -> ServerResult<Self> {
        match page_pattern(file)? {
            Some(pattern) => self.route(&pattern, page),
            None => Err(ServerError::NotRoutable(file.to_string())),
        }
    }

    /// Registers a page under an explicit pattern.
    pub fn route(mut self, pattern: &str, page: PageDefinition) -> ServerResult<Self> {
        tracing::debug!(pattern, allowed = ?page.allowed(), "registering page");
        self.router.insert(pattern, page)?;
        Ok(self)
    }

    /// Serves assets under `prefix` instead of the default.
    #[must_use]
    pub fn asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = Some(prefix.into());
        self
    }

    /// Disables the asset short-circuit.
    #[must_use]
    pub fn without_assets(mut self) -> Self {
        self.asset_prefix = None;
        self
    }

    /// Finishes the table.
    #[must_use]
    pub fn build(self) -> RouteTable {
        RouteTable {
            router: self.router,
            asset_prefix: self.asset_prefix,
        }
    }
}
