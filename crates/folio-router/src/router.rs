//! High-level router API.

use crate::error::InsertError;
use crate::node::Node;
use crate::RouteMatch;

/// A segment-tree router mapping URL patterns to values.
///
/// Lookup cost grows with the number of path segments, not the number of
/// registered routes.
///
/// # Example
///
/// ```rust
/// use folio_router::Router;
///
/// let mut router = Router::new();
/// router.insert("/", "home").unwrap();
/// router.insert("/todo/{id}", "todo").unwrap();
///
/// let m = router.at("/todo/42").unwrap();
/// assert_eq!(*m.value, "todo");
/// assert_eq!(m.pattern, "/todo/{id}");
/// assert_eq!(m.params.get("id"), Some("42"));
/// ```
///
/// # Precedence
///
/// For every segment the router tries, in order:
///
/// 1. a **literal** segment (`/todo/new`)
/// 2. a **named parameter** (`/todo/{id}`)
/// 3. a **catch-all** (`/todo/*rest`)
///
/// and backs out of a branch that fails further down. So among the routes
/// that can match, the one with the longest literal prefix wins, and
/// registration order never matters.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers `value` under `pattern`.
    ///
    /// Leading, trailing and repeated slashes are ignored, so `todo/`,
    /// `/todo` and `//todo` are the same pattern.
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), InsertError> {
        self.root.insert(pattern, value)?;
        self.route_count += 1;
        Ok(())
    }

    /// Looks up the route for a percent-decoded path without query string.
    #[must_use]
    pub fn at(&self, path: &str) -> Option<RouteMatch<'_, T>> {
        let (leaf, params) = self.root.lookup(path)?;
        Some(RouteMatch {
            value: &leaf.value,
            pattern: &leaf.pattern,
            params,
        })
    }

    /// Registered patterns in precedence order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.route_count);
        self.root.for_each_leaf(&mut |leaf| out.push(leaf.pattern.as_str()));
        out
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
