//! Segment-tree page router for Folio.
//!
//! This crate holds the pure lookup side of request dispatch: a router that
//! maps URL patterns to values, the closed set of [`PageMethod`]s a page can
//! answer, the per-page [`MethodMap`], and the [`page_pattern`] convention
//! that turns page file paths into patterns.
//!
//! # Example
//!
//! ```rust
//! use folio_router::{MethodMap, PageMethod, Router};
//!
//! let mut router = Router::new();
//! router.insert("/", MethodMap::new().get("index")).unwrap();
//! router.insert("/todo/{id}", MethodMap::new().get("show").delete("destroy")).unwrap();
//!
//! let found = router.at("/todo/7").unwrap();
//! assert_eq!(found.params.get("id"), Some("7"));
//! assert_eq!(found.value.handler(PageMethod::Delete), Some(&"destroy"));
//! assert_eq!(found.value.handler(PageMethod::Post), None);
//! ```
//!
//! # Layout
//!
//! ```text
//!                 (root) [/]
//!                    │
//!         ┌──────────┴──────────┐
//!       "todo"                "docs"
//!         │                     │
//!    ┌────┴─────┐            "*slug"
//! "insert"    "{id}"
//! ```

mod convention;
mod error;
mod method;
mod method_map;
mod node;
mod params;
mod router;

pub use convention::{page_pattern, ConventionError};
pub use error::InsertError;
pub use method::{PageMethod, UnknownMethod};
pub use method_map::MethodMap;
pub use node::{Leaf, Node, SegmentKind};
pub use params::Params;
pub use router::Router;

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the route.
    pub value: &'a T,
    /// The normalized pattern the route was registered under.
    pub pattern: &'a str,
    /// Captured dynamic segments.
    pub params: Params,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_table_through_router() {
        let mut router = Router::new();
        router
            .insert("/items", MethodMap::new().get("list").post("create"))
            .unwrap();

        let found = router.at("/items").unwrap();
        assert_eq!(found.value.handler(PageMethod::Post), Some(&"create"));
        assert!(!found.value.supports(PageMethod::Put));
    }

    #[test]
    fn test_convention_feeds_router() {
        let mut router = Router::new();
        for file in ["index.rs", "todo/[id].rs", "_layout.rs", "todo/insert.rs"] {
            if let Some(pattern) = page_pattern(file).unwrap() {
                router.insert(&pattern, file).unwrap();
            }
        }
        assert_eq!(router.len(), 3);
        assert_eq!(*router.at("/todo/insert").unwrap().value, "todo/insert.rs");
        assert_eq!(*router.at("/todo/abc").unwrap().value, "todo/[id].rs");
    }
}
