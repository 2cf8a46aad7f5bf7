//! Per-page method tables.
//!
//! A [`MethodMap`] binds at most one value (usually a handler) to each
//! [`PageMethod`]. A missing entry is a first-class "unsupported" state that
//! callers inspect, not a lookup failure.

use std::fmt;

use crate::method::PageMethod;

/// Maps each [`PageMethod`] to an optional value.
///
/// # Example
///
/// ```rust
/// use folio_router::{MethodMap, PageMethod};
///
/// let table = MethodMap::new().get("render").post("submit");
///
/// assert_eq!(table.handler(PageMethod::Get), Some(&"render"));
/// assert_eq!(table.handler(PageMethod::Delete), None);
/// assert_eq!(table.allowed(), vec![PageMethod::Get, PageMethod::Post]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MethodMap<H> {
    slots: [Option<H>; 5],
}

impl<H> Default for MethodMap<H> {
    fn default() -> Self {
        Self {
            slots: [None, None, None, None, None],
        }
    }
}

impl<H> MethodMap<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `method`, replacing any previous binding.
    #[must_use]
    pub fn on(mut self, method: PageMethod, handler: H) -> Self {
        self.set(method, handler);
        self
    }

    /// Binds a `GET` handler.
    #[must_use]
    pub fn get(self, handler: H) -> Self {
        self.on(PageMethod::Get, handler)
    }

    /// Binds a `POST` handler.
    #[must_use]
    pub fn post(self, handler: H) -> Self {
        self.on(PageMethod::Post, handler)
    }

    /// Binds a `PUT` handler.
    #[must_use]
    pub fn put(self, handler: H) -> Self {
        self.on(PageMethod::Put, handler)
    }

    /// Binds a `PATCH` handler.
    #[must_use]
    pub fn patch(self, handler: H) -> Self {
        self.on(PageMethod::Patch, handler)
    }

    /// Binds a `DELETE` handler.
    #[must_use]
    pub fn delete(self, handler: H) -> Self {
        self.on(PageMethod::Delete, handler)
    }

    /// In-place variant of [`MethodMap::on`]. Returns the previous binding.
    pub fn set(&mut self, method: PageMethod, handler: H) -> Option<H> {
        self.slots[method.index()].replace(handler)
    }

    /// The value bound to `method`, if any.
    #[must_use]
    pub fn handler(&self, method: PageMethod) -> Option<&H> {
        self.slots[method.index()].as_ref()
    }

    /// Whether `method` has a binding.
    #[must_use]
    pub fn supports(&self, method: PageMethod) -> bool {
        self.handler(method).is_some()
    }

    /// Methods with a binding, in table order.
    #[must_use]
    pub fn allowed(&self) -> Vec<PageMethod> {
        self.iter().map(|(method, _)| method).collect()
    }

    /// Iterates over bound `(method, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (PageMethod, &H)> {
        PageMethod::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter_map(|(method, slot)| slot.as_ref().map(|h| (method, h)))
    }

    /// True when no method is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Copies bindings from `other` for methods this table leaves empty.
    pub fn merge(&mut self, other: MethodMap<H>) {
        for (slot, incoming) in self.slots.iter_mut().zip(other.slots) {
            if slot.is_none() {
                *slot = incoming;
            }
        }
    }

    /// Transforms every bound value.
    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(H) -> U) -> MethodMap<U> {
        let [get, post, put, patch, delete] = self.slots;
        MethodMap {
            slots: [
                get.map(&mut f),
                post.map(&mut f),
                put.map(&mut f),
                patch.map(&mut f),
                delete.map(&mut f),
            ],
        }
    }
}

impl<H> fmt::Debug for MethodMap<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMap")
            .field("allowed", &self.allowed())
            .finish()
    }
}
