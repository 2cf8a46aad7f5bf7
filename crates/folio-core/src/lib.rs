//! # Folio Core
//!
//! Core types and traits for the Folio rendering pipeline.
//!
//! - [`Markup`] - render trees produced by handlers
//! - [`FieldMap`] - ordered multi-map for query strings and form fields
//! - [`RequestContext`] - per-request, read-only handler input
//! - [`PageOutcome`] - terminal response or render tree
//! - [`Handler`] / [`PageDefinition`] - per-method page handlers
//! - [`Layout`] - document scaffolding for full-page responses
//! - [`PageError`] - unexpected handler failures

#![doc(html_root_url = "https://docs.rs/folio-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod fields;
mod handler;
mod layout;
mod markup;
mod outcome;
mod page;

pub use context::{RequestContext, RequestContextBuilder, RequestId};
pub use error::{ErrorKind, PageError, PageResult};
pub use fields::FieldMap;
pub use handler::{sync_handler, BoxedHandler, Handler, SyncHandler};
pub use layout::{Bare, DocumentLayout, Layout, HTMX_SCRIPT};
pub use markup::{el, Element, Markup};
pub use outcome::{PageOutcome, StatusText};
pub use page::PageDefinition;

pub use folio_router::PageMethod;
