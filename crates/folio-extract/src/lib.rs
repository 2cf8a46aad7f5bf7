//! # Folio Extract
//!
//! Form parsing, schema validation and response builders for Folio.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`parse_query`] / [`parse_form`] | Decode a query string or URL-encoded body into a [`FieldMap`](folio_core::FieldMap) |
//! | [`ObjectSchema`] | Declarative field rules, collecting every failing field |
//! | [`TypedSchema`] | An [`ObjectSchema`] that deserializes into a user type |
//! | [`form_handler`] | The validation adapter: schema plus success and error continuations |
//! | [`response`] | HTML, JSON, text and redirect builders |
//!
//! ## Example
//!
//! ```rust
//! use folio_core::{el, Handler, FieldMap, PageMethod, PageOutcome, RequestContext};
//! use folio_extract::{form_handler, FieldSpec, FormValues, ObjectSchema};
//!
//! let handler = form_handler(
//!     ObjectSchema::new()
//!         .field(FieldSpec::text("name").min_len(1))
//!         .field(FieldSpec::integer("qty").optional()),
//!     |values: FormValues, _ctx: RequestContext| async move {
//!         let name = values.text("name").unwrap_or_default().to_string();
//!         Ok(PageOutcome::render(el("li").text(name)))
//!     },
//! );
//!
//! let form: FieldMap = [("name", "Buy milk")].into_iter().collect();
//! let ctx = RequestContext::builder(PageMethod::Post, "/items").form(form).build();
//! let outcome = tokio_test::block_on(handler.handle(ctx)).unwrap();
//! assert!(!outcome.is_terminal());
//! ```
//!
//! ## Error Handling
//!
//! A request whose fields cannot be read at all yields an
//! [`ExtractionError`]; the pipeline answers it with
//! [`response::extraction_failure`]. A readable submission that breaks the
//! schema is a [`Validation::Invalid`] value and never an error.

#![doc(html_root_url = "https://docs.rs/folio-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
mod error;
mod form;
pub mod response;
mod schema;

pub use adapter::{
    form_handler, note_rejection, FormHandler, OnInvalid, OnValid, RejectUnprocessable,
};
pub use error::{ExtractionError, ExtractionSource};
pub use form::{parse_form, parse_query, DEFAULT_MAX_BODY_SIZE, FORM_URLENCODED};
pub use schema::{
    FieldKind, FieldSpec, FieldValue, FormSchema, FormValues, Issue, ObjectSchema, TypedSchema,
    Validation,
};
