//! # Folio
//!
//! **Server-rendered pages with htmx fragments**
//!
//! Folio maps page files to routes and turns every request into markup:
//!
//! - **File-convention routing**: `index.rs`, `todo/[id].rs`, `docs/[...slug].rs`
//! - **Fragments or documents**: the same page tree is sent bare to htmx
//!   requests and inside the layout to everything else
//! - **Validated forms**: a schema in front of a handler answers bad
//!   submissions with 422 before the handler runs
//! - **Observability**: one span, one `inbound` and one `outbound` record per
//!   request, Prometheus counters per route
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::prelude::*;
//!
//! let insert = form_handler(
//!     ObjectSchema::new().field(FieldSpec::text("todo")),
//!     |values: FormValues, _ctx: RequestContext| async move {
//!         let todo = values.text("todo").unwrap_or_default().to_string();
//!         Ok(PageOutcome::render(el("li").text(todo)))
//!     },
//! );
//!
//! let routes = RouteTable::builder()
//!     .page("todo/insert.rs", PageDefinition::new().post(insert))?
//!     .build();
//! let pipeline = Pipeline::builder(routes)
//!     .layout(DocumentLayout::new("todos"))
//!     .build();
//!
//! let request = http::Request::post("/todo/insert")
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .header("hx-request", "true")
//!     .body(bytes::Bytes::from_static(b"todo=Buy+milk"))
//!     .unwrap();
//! let response = tokio_test::block_on(pipeline.handle(request)).unwrap();
//! assert_eq!(response.body().as_ref(), b"<li>Buy milk</li>");
//! # Ok::<(), folio::server::ServerError>(())
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → Resolve → Select → Extract → Invoke → Render → Response
//!              │         │         │
//!              └ 404     └ 404     └ 413/415/400 (handler not run)
//! ```

#![doc(html_root_url = "https://docs.rs/folio/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use folio_core as core;

// Re-export router types
pub use folio_router as router;

// Re-export extraction and validation types
pub use folio_extract as extract;

// Re-export telemetry
pub use folio_telemetry as telemetry;

// Re-export configuration
pub use folio_config as config;

// Re-export server types
pub use folio_server as server;

/// Prelude module for convenient imports.
///
/// ```rust
/// use folio::prelude::*;
/// ```
pub mod prelude {
    pub use folio_core::{
        el, DocumentLayout, Element, FieldMap, Handler, Layout, Markup, PageDefinition, PageError,
        PageMethod, PageOutcome, PageResult, RequestContext, RequestId, StatusText,
    };

    // Forms and validation
    pub use folio_extract::{form_handler, FieldSpec, FormSchema, FormValues, Issue, ObjectSchema};

    // Response builders
    pub use folio_extract::response::{HtmlResponse, JsonResponse, Redirect, TextResponse};

    // Server
    pub use folio_server::{
        Pipeline, RouteTable, Server, ServerConfig, ShutdownSignal, StaticFiles,
    };

    // Configuration and telemetry
    pub use folio_config::{ConfigLoader, FolioConfig};
    pub use folio_telemetry::{init_telemetry, OtelTracer};
}
