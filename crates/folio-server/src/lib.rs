//! # Folio Server
//!
//! The request side of Folio: the route table pages are registered in, the
//! pipeline that turns one request into one response, static asset serving
//! and the Hyper server that drives it all.
//!
//! - [`RouteTable`]: file-convention and explicit page registration
//! - [`Pipeline`]: resolve, select, extract, invoke, render
//! - [`StaticFiles`]: assets under a prefix, short-circuiting page dispatch
//! - [`Server`]: HTTP/1.1 accept loop with graceful shutdown
//!
//! ## Example
//!
//! ```rust
//! use folio_core::{el, PageDefinition, PageOutcome, RequestContext};
//! use folio_server::{Pipeline, RouteTable};
//!
//! let routes = RouteTable::builder()
//!     .page("todo/[id].rs", PageDefinition::new().get(|ctx: RequestContext| async move {
//!         let id = ctx.query().get("id").unwrap_or_default().to_string();
//!         Ok(PageOutcome::render(el("li").text(id)))
//!     }))?
//!     .build();
//!
//! let pipeline = Pipeline::builder(routes).build();
//! let request = http::Request::get("/todo/7").body(bytes::Bytes::new()).unwrap();
//! let response = tokio_test::block_on(pipeline.handle(request)).unwrap();
//! assert_eq!(response.body().as_ref(), b"<li>7</li>");
//! # Ok::<(), folio_server::ServerError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/folio-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
pub mod invoke;
mod pipeline;
pub mod render;
mod routes;
mod server;
mod shutdown;
mod static_files;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::{ServerError, ServerResult};
pub use pipeline::{Pipeline, PipelineBuilder, SPAN_NAME};
pub use render::DEFAULT_FRAGMENT_HEADER;
pub use routes::{Resolution, RouteTable, RouteTableBuilder, DEFAULT_ASSET_PREFIX};
pub use server::{error_response, HttpResponse, ResponseBody, Server, HANDLER_TIMEOUT_GRACE};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
pub use static_files::{StaticFileError, StaticFiles};
