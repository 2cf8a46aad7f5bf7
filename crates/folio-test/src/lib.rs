//! # Folio Test
//!
//! In-memory page testing for Folio. A [`TestClient`] sends requests
//! straight into a [`Pipeline`](folio_server::Pipeline), so tests run the
//! same resolve, extract, invoke and render steps the server does without
//! binding a port.
//!
//! ## Example
//!
//! ```rust
//! use folio_core::{el, PageDefinition, PageOutcome, RequestContext};
//! use folio_server::{Pipeline, RouteTable};
//! use folio_test::TestClient;
//!
//! # tokio_test_block_on(async {
//! let routes = RouteTable::builder()
//!     .page("index.rs", PageDefinition::new().post(|ctx: RequestContext| async move {
//!         let todo = ctx.form().get("todo").unwrap_or_default().to_string();
//!         Ok(PageOutcome::render(el("li").text(todo)))
//!     }))
//!     .unwrap()
//!     .build();
//! let client = TestClient::new(Pipeline::builder(routes).build());
//!
//! client
//!     .post("/")
//!     .fragment()
//!     .form(&[("todo", "Buy milk")])
//!     .send()
//!     .await
//!     .assert_status_code(200)
//!     .assert_body_eq("<li>Buy milk</li>");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/folio-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestRequest};
pub use error::TestError;
pub use response::TestResponse;
