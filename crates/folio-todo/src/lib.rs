//! # Folio TodoMVC
//!
//! TodoMVC served by Folio. The list lives in memory; every control posts
//! with htmx and swaps in the refreshed app.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use folio::config::FolioConfig;
//! use folio::telemetry::NoopTracer;
//! use folio_todo::store::TodoStore;
//!
//! let store = Arc::new(TodoStore::seeded());
//! let pipeline = folio_todo::pipeline(&FolioConfig::default(), &store, NoopTracer)?;
//! assert_eq!(pipeline.routes().len(), 7);
//! # Ok::<(), folio::server::ServerError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/folio-todo/0.1.0")]

pub mod components;
pub mod pages;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use folio::config::FolioConfig;
use folio::core::DocumentLayout;
use folio::server::{Pipeline, RouteTable, ServerConfig, ServerResult, StaticFiles};
use folio::telemetry::RequestTracer;

use crate::store::TodoStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Document title.
pub const TITLE: &str = "Folio • TodoMVC";

/// Every page, keyed by its file under the page tree.
pub fn routes(store: &Arc<TodoStore>, asset_prefix: &str) -> ServerResult<RouteTable> {
    Ok(RouteTable::builder()
        .asset_prefix(asset_prefix)
        .page("index.rs", pages::index(store))?
        .page("todo/insert.rs", pages::insert(store))?
        .page("todo/toggle.rs", pages::toggle(store))?
        .page("todo/destroy.rs", pages::destroy(store))?
        .page("todo/filter.rs", pages::filter(store))?
        .page("todo/toggle-all.rs", pages::toggle_all(store))?
        .page("todo/clear-completed.rs", pages::clear_completed(store))?
        .build())
}

/// The request pipeline for `config`.
pub fn pipeline(
    config: &FolioConfig,
    store: &Arc<TodoStore>,
    tracer: impl RequestTracer,
) -> ServerResult<Pipeline> {
    let rendering = &config.rendering;
    let layout = DocumentLayout::new(TITLE)
        .stylesheet(format!("{}index.css", rendering.asset_prefix));

    let mut builder = Pipeline::builder(routes(store, &rendering.asset_prefix)?)
        .layout(layout)
        .tracer(tracer)
        .assets(StaticFiles::new(&rendering.asset_dir))
        .fragment_header(&rendering.fragment_header)
        .max_body_bytes(config.server.max_body_bytes);

    if config.server.request_timeout_ms > 0 {
        builder = builder.handler_timeout(Duration::from_millis(config.server.request_timeout_ms));
    }

    Ok(builder.build())
}

/// The listener settings for `config`. A zero request timeout disables it.
#[must_use]
pub fn server_config(config: &FolioConfig) -> ServerConfig {
    let request_timeout = match config.server.request_timeout_ms {
        0 => Duration::MAX,
        ms => Duration::from_millis(ms),
    };

    ServerConfig::builder()
        .http_addr(&config.server.http_addr)
        .shutdown_timeout(Duration::from_secs(config.server.shutdown_timeout_secs))
        .request_timeout(request_timeout)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::telemetry::NoopTracer;

    #[test]
    fn test_routes() {
        let store = Arc::new(TodoStore::new());
        let routes = routes(&store, "/static/").unwrap();
        let mut patterns = routes.patterns();
        patterns.sort_unstable();
        assert_eq!(
            patterns,
            [
                "/",
                "/todo/clear-completed",
                "/todo/destroy",
                "/todo/filter",
                "/todo/insert",
                "/todo/toggle",
                "/todo/toggle-all",
            ]
        );
        assert_eq!(routes.asset_prefix(), Some("/static/"));
    }

    #[test]
    fn test_server_config() {
        let mut config = FolioConfig::default();
        config.server.http_addr = "127.0.0.1:4000".to_string();
        config.server.request_timeout_ms = 250;

        let server = server_config(&config);
        assert_eq!(server.http_addr(), "127.0.0.1:4000");
        assert_eq!(server.request_timeout(), Duration::from_millis(250));

        config.server.request_timeout_ms = 0;
        assert_eq!(server_config(&config).request_timeout(), Duration::MAX);
    }

    #[test]
    fn test_pipeline_builds() {
        let store = Arc::new(TodoStore::seeded());
        let pipeline = pipeline(&FolioConfig::default(), &store, NoopTracer).unwrap();
        assert_eq!(pipeline.routes().len(), 7);
    }
}
