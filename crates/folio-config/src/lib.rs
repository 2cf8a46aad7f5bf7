//! Typed configuration for Folio servers.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → files → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:1337"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_bytes = 1048576
//!
//! [rendering]
//! fragment_header = "HX-Request"
//! asset_prefix = "/static/"
//! asset_dir = "public"
//!
//! [telemetry]
//! service_name = "todomvc"
//! environment = "production"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//!
//! [telemetry.tracing]
//! enabled = true
//! otlp_endpoint = "http://localhost:4317"
//! sampling_ratio = 1.0
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `FOLIO__SERVER__HTTP_ADDR=127.0.0.1:8080`
//! - `FOLIO__TELEMETRY__LOGGING__LEVEL=folio_server=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{FolioConfig, FolioConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    LoggingSection, MetricsSection, RenderingConfig, ServerConfig, TelemetrySection,
    TracingSection,
};
