//! Observability for Folio: logging, tracing and metrics.
//!
//! - **Logging**: `tracing-subscriber` with JSON, pretty or compact output
//! - **Tracing**: OpenTelemetry with OTLP export, plus the [`RequestTracer`]
//!   handle the request pipeline opens its spans through
//! - **Metrics**: Prometheus exposition via the `metrics` crate
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_telemetry::{
//!     init_telemetry, LogConfig, MetricsConfig, ServiceIdentity, TelemetryConfig, TracingConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TelemetryConfig::new(
//!         ServiceIdentity::new("todomvc"),
//!         LogConfig::default(),
//!         TracingConfig { enabled: true, ..TracingConfig::default() },
//!         MetricsConfig { enabled: true, ..MetricsConfig::default() },
//!     );
//!
//!     let _guard = init_telemetry(config).expect("telemetry");
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod span;
pub mod tracing;

pub use config::{ServiceIdentity, TelemetryConfig};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, record_request, record_validation_failure, MetricsConfig};
pub use span::{
    FinishedSpan, NoopTracer, OtelTracer, RecordingTracer, RequestSpan, RequestTracer, SpanGuard,
    SpanStatus,
};
pub use tracing::{init_tracing, TracingConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Flushes and shuts down the tracer provider on drop.
///
/// Keep it alive for the lifetime of the application.
pub struct TelemetryGuard {
    tracer_provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl TelemetryGuard {
    /// Creates a new telemetry guard.
    #[must_use]
    pub fn new(tracer_provider: Option<opentelemetry_sdk::trace::TracerProvider>) -> Self {
        Self { tracer_provider }
    }

    /// Whether an OTLP tracer provider is installed.
    #[must_use]
    pub fn is_exporting_traces(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            for result in provider.force_flush() {
                if let Err(e) = result {
                    eprintln!("Error flushing tracer provider: {e}");
                }
            }
            if let Err(e) = provider.shutdown() {
                eprintln!("Error shutting down tracer provider: {e}");
            }
        }
    }
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("exporting_traces", &self.is_exporting_traces())
            .finish()
    }
}

/// Initializes logging, metrics and tracing, in that order.
///
/// # Errors
///
/// Returns `TelemetryError` if any subsystem fails to initialize.
pub fn init_telemetry(config: TelemetryConfig) -> TelemetryResult<TelemetryGuard> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    let tracer_provider = init_tracing(&config.tracing)?;

    Ok(TelemetryGuard::new(tracer_provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_without_provider() {
        let guard = TelemetryGuard::new(None);
        assert!(!guard.is_exporting_traces());
        drop(guard);
    }

    #[test]
    fn test_init_with_everything_disabled() {
        let mut config = TelemetryConfig::default();
        config.logging.enabled = false;
        let guard = init_telemetry(config).unwrap();
        assert!(!guard.is_exporting_traces());
    }
}
