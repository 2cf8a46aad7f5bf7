//! What [`init_telemetry`](crate::init_telemetry) consumes.
//!
//! Each subsystem config carries its own copy of the service identity.
//! [`TelemetryConfig::new`] is the only place those copies are written, so
//! logs, spans and metrics always agree on who emitted them. Mapping the
//! `[telemetry.*]` file sections onto the subsystem configs is left to
//! `folio-config`.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;
use crate::tracing::TracingConfig;

/// Who is emitting: stamped on every log line, span and metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    /// Service name.
    pub name: String,
    /// Service version.
    pub version: String,
    /// Deployment environment.
    pub environment: String,
}

impl ServiceIdentity {
    /// `name` at this crate's version, in `development`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Replaces the version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replaces the environment.
    #[must_use]
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            name: "folio".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging, tracing and metrics settings for one service.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    service: ServiceIdentity,
    /// Logging settings.
    pub logging: LogConfig,
    /// Tracing settings.
    pub tracing: TracingConfig,
    /// Metrics settings.
    pub metrics: MetricsConfig,
}

impl TelemetryConfig {
    /// Bundles the subsystem settings under `service`.
    ///
    /// Whatever identity the subsystem configs carried is overwritten.
    #[must_use]
    pub fn new(
        service: ServiceIdentity,
        mut logging: LogConfig,
        mut tracing: TracingConfig,
        mut metrics: MetricsConfig,
    ) -> Self {
        logging.service_name.clone_from(&service.name);
        metrics.service_name.clone_from(&service.name);
        tracing.service_name.clone_from(&service.name);
        tracing.service_version.clone_from(&service.version);
        tracing.environment.clone_from(&service.environment);

        Self {
            service,
            logging,
            tracing,
            metrics,
        }
    }

    /// The identity stamped on every subsystem.
    #[must_use]
    pub fn service(&self) -> &ServiceIdentity {
        &self.service
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new(
            ServiceIdentity::default(),
            LogConfig::default(),
            TracingConfig::default(),
            MetricsConfig::default(),
        )
    }
}
