//! The root configuration type and its builder.

use std::net::SocketAddr;

use folio_telemetry::{
    LogConfig, LogFormat, MetricsConfig, ServiceIdentity, TelemetryConfig, TracingConfig,
};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, RenderingConfig, ServerConfig, TelemetrySection};

/// Complete Folio server configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use folio_config::FolioConfig;
///
/// let config = FolioConfig::default();
/// assert_eq!(config.rendering.fragment_header, "HX-Request");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Rendering configuration.
    #[serde(default)]
    pub rendering: RenderingConfig,

    /// Telemetry configuration (metrics, tracing, logging).
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl FolioConfig {
    /// Create a new configuration builder.
    ///
    /// ```
    /// use folio_config::{FolioConfig, ServerConfig};
    ///
    /// let config = FolioConfig::builder()
    ///     .server(ServerConfig {
    ///         http_addr: "127.0.0.1:3000".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    #[must_use]
    pub fn builder() -> FolioConfigBuilder {
        FolioConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - the server address or the enabled metrics address is not a socket address
    /// - the sampling ratio is outside 0.0..=1.0
    /// - the asset prefix does not start and end with `/`
    /// - the fragment header name is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.telemetry.metrics.enabled
            && self.telemetry.metrics.addr.parse::<SocketAddr>().is_err()
        {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", self.telemetry.metrics.addr),
            ));
        }

        if !(0.0..=1.0).contains(&self.telemetry.tracing.sampling_ratio) {
            return Err(ConfigError::invalid_value(
                "telemetry.tracing.sampling_ratio",
                "must be between 0.0 and 1.0",
            ));
        }

        let prefix = &self.rendering.asset_prefix;
        if !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(ConfigError::invalid_value(
                "rendering.asset_prefix",
                format!("must start and end with '/': {prefix}"),
            ));
        }

        if self.rendering.fragment_header.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "rendering.fragment_header",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Pretty debug logs; everything else at defaults.
    ///
    /// ```
    /// use folio_config::FolioConfig;
    ///
    /// let config = FolioConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.environment = "development".to_string();
        config
    }

    /// JSON info logs and Prometheus metrics.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.metrics.enabled = true;
        config.telemetry.environment = "production".to_string();
        config
    }

    /// The [`TelemetryConfig`] described by the `[telemetry]` sections.
    ///
    /// This is the one place file settings become subsystem settings.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let section = &self.telemetry;

        let mut service =
            ServiceIdentity::new(&section.service_name).environment(&section.environment);
        if let Some(version) = &section.service_version {
            service = service.version(version);
        }

        let logging = LogConfig {
            enabled: section.logging.enabled,
            level: section.logging.level.clone(),
            format: section.logging.format,
            ..LogConfig::default()
        };
        let tracing_defaults = TracingConfig::default();
        let tracing = TracingConfig {
            enabled: section.tracing.enabled,
            otlp_endpoint: section
                .tracing
                .otlp_endpoint
                .clone()
                .unwrap_or(tracing_defaults.otlp_endpoint),
            sample_ratio: section.tracing.sampling_ratio,
            ..tracing_defaults
        };
        let metrics = MetricsConfig {
            enabled: section.metrics.enabled,
            addr: section.metrics.addr.clone(),
            ..MetricsConfig::default()
        };

        TelemetryConfig::new(service, logging, tracing, metrics)
    }
}

/// Builder for [`FolioConfig`].
#[derive(Debug, Default)]
pub struct FolioConfigBuilder {
    server: Option<ServerConfig>,
    rendering: Option<RenderingConfig>,
    telemetry: Option<TelemetrySection>,
}

impl FolioConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration.
    #[must_use]
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the rendering configuration.
    #[must_use]
    pub fn rendering(mut self, rendering: RenderingConfig) -> Self {
        self.rendering = Some(rendering);
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetrySection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> FolioConfig {
        FolioConfig {
            server: self.server.unwrap_or_default(),
            rendering: self.rendering.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<FolioConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
