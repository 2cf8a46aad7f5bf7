//! Structured logging for Folio.
//!
//! Subscriber setup through `tracing-subscriber`: one `fmt` layer in JSON,
//! pretty or compact form, filtered by an [`EnvFilter`].
//!
//! # Request Records
//!
//! The request pipeline emits these records through the macros below:
//!
//! | Message | Level | Fields |
//! |---------|-------|--------|
//! | `inbound` | INFO | `request_id`, `http.method`, `http.path` |
//! | `route matched` | INFO | `request_id`, `route`, `http.method` |
//! | `outbound` | INFO | `request_id`, `http.status_code`, `http.status_text`, `http.content_type`, `duration_ms` |
//! | `request failed` | ERROR | `request_id`, `error`, `duration_ms` |
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_telemetry::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(route = "/todo/insert", "form accepted");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Output format of the `fmt` layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line, human-readable.
    Pretty,
    /// Single-line, human-readable.
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(TelemetryError::LoggingInit(format!(
                "unknown log format '{other}'"
            ))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "folio_server=debug,hyper=warn").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name for log fields.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output at debug level.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            span_events: true,
            file_line_info: true,
            include_target: true,
            service_name: "folio".to_string(),
        }
    }

    /// JSON output at info level.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            span_events: false,
            file_line_info: false,
            include_target: true,
            service_name: "folio".to_string(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` for an invalid filter or when a
/// global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = tracing_subscriber::fmt::layer()
        .with_span_events(span_events)
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_target(config.include_target);

    let layer = match config.format {
        LogFormat::Json => base.json().with_filter(filter).boxed(),
        LogFormat::Pretty => base.pretty().with_filter(filter).boxed(),
        LogFormat::Compact => base.compact().with_filter(filter).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}

/// Standard log field names.
pub mod fields {
    /// Request ID field name.
    pub const REQUEST_ID: &str = "request_id";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// HTTP status code field name.
    pub const HTTP_STATUS: &str = "http.status_code";

    /// HTTP status text field name.
    pub const HTTP_STATUS_TEXT: &str = "http.status_text";

    /// Response content type field name.
    pub const HTTP_CONTENT_TYPE: &str = "http.content_type";

    /// Matched route pattern field name.
    pub const ROUTE: &str = "route";

    /// Duration field name (in milliseconds).
    pub const DURATION_MS: &str = "duration_ms";

    /// Error field name.
    pub const ERROR: &str = "error";
}

/// Logs a request as it enters the pipeline.
#[macro_export]
macro_rules! log_inbound {
    ($request_id:expr, $method:expr, $path:expr) => {
        ::tracing::info!(
            request_id = %$request_id,
            http.method = %$method,
            http.path = %$path,
            "inbound"
        );
    };
}

/// Logs the page pattern a request resolved to.
#[macro_export]
macro_rules! log_route_matched {
    ($request_id:expr, $route:expr, $method:expr) => {
        ::tracing::info!(
            request_id = %$request_id,
            route = %$route,
            http.method = %$method,
            "route matched"
        );
    };
}

/// Logs the response leaving the pipeline.
///
/// `$status_text` and `$content_type` are `Option<&str>` and are left out
/// of the record when `None`.
#[macro_export]
macro_rules! log_outbound {
    ($request_id:expr, $status:expr, $status_text:expr, $content_type:expr, $duration_ms:expr) => {
        ::tracing::info!(
            request_id = %$request_id,
            http.status_code = $status,
            http.status_text = $status_text,
            http.content_type = $content_type,
            duration_ms = $duration_ms,
            "outbound"
        );
    };
}

/// Logs a handler fault.
#[macro_export]
macro_rules! log_request_failed {
    ($request_id:expr, $error:expr, $duration_ms:expr) => {
        ::tracing::error!(
            request_id = %$request_id,
            error = %$error,
            duration_ms = $duration_ms,
            "request failed"
        );
    };
}
