//! Request spans.
//!
//! The pipeline opens one span per request through a [`RequestTracer`] it
//! carries, never through a global lookup. A [`SpanGuard`] owns the span
//! and closes it exactly once: explicitly with [`SpanGuard::finish_ok`] or
//! [`SpanGuard::finish_error`], or on drop with the error
//! `"request aborted"` when the request future was cancelled.
//!
//! | Tracer | Backend |
//! |--------|---------|
//! | [`OtelTracer`] | OpenTelemetry global tracer provider |
//! | [`NoopTracer`] | Nothing |
//! | [`RecordingTracer`] | In-memory list of finished spans |

use std::fmt;
use std::sync::Arc;

use opentelemetry::global::{self, BoxedSpan};
use opentelemetry::trace::{Span as _, SpanKind, Status, Tracer as _};
use opentelemetry::KeyValue;
use parking_lot::Mutex;

/// Error kind recorded when a span is dropped unfinished.
pub const ABORTED: &str = "aborted";

/// Message recorded when a span is dropped unfinished.
pub const ABORTED_MESSAGE: &str = "request aborted";

/// A started span.
pub trait RequestSpan: Send {
    /// Adds an attribute.
    fn set_attribute(&mut self, key: &'static str, value: String);

    /// Ends the span successfully.
    fn end_ok(self: Box<Self>);

    /// Ends the span with an error status.
    fn end_error(self: Box<Self>, kind: &str, message: &str);
}

/// Opens request spans.
pub trait RequestTracer: Send + Sync + 'static {
    /// Starts a span named `name` with initial attributes.
    fn start(&self, name: &str, attributes: Vec<(&'static str, String)>) -> Box<dyn RequestSpan>;
}

/// Owns a span and guarantees it is closed exactly once.
pub struct SpanGuard {
    span: Option<Box<dyn RequestSpan>>,
}

impl SpanGuard {
    /// Starts a span on `tracer`.
    pub fn start(
        tracer: &dyn RequestTracer,
        name: &str,
        attributes: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            span: Some(tracer.start(name, attributes)),
        }
    }

    /// Adds an attribute to the open span.
    pub fn record(&mut self, key: &'static str, value: impl Into<String>) {
        if let Some(span) = self.span.as_mut() {
            span.set_attribute(key, value.into());
        }
    }

    /// Closes the span with status ok.
    pub fn finish_ok(mut self) {
        if let Some(span) = self.span.take() {
            span.end_ok();
        }
    }

    /// Closes the span with status error.
    pub fn finish_error(mut self, kind: &str, message: impl fmt::Display) {
        if let Some(span) = self.span.take() {
            span.end_error(kind, &message.to_string());
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        if let Some(span) = self.span.take() {
            span.end_error(ABORTED, ABORTED_MESSAGE);
        }
    }
}

impl fmt::Debug for SpanGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanGuard")
            .field("open", &self.span.is_some())
            .finish()
    }
}

/// Spans through the OpenTelemetry global tracer provider.
///
/// Until [`init_tracing`](crate::init_tracing) installs a provider the
/// global one is a no-op, so this tracer is always safe to use.
#[derive(Debug, Clone)]
pub struct OtelTracer {
    name: &'static str,
}

impl OtelTracer {
    /// A tracer scoped to the instrumentation name `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for OtelTracer {
    fn default() -> Self {
        Self::new("folio")
    }
}

impl RequestTracer for OtelTracer {
    fn start(&self, name: &str, attributes: Vec<(&'static str, String)>) -> Box<dyn RequestSpan> {
        let tracer = global::tracer(self.name);
        let span = tracer
            .span_builder(name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(
                attributes
                    .into_iter()
                    .map(|(key, value)| KeyValue::new(key, value)),
            )
            .start(&tracer);
        Box::new(OtelSpan(span))
    }
}

struct OtelSpan(BoxedSpan);

impl RequestSpan for OtelSpan {
    fn set_attribute(&mut self, key: &'static str, value: String) {
        self.0.set_attribute(KeyValue::new(key, value));
    }

    fn end_ok(mut self: Box<Self>) {
        self.0.set_status(Status::Ok);
        self.0.end();
    }

    fn end_error(mut self: Box<Self>, kind: &str, message: &str) {
        self.0
            .set_attribute(KeyValue::new("error.type", kind.to_string()));
        self.0.set_status(Status::error(message.to_string()));
        self.0.end();
    }
}

/// Discards every span.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

struct NoopSpan;

impl RequestSpan for NoopSpan {
    fn set_attribute(&mut self, _key: &'static str, _value: String) {}
    fn end_ok(self: Box<Self>) {}
    fn end_error(self: Box<Self>, _kind: &str, _message: &str) {}
}

impl RequestTracer for NoopTracer {
    fn start(&self, _name: &str, _attributes: Vec<(&'static str, String)>) -> Box<dyn RequestSpan> {
        Box::new(NoopSpan)
    }
}

/// Final status of a recorded span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanStatus {
    /// Closed with [`SpanGuard::finish_ok`].
    Ok,
    /// Closed with an error.
    Error {
        /// Error kind, e.g. `fault`, `timeout` or `aborted`.
        kind: String,
        /// Error message.
        message: String,
    },
}

/// A span captured by [`RecordingTracer`].
#[derive(Debug, Clone)]
pub struct FinishedSpan {
    /// Span name.
    pub name: String,
    /// Attributes in the order they were set.
    pub attributes: Vec<(&'static str, String)>,
    /// Final status.
    pub status: SpanStatus,
}

impl FinishedSpan {
    /// The last value set for `key`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct Recording {
    started: usize,
    finished: Vec<FinishedSpan>,
}

/// Keeps every finished span in memory. Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingTracer {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spans started so far.
    #[must_use]
    pub fn started(&self) -> usize {
        self.inner.lock().started
    }

    /// Spans closed so far, in closing order.
    #[must_use]
    pub fn finished(&self) -> Vec<FinishedSpan> {
        self.inner.lock().finished.clone()
    }
}

impl RequestTracer for RecordingTracer {
    fn start(&self, name: &str, attributes: Vec<(&'static str, String)>) -> Box<dyn RequestSpan> {
        self.inner.lock().started += 1;
        Box::new(RecordingSpan {
            name: name.to_string(),
            attributes,
            sink: Arc::clone(&self.inner),
        })
    }
}

struct RecordingSpan {
    name: String,
    attributes: Vec<(&'static str, String)>,
    sink: Arc<Mutex<Recording>>,
}

impl RecordingSpan {
    fn close(self, status: SpanStatus) {
        self.sink.lock().finished.push(FinishedSpan {
            name: self.name,
            attributes: self.attributes,
            status,
        });
    }
}

impl RequestSpan for RecordingSpan {
    fn set_attribute(&mut self, key: &'static str, value: String) {
        self.attributes.push((key, value));
    }

    fn end_ok(self: Box<Self>) {
        self.close(SpanStatus::Ok);
    }

    fn end_error(self: Box<Self>, kind: &str, message: &str) {
        self.close(SpanStatus::Error {
            kind: kind.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(tracer: &RecordingTracer) -> SpanGuard {
        SpanGuard::start(tracer, "GET /items", vec![("http.method", "GET".to_string())])
    }

    #[test]
    fn test_finish_ok() {
        let tracer = RecordingTracer::new();
        let mut guard = start(&tracer);
        guard.record("http.status_code", "200");
        guard.finish_ok();

        let spans = tracer.finished();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].status, SpanStatus::Ok);
        assert_eq!(spans[0].attribute("http.method"), Some("GET"));
        assert_eq!(spans[0].attribute("http.status_code"), Some("200"));
    }

    #[test]
    fn test_finish_error() {
        let tracer = RecordingTracer::new();
        start(&tracer).finish_error("fault", "handler fault: boom");

        let spans = tracer.finished();
        assert_eq!(
            spans[0].status,
            SpanStatus::Error {
                kind: "fault".to_string(),
                message: "handler fault: boom".to_string(),
            }
        );
    }

    #[test]
    fn test_drop_closes_as_aborted() {
        let tracer = RecordingTracer::new();
        drop(start(&tracer));

        assert_eq!(tracer.started(), 1);
        let spans = tracer.finished();
        assert_eq!(spans.len(), 1);
        assert!(matches!(
            &spans[0].status,
            SpanStatus::Error { kind, message } if kind == ABORTED && message == ABORTED_MESSAGE
        ));
    }

    #[test]
    fn test_closed_exactly_once() {
        let tracer = RecordingTracer::new();
        for _ in 0..3 {
            start(&tracer).finish_ok();
        }
        drop(start(&tracer));
        assert_eq!(tracer.started(), 4);
        assert_eq!(tracer.finished().len(), 4);
    }

    #[test]
    fn test_noop_and_otel_tracers_do_not_panic() {
        SpanGuard::start(&NoopTracer, "noop", Vec::new()).finish_ok();
        let mut guard = SpanGuard::start(&OtelTracer::default(), "otel", Vec::new());
        guard.record("route", "/items");
        guard.finish_error("timeout", "request timed out after 5ms");
    }
}
