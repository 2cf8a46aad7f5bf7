//! The request pipeline.
//!
//! ```text
//! START ─▶ RESOLVE ─┬─▶ asset ──────────────────────────────┐
//!                   ├─▶ not found (404) ────────────────────┤
//!                   └─▶ SELECT ─┬─▶ unsupported (404) ──────┤
//!                               └─▶ EXTRACT ─▶ INVOKE ─▶ RENDER ─▶ RESPOND
//! ```
//!
//! Every request opens one span on the pipeline's [`RequestTracer`] and
//! logs an `inbound` record. A response (of any status) closes the span ok
//! and logs `outbound`. A handler fault or timeout closes it with an error,
//! logs `request failed`, then logs `outbound` for the [`error_response`]
//! the transport sends, and comes back as `Err`. A request future dropped midway closes its span through
//! [`SpanGuard`]'s drop as aborted.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use folio_core::{
    Bare, Layout, PageDefinition, PageError, PageResult, RequestContext, RequestId, StatusText,
};
use folio_extract::response::{extraction_failure, TextResponse};
use folio_extract::{parse_form, parse_query, DEFAULT_MAX_BODY_SIZE};
use folio_router::RouteMatch;
use folio_telemetry::{NoopTracer, RequestTracer, SpanGuard};
use http::request::Parts;
use http::{header, Request, Response};

use crate::invoke::{self, Selection};
use crate::render::{self, DEFAULT_FRAGMENT_HEADER};
use crate::routes::{Resolution, RouteTable};
use crate::server::error_response;
use crate::static_files::{StaticFileError, StaticFiles};

/// Name of the span opened per request.
pub const SPAN_NAME: &str = "page request";

/// Route label used in metrics for asset requests.
const ASSET_ROUTE: &str = "static";

/// Route label used in metrics for unmatched requests.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Turns one buffered request into one response.
///
/// ```rust
/// use folio_core::{el, DocumentLayout, PageDefinition, PageOutcome, RequestContext};
/// use folio_server::{Pipeline, RouteTable};
///
/// let routes = RouteTable::builder()
///     .page("index.rs", PageDefinition::new().get(|_ctx: RequestContext| async {
///         Ok(PageOutcome::render(el("h1").text("todos")))
///     }))?
///     .build();
/// let pipeline = Pipeline::builder(routes)
///     .layout(DocumentLayout::new("todos"))
///     .build();
///
/// let request = http::Request::get("/").body(bytes::Bytes::new()).unwrap();
/// let response = tokio_test::block_on(pipeline.handle(request)).unwrap();
/// assert_eq!(response.status(), 200);
/// assert!(std::str::from_utf8(response.body()).unwrap().contains("<h1>todos</h1>"));
/// # Ok::<(), folio_server::ServerError>(())
/// ```
pub struct Pipeline {
    routes: RouteTable,
    layout: Arc<dyn Layout>,
    tracer: Arc<dyn RequestTracer>,
    assets: Option<StaticFiles>,
    fragment_header: String,
    max_body_bytes: usize,
    handler_timeout: Option<Duration>,
}

impl Pipeline {
    /// Starts a pipeline over `routes`.
    #[must_use]
    pub fn builder(routes: RouteTable) -> PipelineBuilder {
        PipelineBuilder::new(routes)
    }

    /// The route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The limit on a handler's run, if any.
    #[must_use]
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout
    }

    /// Handles one request whose body has already been read.
    ///
    /// Only a handler fault or timeout is an `Err`; every expected outcome,
    /// 404 and 422 included, is a response.
    pub async fn handle(&self, request: Request<Bytes>) -> PageResult<Response<Bytes>> {
        let started = Instant::now();
        let request_id = RequestId::new();
        let (parts, body) = request.into_parts();
        let path = decode_path(parts.uri.path());

        let mut span = SpanGuard::start(
            self.tracer.as_ref(),
            SPAN_NAME,
            vec![
                ("request_id", request_id.to_string()),
                ("http.request.method", parts.method.to_string()),
                ("url.path", path.to_string()),
            ],
        );
        folio_telemetry::log_inbound!(request_id, parts.method, path);

        let (route, result) = match self.routes.resolve(&path) {
            Resolution::Asset(relative) => (ASSET_ROUTE, Ok(self.serve_asset(relative, &parts))),
            Resolution::NotFound => (UNMATCHED_ROUTE, Ok(not_found())),
            Resolution::Page(found) => {
                folio_telemetry::log_route_matched!(request_id, found.pattern, parts.method);
                span.record("http.route", found.pattern);
                let route = found.pattern;
                (route, self.dispatch(request_id, found, &parts, &body, &path).await)
            }
        };

        let elapsed = started.elapsed();
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(response) => {
                let status = log_response(request_id, &response, duration_ms);
                folio_telemetry::record_request(route, status, elapsed);
                span.record("http.response.status_code", status.to_string());
                span.finish_ok();
                Ok(response)
            }
            Err(err) => {
                folio_telemetry::log_request_failed!(request_id, err, duration_ms);
                // The transport answers with `error_response`.
                let status = log_response(request_id, &error_response(&err), duration_ms);
                folio_telemetry::record_request(route, status, elapsed);
                span.record("http.response.status_code", status.to_string());
                span.finish_error(err.kind().as_str(), &err);
                Err(err)
            }
        }
    }

    async fn dispatch(
        &self,
        request_id: RequestId,
        found: RouteMatch<'_, PageDefinition>,
        parts: &Parts,
        body: &Bytes,
        path: &str,
    ) -> PageResult<Response<Bytes>> {
        let (method, handler) = match invoke::select(found.value, &parts.method) {
            Selection::Handler(method, handler) => (method, handler),
            Selection::Unsupported => return Ok(invoke::unsupported(found.pattern, &parts.method)),
        };

        let query = parse_query(parts.uri.query());
        let form = parse_form(&parts.headers, body, self.max_body_bytes);
        let (mut query, form) = match (query, form) {
            (Ok(query), Ok(form)) => (query, form),
            (Err(err), _) | (_, Err(err)) => {
                tracing::debug!(request_id = %request_id, error = %err, "unreadable request");
                return Ok(extraction_failure(&err));
            }
        };
        query.prepend(found.params);

        let fragment = render::is_fragment_request(&parts.headers, &self.fragment_header);
        let ctx = RequestContext::builder(method, path)
            .request_id(request_id)
            .pattern(found.pattern)
            .query(query)
            .form(form)
            .fragment(fragment)
            .build();

        let outcome = match self.handler_timeout {
            Some(limit) => tokio::time::timeout(limit, invoke::invoke(handler, ctx))
                .await
                .map_err(|_| PageError::timeout(limit))??,
            None => invoke::invoke(handler, ctx).await?,
        };
        Ok(render::finalize(outcome, fragment, self.layout.as_ref()))
    }

    fn serve_asset(&self, relative: &str, parts: &Parts) -> Response<Bytes> {
        match &self.assets {
            Some(files) => files
                .handle(relative, &parts.headers, &parts.method)
                .unwrap_or_else(|err| {
                    if let StaticFileError::Io(e) = &err {
                        tracing::warn!(error = %e, asset = relative, "failed to read asset");
                    }
                    err.into_response()
                }),
            None => not_found(),
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("routes", &self.routes.patterns())
            .field("assets", &self.assets)
            .field("fragment_header", &self.fragment_header)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("handler_timeout", &self.handler_timeout)
            .finish_non_exhaustive()
    }
}

/// Logs the `outbound` record for `response` and returns its status.
fn log_response(request_id: RequestId, response: &Response<Bytes>, duration_ms: u64) -> u16 {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    folio_telemetry::log_outbound!(
        request_id,
        status,
        StatusText::of(response),
        content_type,
        duration_ms
    );
    status
}

fn not_found() -> Response<Bytes> {
    TextResponse::not_found("Not Found").into_response()
}

fn decode_path(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder {
    routes: RouteTable,
    layout: Arc<dyn Layout>,
    tracer: Arc<dyn RequestTracer>,
    assets: Option<StaticFiles>,
    fragment_header: String,
    max_body_bytes: usize,
    handler_timeout: Option<Duration>,
}

impl PipelineBuilder {
    /// A pipeline with no layout, no tracer backend and no asset directory.
    #[must_use]
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            layout: Arc::new(Bare),
            tracer: Arc::new(NoopTracer),
            assets: None,
            fragment_header: DEFAULT_FRAGMENT_HEADER.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_SIZE,
            handler_timeout: None,
        }
    }

    /// Sets the layout composed around full-page responses.
    #[must_use]
    pub fn layout(mut self, layout: impl Layout) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    /// Sets the tracer request spans are opened on.
    #[must_use]
    pub fn tracer(mut self, tracer: impl RequestTracer) -> Self {
        self.tracer = Arc::new(tracer);
        self
    }

    /// Serves assets under the table's prefix from `files`.
    #[must_use]
    pub fn assets(mut self, files: StaticFiles) -> Self {
        self.assets = Some(files);
        self
    }

    /// Sets the header that marks a fragment request.
    #[must_use]
    pub fn fragment_header(mut self, name: impl Into<String>) -> Self {
        self.fragment_header = name.into();
        self
    }

    /// Sets the largest form body read.
    #[must_use]
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Cancels handlers that run longer than `limit`.
    #[must_use]
    pub fn handler_timeout(mut self, limit: Duration) -> Self {
        self.handler_timeout = Some(limit);
        self
    }

    /// Finishes the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            routes: self.routes,
            layout: self.layout,
            tracer: self.tracer,
            assets: self.assets,
            fragment_header: self.fragment_header,
            max_body_bytes: self.max_body_bytes,
            handler_timeout: self.handler_timeout,
        }
    }
}
