//! HTTP server.
//!
//! A Tokio accept loop feeding Hyper HTTP/1.1 connections. Each request body
//! is read in full, handed to the [`Pipeline`] and the result written back.
//! A custom status text travels as the response's reason phrase.
//!
//! ```rust,no_run
//! use folio_server::{Pipeline, RouteTable, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::builder(RouteTable::builder().build()).build();
//!     let config = ServerConfig::builder().http_addr("127.0.0.1:1337").build();
//!
//!     Server::new(config, pipeline).run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use folio_core::{PageError, StatusText};
use folio_extract::response::TextResponse;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::ext::ReasonPhrase;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::pipeline::Pipeline;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// How much longer than the pipeline's handler timeout the transport waits
/// before giving up on a request itself.
pub const HANDLER_TIMEOUT_GRACE: Duration = Duration::from_millis(250);

/// Type alias for the HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// The Folio HTTP server.
pub struct Server {
    config: ServerConfig,
    pipeline: Arc<Pipeline>,
}

impl Server {
    /// Creates a server that answers with `pipeline`.
    ///
    /// ```rust
    /// use folio_server::{Pipeline, RouteTable, Server, ServerConfig};
    ///
    /// let config = ServerConfig::builder().http_addr("127.0.0.1:3000").build();
    /// let server = Server::new(config, Pipeline::builder(RouteTable::builder().build()).build());
    /// assert_eq!(server.config().http_addr(), "127.0.0.1:3000");
    /// ```
    #[must_use]
    pub fn new(config: ServerConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The request pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// How long the transport waits for the pipeline.
    ///
    /// Always outlasts the pipeline's handler timeout by
    /// [`HANDLER_TIMEOUT_GRACE`], so a slow handler is reported by the
    /// pipeline as a timeout rather than dropped mid-flight.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use folio_server::{Pipeline, RouteTable, Server, ServerConfig, HANDLER_TIMEOUT_GRACE};
    ///
    /// let limit = Duration::from_millis(500);
    /// let pipeline = Pipeline::builder(RouteTable::builder().build())
    ///     .handler_timeout(limit)
    ///     .build();
    /// let config = ServerConfig::builder().request_timeout(limit).build();
    /// let server = Server::new(config, pipeline);
    /// assert_eq!(server.pipeline_timeout(), limit + HANDLER_TIMEOUT_GRACE);
    /// ```
    #[must_use]
    pub fn pipeline_timeout(&self) -> Duration {
        let request_timeout = self.config.request_timeout();
        match self.pipeline.handler_timeout() {
            Some(limit) => request_timeout.max(limit.saturating_add(HANDLER_TIMEOUT_GRACE)),
            None => request_timeout,
        }
    }

    /// Runs until `SIGINT` or `SIGTERM`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be bound.
    pub async fn run(self) -> ServerResult<()> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and runs until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("invalid address '{}': {e}", self.config.http_addr()))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        self.serve(listener, shutdown).await
    }

    /// Accepts connections on `listener` until `shutdown` triggers, then
    /// waits up to the shutdown timeout for open connections to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, routes = self.pipeline.routes().len(), "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::debug!(%remote_addr, error = %e, "connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            active = tracker.active_connections(),
            "waiting for connections to close"
        );

        tokio::select! {
            () = tracker.wait_for_shutdown() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "shutdown timeout reached"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(%remote_addr, "closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, req: Request<Incoming>) -> Result<HttpResponse, Infallible> {
        let timeout = self.config.request_timeout();
        let (parts, body) = req.into_parts();

        let body = match tokio::time::timeout(timeout, body.collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to read request body");
                return Ok(plain(StatusCode::BAD_REQUEST));
            }
            Err(_) => {
                tracing::warn!(path = parts.uri.path(), "request body read timed out");
                return Ok(plain(StatusCode::REQUEST_TIMEOUT));
            }
        };

        let request = Request::from_parts(parts, body);
        let limit = self.pipeline_timeout();
        let response = match tokio::time::timeout(limit, self.pipeline.handle(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => error_response(&err),
            Err(_) => {
                tracing::warn!(timeout = ?limit, "request timed out");
                TextResponse::new("Gateway Timeout")
                    .with_status(StatusCode::GATEWAY_TIMEOUT)
                    .into_response()
            }
        };
        Ok(into_http(response))
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

/// The plain-text response sent for a handler fault or timeout.
#[must_use]
pub fn error_response(err: &PageError) -> Response<Bytes> {
    let status = err.status_code();
    TextResponse::new(status.canonical_reason().unwrap_or("Error"))
        .with_status(status)
        .into_response()
}

fn plain(status: StatusCode) -> HttpResponse {
    into_http(
        TextResponse::new(status.canonical_reason().unwrap_or("Error"))
            .with_status(status)
            .into_response(),
    )
}

/// Moves a status text extension into Hyper's reason phrase and wraps the body.
fn into_http(response: Response<Bytes>) -> HttpResponse {
    let (mut parts, body) = response.into_parts();
    if let Some(StatusText(text)) = parts.extensions.remove::<StatusText>() {
        match ReasonPhrase::try_from(text.into_owned()) {
            Ok(reason) => {
                parts.extensions.insert(reason);
            }
            Err(e) => tracing::debug!(error = %e, "status text is not a valid reason phrase"),
        }
    }
    Response::from_parts(parts, Full::new(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteTable;
    use folio_core::{el, PageDefinition, PageOutcome, RequestContext};
    use folio_telemetry::{RecordingTracer, SpanStatus};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn routes() -> RouteTable {
        RouteTable::builder()
            .page(
                "index.rs",
                PageDefinition::new().post(|_ctx: RequestContext| async {
                    Ok(PageOutcome::render(el("p").text("posted")))
                }),
            )
            .unwrap()
            .page(
                "broken.rs",
                PageDefinition::new().get(|_ctx: RequestContext| async {
                    Err(PageError::fault("store unavailable"))
                }),
            )
            .unwrap()
            .page(
                "slow.rs",
                PageDefinition::new().get(|_ctx: RequestContext| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(PageOutcome::render(el("p").text("late")))
                }),
            )
            .unwrap()
            .build()
    }

    fn pipeline() -> Pipeline {
        Pipeline::builder(routes()).build()
    }

    fn server() -> Server {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:0")
            .shutdown_timeout(Duration::from_millis(100))
            .build();
        Server::new(config, pipeline())
    }

    async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_into_http_moves_status_text() {
        let response = TextResponse::not_found("/ doesn't handle 'GET' method").into_response();
        let response = into_http(response);

        assert!(response.extensions().get::<StatusText>().is_none());
        let reason = response.extensions().get::<ReasonPhrase>().unwrap();
        assert_eq!(reason.as_bytes(), b"/ doesn't handle 'GET' method");
    }

    #[test]
    fn test_into_http_drops_invalid_reason() {
        let mut response = Response::new(Bytes::new());
        response.extensions_mut().insert(StatusText::new("bad\r\nreason"));
        let response = into_http(response);
        assert!(response.extensions().get::<ReasonPhrase>().is_none());
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(&PageError::fault("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = error_response(&PageError::timeout(Duration::from_millis(5)));
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_server_run_invalid_address() {
        let config = ServerConfig::builder().http_addr("not-a-valid-address").build();
        let result = Server::new(config, pipeline())
            .run_with_shutdown(ShutdownSignal::new())
            .await;

        match result {
            Err(ServerError::Bind(msg)) => assert!(msg.contains("invalid address")),
            other => panic!("expected bind error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_run_and_shutdown() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result =
            tokio::time::timeout(Duration::from_secs(5), server().run_with_shutdown(shutdown))
                .await;
        assert!(result.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_serves_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = ShutdownSignal::new();
        let handle = tokio::spawn(server().serve(listener, shutdown.clone()));

        let response = roundtrip(
            addr,
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("<p>posted</p>"));

        let response = roundtrip(
            addr,
            "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 404 / doesn't handle 'GET' method\r\n"));

        let response = roundtrip(
            addr,
            "GET /broken HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error"));

        shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.unwrap().unwrap().is_ok());
    }

    #[test]
    fn test_pipeline_timeout_outlasts_handler_timeout() {
        let limit = Duration::from_millis(50);
        let config = ServerConfig::builder().request_timeout(limit).build();

        let server = Server::new(config.clone(), pipeline());
        assert_eq!(server.pipeline_timeout(), limit);

        let pipeline = Pipeline::builder(RouteTable::builder().build())
            .handler_timeout(limit)
            .build();
        let server = Server::new(config, pipeline);
        assert_eq!(server.pipeline_timeout(), limit + HANDLER_TIMEOUT_GRACE);

        let pipeline = Pipeline::builder(RouteTable::builder().build())
            .handler_timeout(Duration::MAX)
            .build();
        let config = ServerConfig::builder().request_timeout(Duration::MAX).build();
        assert_eq!(Server::new(config, pipeline).pipeline_timeout(), Duration::MAX);
    }

    #[tokio::test]
    async fn test_equal_timeouts_report_handler_timeout() {
        let limit = Duration::from_millis(50);
        let tracer = RecordingTracer::new();
        let pipeline = Pipeline::builder(routes())
            .tracer(tracer.clone())
            .handler_timeout(limit)
            .build();
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:0")
            .request_timeout(limit)
            .shutdown_timeout(Duration::from_millis(100))
            .build();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = ShutdownSignal::new();
        let handle = tokio::spawn(Server::new(config, pipeline).serve(listener, shutdown.clone()));

        let response = roundtrip(
            addr,
            "GET /slow HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 504 Gateway Timeout"));

        let spans = tracer.finished();
        assert_eq!(spans.len(), 1);
        assert!(matches!(&spans[0].status, SpanStatus::Error { kind, .. } if kind == "timeout"));

        shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.unwrap().unwrap().is_ok());
    }
}
