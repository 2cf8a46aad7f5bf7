//! Test client for in-memory page requests.

use std::sync::Arc;

use bytes::Bytes;
use folio_server::{error_response, Pipeline, DEFAULT_FRAGMENT_HEADER};
use http::{header, HeaderName, HeaderValue, Method, Request};

use crate::error::TestError;
use crate::response::TestResponse;

/// Sends requests through a [`Pipeline`] without a network.
///
/// Clones share the same pipeline, so page state written by one request is
/// seen by the next.
#[derive(Clone)]
#[must_use]
pub struct TestClient {
    pipeline: Arc<Pipeline>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps `pipeline`.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The wrapped pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Starts a `GET` request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a `POST` request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a `PUT` request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a `PATCH` request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a `DELETE` request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestRequest<'_> {
        let mut request = TestRequest {
            client: self,
            method,
            uri: uri.as_ref().to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
        };
        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }
        request
    }
}

impl std::fmt::Debug for TestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestClient")
            .field("pipeline", &self.pipeline)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

/// A request being built against a [`TestClient`].
#[must_use]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl TestRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Marks the request as a fragment request.
    pub fn fragment(self) -> Self {
        self.header(DEFAULT_FRAGMENT_HEADER, "true")
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(self, value: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), value)
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a urlencoded form body and its content type.
    pub fn form<K, V>(mut self, fields: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = fields
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k.as_ref()),
                    urlencoding::encode(v.as_ref())
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        self.body = Bytes::from(encoded);
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Sends the request. A handler fault or timeout becomes the same
    /// plain-text error response the server sends.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(TestError::Page(err)) => TestResponse::from_http(error_response(&err)),
            Err(err) => panic!("test request failed: {err}"),
        }
    }

    /// Sends the request, keeping a handler error as [`TestError::Page`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the handler fails.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let client = self.client;
        let request = self.build()?;
        let response = client.pipeline.handle(request).await?;
        Ok(TestResponse::from_http(response))
    }

    fn build(self) -> Result<Request<Bytes>, TestError> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TestError::RequestBuild(format!("invalid header name: {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TestError::RequestBuild(format!("invalid header value: {e}")))?;
            builder = builder.header(name, value);
        }
        builder
            .body(self.body)
            .map_err(|e| TestError::RequestBuild(e.to_string()))
    }
}
