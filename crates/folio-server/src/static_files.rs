//! Static asset serving.
//!
//! Requests under the asset prefix never reach page dispatch. The remainder
//! of the path is resolved inside the asset directory and served as is.
//!
//! - `GET` and `HEAD` only
//! - no `..` components, no hidden files, nothing outside the root after
//!   symlinks are resolved
//! - `Content-Type` from the file extension
//! - `Last-Modified`, with `If-Modified-Since` answered by `304`

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use folio_extract::response::TextResponse;
use http::{header, HeaderMap, HeaderValue, Method, Response, StatusCode};
use thiserror::Error;

/// Why an asset could not be served.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// No file at that path.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The path tried to leave the asset directory or named a hidden file.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Only `GET` and `HEAD` are served.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticFileError {
    /// The status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A plain-text response for this error.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status_code();
        let reason = status.canonical_reason().unwrap_or("Error");
        let mut response = TextResponse::new(reason)
            .with_status(status)
            .with_status_text(reason)
            .into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}

/// Serves files from a root directory.
///
/// ```rust
/// use folio_server::StaticFiles;
///
/// let files = StaticFiles::new("public").cache_control("max-age=3600");
/// assert_eq!(files.root(), std::path::Path::new("public"));
/// ```
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    cache_control: Option<String>,
}

impl StaticFiles {
    /// Serves files below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache_control: None,
        }
    }

    /// Sets the `Cache-Control` header sent with every file.
    #[must_use]
    pub fn cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serves `relative`, a path below the root with or without a leading `/`.
    pub fn handle(
        &self,
        relative: &str,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<Response<Bytes>, StaticFileError> {
        if method != Method::GET && method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        let path = self.resolve_path(relative)?;
        if !path.is_file() {
            return Err(StaticFileError::NotFound(relative.to_string()));
        }
        self.serve_file(&path, headers, method)
    }

    fn resolve_path(&self, relative: &str) -> Result<PathBuf, StaticFileError> {
        let relative = relative.trim_start_matches('/');

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(name) => {
                    if name.to_str().is_some_and(|n| n.starts_with('.')) {
                        return Err(StaticFileError::Forbidden(
                            "hidden files are not served".to_string(),
                        ));
                    }
                }
                Component::CurDir => {}
                _ => {
                    return Err(StaticFileError::Forbidden(
                        "directory traversal is not allowed".to_string(),
                    ));
                }
            }
        }

        let canonical = self
            .root
            .join(relative)
            .canonicalize()
            .map_err(|_| StaticFileError::NotFound(relative.to_string()))?;
        let root = self
            .root
            .canonicalize()
            .map_err(|_| StaticFileError::NotFound(relative.to_string()))?;

        if !canonical.starts_with(&root) {
            return Err(StaticFileError::Forbidden(
                "path escapes the asset directory".to_string(),
            ));
        }
        Ok(canonical)
    }

    fn serve_file(
        &self,
        path: &Path,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<Response<Bytes>, StaticFileError> {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata.modified().ok();

        if let (Some(modified), Some(since)) = (modified, if_modified_since(headers)) {
            if unix_secs(modified) <= unix_secs(since) {
                return Ok(self.with_common_headers(
                    Response::builder().status(StatusCode::NOT_MODIFIED),
                    modified,
                    Bytes::new(),
                ));
            }
        }

        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(std::fs::read(path)?)
        };

        let builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, detect_mime_type(path))
            .header(header::CONTENT_LENGTH, metadata.len());
        Ok(self.with_common_headers(builder, modified.unwrap_or(SystemTime::UNIX_EPOCH), body))
    }

    fn with_common_headers(
        &self,
        mut builder: http::response::Builder,
        modified: SystemTime,
        body: Bytes,
    ) -> Response<Bytes> {
        if modified != SystemTime::UNIX_EPOCH {
            builder = builder.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
        }
        if let Some(cache_control) = &self.cache_control {
            builder = builder.header(header::CACHE_CONTROL, cache_control.as_str());
        }
        builder.body(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to build asset response");
            let mut response = Response::new(Bytes::new());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
    }
}

fn if_modified_since(headers: &HeaderMap) -> Option<SystemTime> {
    let value = headers.get(header::IF_MODIFIED_SINCE)?.to_str().ok()?;
    httpdate::parse_http_date(value).ok()
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn detect_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        "webmanifest" => "application/manifest+json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.css"), "body { color: red }").unwrap();
        fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();
        fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img").join("logo.PNG"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
        dir
    }

    #[test]
    fn test_serve_css() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let response = files
            .handle("/index.css", &HeaderMap::new(), &Method::GET)
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/css; charset=utf-8"
        );
        assert_eq!(response.body().as_ref(), b"body { color: red }");
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
    }

    #[test]
    fn test_nested_file_and_uppercase_extension() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let response = files
            .handle("img/logo.PNG", &HeaderMap::new(), &Method::GET)
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }

    #[test]
    fn test_head_has_no_body() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let response = files
            .handle("/app.js", &HeaderMap::new(), &Method::HEAD)
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "17");
    }

    #[test]
    fn test_missing_file() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let err = files
            .handle("/nope.css", &HeaderMap::new(), &Method::GET)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let err = files.handle("/img", &HeaderMap::new(), &Method::GET).unwrap_err();
        assert!(matches!(err, StaticFileError::NotFound(_)));
    }

    #[test]
    fn test_traversal_and_hidden_files_are_forbidden() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let err = files
            .handle("/../etc/passwd", &HeaderMap::new(), &Method::GET)
            .unwrap_err();
        assert!(matches!(err, StaticFileError::Forbidden(_)));

        let err = files.handle("/.env", &HeaderMap::new(), &Method::GET).unwrap_err();
        assert!(matches!(err, StaticFileError::Forbidden(_)));
    }

    #[test]
    fn test_post_is_rejected() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let err = files
            .handle("/index.css", &HeaderMap::new(), &Method::POST)
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }

    #[test]
    fn test_not_modified() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path()).cache_control("max-age=60");

        let first = files
            .handle("/index.css", &HeaderMap::new(), &Method::GET)
            .unwrap();
        let last_modified = first.headers()[header::LAST_MODIFIED].clone();

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_MODIFIED_SINCE, last_modified);
        let second = files.handle("/index.css", &headers, &Method::GET).unwrap();

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert!(second.body().is_empty());
        assert_eq!(second.headers()[header::CACHE_CONTROL], "max-age=60");
    }

    #[test]
    fn test_mime_fallback() {
        assert_eq!(detect_mime_type(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(detect_mime_type(Path::new("noext")), "application/octet-stream");
        assert_eq!(detect_mime_type(Path::new("x.woff2")), "font/woff2");
    }
}
