//! Server and route table errors.

use folio_router::{ConventionError, InsertError};
use thiserror::Error;

/// Errors raised while building the route table or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("bind error: {0}")]
    Bind(String),

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A page file name does not follow the naming convention.
    #[error("invalid page file: {0}")]
    Convention(#[from] ConventionError),

    /// A pattern could not be added to the route table.
    #[error("invalid route: {0}")]
    Route(#[from] InsertError),

    /// A page file that maps to no route (a layout or private helper).
    #[error("'{0}' is not a routable page file")]
    NotRoutable(String),
}

/// Result type alias using [`ServerError`].
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ServerError::Bind("address in use".to_string());
        assert_eq!(err.to_string(), "bind error: address in use");

        let err = ServerError::NotRoutable("_layout.rs".to_string());
        assert!(err.to_string().contains("_layout.rs"));
    }

    #[test]
    fn test_from_io() {
        let err: ServerError = std::io::Error::other("reset").into();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
