//! Error types for the mock remote server.

use objsync_storage::StorageError;
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors answered by the mock remote server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// No route matches the path.
    #[error("route '{0}' not found")]
    RouteNotFound(String),

    /// The method is unknown or not allowed on the resource.
    #[error("method not supported")]
    MethodNotAllowed,

    /// No record matches the key or query.
    #[error("could not find {resource} with '{field}={value}'")]
    NotFound {
        /// Resource name.
        resource: String,
        /// Field looked up.
        field: String,
        /// Value looked up.
        value: String,
    },

    /// The request is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The record store rejected the request.
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl ServerError {
    /// Returns the HTTP-like status code.
    pub fn status(&self) -> u16 {
        match self {
            ServerError::RouteNotFound(_) | ServerError::NotFound { .. } => 404,
            ServerError::MethodNotAllowed => 405,
            ServerError::InvalidRequest(_) => 400,
            ServerError::Storage(err) if err.is_retryable() => 503,
            ServerError::Storage(StorageError::KeyNotFound { .. }) => 404,
            ServerError::Storage(_) => 400,
        }
    }

    /// Returns the `{"error": ...}` response body.
    pub fn body(&self) -> Value {
        json!({ "error": self.to_string() })
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }
}
