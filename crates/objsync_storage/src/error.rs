//! Error types for storage operations.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The record is not a JSON object or cannot be interpreted.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// A declared field is absent from the record.
    #[error("required field '{field}' is missing")]
    MissingField {
        /// The missing field.
        field: String,
    },

    /// A strict lookup did not find the key.
    #[error("key '{key}' does not exist in {store} datastore")]
    KeyNotFound {
        /// Name of the store.
        store: String,
        /// The requested key.
        key: String,
    },

    /// The store is currently held by a writer.
    #[error("{store} datastore is busy, please try again")]
    Busy {
        /// Name of the store.
        store: String,
    },

    /// A record could not be converted to or from its typed form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Returns true if the failure is transient and the operation may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Busy { .. })
    }
}
