//! Error types for the sync engine.

use objsync_core::GraphError;
use objsync_storage::StorageError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, SyncError>;

/// Errors that can occur while preparing or performing a sync.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Object map failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Dependency graph failure.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// No backend registered under the requested name.
    #[error("integration backend '{0}' does not exist")]
    BackendNotFound(String),

    /// The backend has no remote constructor for a local type.
    #[error("no remote entity mapped for local type {0}")]
    UnmappedEntity(String),

    /// A remote constructor rejected the local value.
    #[error("cannot convert {local_type}: {message}")]
    Conversion {
        /// Local type being converted.
        local_type: &'static str,
        /// Reason.
        message: String,
    },

    /// The entity type has no endpoint.
    #[error("no endpoint configured for {0}")]
    MissingEndpoint(&'static str),

    /// The entity type has no object map.
    #[error("no object map configured for {0}")]
    MissingObjectMap(&'static str),

    /// A read-only entity lacks its lookup value.
    #[error("{entity_type} has no value for lookup field '{field}'")]
    MissingLookupValue {
        /// Entity type.
        entity_type: &'static str,
        /// Lookup field name.
        field: String,
    },
}

impl SyncError {
    /// Returns true if repeating the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Storage(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if the error is a configuration problem of the backend.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SyncError::BackendNotFound(_)
                | SyncError::UnmappedEntity(_)
                | SyncError::MissingEndpoint(_)
                | SyncError::MissingObjectMap(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SyncError::BackendNotFound("quickbooks".into());
        assert_eq!(
            err.to_string(),
            "integration backend 'quickbooks' does not exist"
        );

        let err = SyncError::MissingLookupValue {
            entity_type: "Currency",
            field: "iso_code".into(),
        };
        assert_eq!(
            err.to_string(),
            "Currency has no value for lookup field 'iso_code'"
        );
    }

    #[test]
    fn busy_storage_is_retryable() {
        let err = SyncError::from(StorageError::Busy {
            store: "Vendor".into(),
        });
        assert!(err.is_retryable());
        assert!(!SyncError::MissingEndpoint("Vendor").is_retryable());
    }

    #[test]
    fn configuration_errors() {
        assert!(SyncError::MissingObjectMap("Item").is_configuration());
        assert!(!SyncError::MissingLookupValue {
            entity_type: "Currency",
            field: "iso_code".into()
        }
        .is_configuration());
    }
}
