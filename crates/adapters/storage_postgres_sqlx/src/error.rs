//! Storage-specific error type wrapping sqlx errors.

use devicestore_domain::error::DeviceStoreError;

/// Errors originating from the `PostgreSQL` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for DeviceStoreError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
