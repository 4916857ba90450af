//! Media store error types.

use std::time::Duration;

use thiserror::Error;

/// Errors from the media blob store.
#[derive(Debug, Clone, Error)]
pub enum MediaStoreError {
    /// The target bucket is missing, inaccessible, or the store is unreachable.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Writing the object, publishing it, or reading back its URL failed.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Removing an object failed.
    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    /// The store client could not be built from its configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The call did not complete within the configured time budget.
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },
}

impl MediaStoreError {
    /// Create a storage unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Create an upload failed error.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    /// Create a delete failed error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteFailed(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(operation: &'static str, elapsed: Duration) -> Self {
        Self::Timeout { operation, elapsed }
    }

    /// True when the store could not be reached or did not answer in time.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::Timeout { .. })
    }
}
