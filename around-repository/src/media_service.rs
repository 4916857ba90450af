//! Media service: the blob store facade used by the ingestion pipeline.

use std::future::Future;
use std::sync::Arc;

use tokio::time::timeout;
use tracing::warn;

use crate::config::MediaServiceConfig;
use crate::errors::MediaStoreError;
use crate::interfaces::MediaStore;
use crate::types::MediaAttachment;

/// Bounds every blob store call with the configured request timeout.
///
/// A timeout surfaces as `MediaStoreError::Timeout`, which callers treat the
/// same as an unreachable store.
#[derive(Clone)]
pub struct MediaService {
    store: Arc<dyn MediaStore>,
    config: MediaServiceConfig,
}

impl MediaService {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self {
            store,
            config: MediaServiceConfig::default(),
        }
    }

    pub fn with_config(store: Arc<dyn MediaStore>, config: MediaServiceConfig) -> Self {
        Self { store, config }
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, MediaStoreError>
    where
        F: Future<Output = Result<T, MediaStoreError>>,
    {
        let limit = self.config.request_timeout;
        match timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = limit.as_millis() as u64, "Media store call timed out");
                Err(MediaStoreError::timeout(operation, limit))
            }
        }
    }

    /// Upload an attachment under `key` and return its public media URL.
    pub async fn upload(
        &self,
        key: &str,
        attachment: MediaAttachment,
    ) -> Result<String, MediaStoreError> {
        self.bounded("upload", self.store.upload(key, attachment))
            .await
    }

    /// Delete the object stored under `key`.
    pub async fn delete(&self, key: &str) -> Result<(), MediaStoreError> {
        self.bounded("delete", self.store.delete(key)).await
    }
}
