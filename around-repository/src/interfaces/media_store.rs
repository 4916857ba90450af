//! Media blob store trait definition.

use async_trait::async_trait;

use crate::errors::MediaStoreError;
use crate::types::MediaAttachment;

/// Abstracts the object store that holds post attachments.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `attachment` under `key`, make it publicly readable, and return
    /// its durable media URL.
    ///
    /// The attachment is consumed; its buffer is released on every exit path.
    async fn upload(&self, key: &str, attachment: MediaAttachment)
        -> Result<String, MediaStoreError>;

    /// Remove the object stored under `key`. A missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), MediaStoreError>;
}
