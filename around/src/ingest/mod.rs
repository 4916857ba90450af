//! Ingestion pipeline for post submissions.
//!
//! A submission moves through
//! `Received -> Validated -> Identified -> (MediaUploaded | NoMedia) -> Indexed -> Complete`.
//! Any failure aborts the request. Validation failures abort before any
//! external call, and a post is never indexed before its media upload has
//! finished.

use std::sync::Arc;

use around_repository::{MediaAttachment, MediaService, SearchIndexService};
use around_shared::{Coordinate, IndexedPost, Post};
use tracing::{debug, info, instrument, warn};

use crate::errors::PostError;
use crate::identity::{CurrentUser, IdIssuer};

/// Raw post submission as decoded by the transport layer.
///
/// Coordinates are kept as the client's strings; the pipeline owns parsing.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub message: String,
    pub lat: String,
    pub lon: String,
    pub attachment: Option<MediaAttachment>,
}

/// Acknowledgement for a stored post.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReceipt {
    pub id: String,
    pub post: Post,
}

/// Stages of a single ingestion, recorded in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    Validated,
    Identified,
    MediaUploaded,
    NoMedia,
    Indexed,
    Complete,
}

/// Validates, uploads, and indexes incoming posts.
pub struct IngestionPipeline {
    search: SearchIndexService,
    media: MediaService,
    ids: Arc<dyn IdIssuer>,
    user: Arc<dyn CurrentUser>,
}

impl IngestionPipeline {
    pub fn new(
        search: SearchIndexService,
        media: MediaService,
        ids: Arc<dyn IdIssuer>,
        user: Arc<dyn CurrentUser>,
    ) -> Self {
        Self {
            search,
            media,
            ids,
            user,
        }
    }

    /// Store one post, uploading its attachment first when present.
    ///
    /// # Returns
    ///
    /// * `Ok(IngestReceipt)` - The post is indexed and searchable
    /// * `Err(PostError::InvalidCoordinate)` - Nothing was uploaded or indexed
    /// * `Err(PostError::StorageUnavailable | UploadFailed)` - Nothing was indexed
    /// * `Err(PostError::IndexWriteFailed)` - The engine rejected the post; any
    ///   uploaded media has been removed on a best-effort basis
    /// * `Err(PostError::SearchUnavailable)` - The write outcome is unknown, so
    ///   uploaded media is kept
    #[instrument(
        skip(self, submission),
        fields(has_media = submission.attachment.is_some())
    )]
    pub async fn ingest(&self, submission: PostSubmission) -> Result<IngestReceipt, PostError> {
        debug!(stage = ?IngestStage::Received, "Post submission received");

        let PostSubmission {
            message,
            lat,
            lon,
            attachment,
        } = submission;

        let location = Coordinate::parse(&lat, &lon).map_err(|e| {
            warn!(stage = ?IngestStage::Validated, error = %e, "Aborting ingestion: invalid submission");
            PostError::from(e)
        })?;
        let post = Post::new(self.user.author(), message, location);
        debug!(stage = ?IngestStage::Validated, lat = location.lat(), lon = location.lon(), "Submission validated");

        let id = self.ids.issue();
        debug!(stage = ?IngestStage::Identified, id = %id, "Post id issued");

        let (post, uploaded) = match attachment {
            Some(attachment) => {
                let url = self.media.upload(&id, attachment).await.map_err(|e| {
                    warn!(stage = ?IngestStage::MediaUploaded, id = %id, error = %e, "Aborting ingestion: media upload failed");
                    PostError::from(e)
                })?;
                debug!(stage = ?IngestStage::MediaUploaded, id = %id, url = %url, "Media uploaded");
                (post.with_media_url(url), true)
            }
            None => {
                debug!(stage = ?IngestStage::NoMedia, id = %id, "No media attached");
                (post, false)
            }
        };

        let document = IndexedPost::new(id, post);
        if let Err(e) = self.search.index(&document).await {
            warn!(stage = ?IngestStage::Indexed, id = %document.id, error = %e, "Aborting ingestion: index write failed");
            if uploaded {
                if e.is_unavailable() {
                    // The write may have landed; keep the media its url points at
                    warn!(id = %document.id, "Index write outcome unknown, keeping uploaded media");
                } else {
                    self.discard_media(&document.id).await;
                }
            }
            return Err(PostError::from_index_write(e));
        }
        debug!(stage = ?IngestStage::Indexed, id = %document.id, "Post indexed");

        info!(
            stage = ?IngestStage::Complete,
            id = %document.id,
            message = %document.post.message,
            "Post saved"
        );

        Ok(IngestReceipt {
            id: document.id,
            post: document.post,
        })
    }

    /// Remove media whose post could not be indexed.
    async fn discard_media(&self, id: &str) {
        match self.media.delete(id).await {
            Ok(()) => debug!(id = %id, "Removed orphaned media"),
            Err(e) => warn!(id = %id, error = %e, "Failed to remove orphaned media"),
        }
    }
}
