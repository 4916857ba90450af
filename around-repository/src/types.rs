//! Request and result types for the repository operations.

use around_shared::Post;
use bytes::Bytes;

/// Outcome of a geo-distance search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoSearchResult {
    /// Decoded posts in engine order.
    pub posts: Vec<Post>,

    /// Total number of matching documents reported by the engine.
    pub total_hits: u64,

    /// Time the engine spent executing the query.
    pub took_ms: u64,

    /// Hits dropped because their source did not decode as a post.
    pub skipped: usize,
}

impl GeoSearchResult {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// A media file attached to a post submission.
#[derive(Debug, Clone)]
pub struct MediaAttachment {
    /// MIME type as sent by the client.
    pub content_type: Option<String>,

    pub data: Bytes,
}

impl MediaAttachment {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
