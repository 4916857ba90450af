//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use around::identity::{IdIssuer, PlaceholderUser};
use around::ingest::IngestionPipeline;
use around::proximity::ProximityQueryPipeline;
use around::server::AppState;
use around_repository::{
    GeoSearchResult, MediaAttachment, MediaService, MediaStore, MediaStoreError,
    SearchIndexError, SearchIndexProvider, SearchIndexService, SearchIndexServiceConfig,
};
use around_shared::{GeoQuery, IndexedPost, Post};
use async_trait::async_trait;

/// Search index that keeps documents in insertion order and filters by
/// great-circle distance.
#[derive(Default)]
pub struct InMemoryIndex {
    pub documents: Mutex<Vec<IndexedPost>>,
    pub ensure_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub fail_writes: bool,
    pub unreachable: bool,
    /// Store the document, then hold the response this long.
    pub ack_delay: Option<Duration>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn acknowledging_after(delay: Duration) -> Self {
        Self {
            ack_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndexProvider for InMemoryIndex {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn index_document(&self, document: &IndexedPost) -> Result<(), SearchIndexError> {
        if self.unreachable {
            return Err(SearchIndexError::connection("connection refused"));
        }
        if self.fail_writes {
            return Err(SearchIndexError::index("Index failed with status 400"));
        }
        self.documents.lock().unwrap().push(document.clone());
        if let Some(delay) = self.ack_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn geo_search(&self, query: &GeoQuery) -> Result<GeoSearchResult, SearchIndexError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(SearchIndexError::connection("connection refused"));
        }
        let posts: Vec<Post> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| query.contains(&doc.post.location))
            .map(|doc| doc.post.clone())
            .collect();
        Ok(GeoSearchResult {
            total_hits: posts.len() as u64,
            posts,
            took_ms: 1,
            skipped: 0,
        })
    }
}

/// How the fake media store should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaBehavior {
    #[default]
    Succeed,
    BucketMissing,
    CopyInterrupted,
}

/// Media store that records uploads and deletes.
#[derive(Default)]
pub struct RecordingMediaStore {
    pub uploads: Mutex<Vec<(String, usize, Option<String>)>>,
    pub deletes: Mutex<Vec<String>>,
    pub behavior: MediaBehavior,
}

impl RecordingMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: MediaBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    pub fn upload_keys(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _, _)| key.clone())
            .collect()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(
        &self,
        key: &str,
        attachment: MediaAttachment,
    ) -> Result<String, MediaStoreError> {
        match self.behavior {
            MediaBehavior::BucketMissing => {
                Err(MediaStoreError::unavailable("Bucket post-images is not accessible"))
            }
            MediaBehavior::CopyInterrupted => Err(MediaStoreError::upload("connection reset")),
            MediaBehavior::Succeed => {
                self.uploads.lock().unwrap().push((
                    key.to_string(),
                    attachment.len(),
                    attachment.content_type.clone(),
                ));
                Ok(format!("https://media.example.com/post-images/{}", key))
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), MediaStoreError> {
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

/// Issues `post-1`, `post-2`, ...
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl IdIssuer for SequentialIds {
    fn issue(&self) -> String {
        format!("post-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Pipelines wired to in-memory collaborators.
pub struct TestHarness {
    pub index: Arc<InMemoryIndex>,
    pub media: Arc<RecordingMediaStore>,
    pub state: AppState,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with(InMemoryIndex::new(), RecordingMediaStore::new())
    }

    pub fn with(index: InMemoryIndex, media: RecordingMediaStore) -> Self {
        Self::with_config(index, media, SearchIndexServiceConfig::default())
    }

    pub fn with_config(
        index: InMemoryIndex,
        media: RecordingMediaStore,
        config: SearchIndexServiceConfig,
    ) -> Self {
        let index = Arc::new(index);
        let media = Arc::new(media);

        let search = SearchIndexService::with_config(index.clone(), config);
        let ingestion = IngestionPipeline::new(
            search.clone(),
            MediaService::new(media.clone()),
            Arc::new(SequentialIds::default()),
            Arc::new(PlaceholderUser::new("jack")),
        );
        let proximity = ProximityQueryPipeline::new(search);

        Self {
            index,
            media,
            state: AppState::new(ingestion, proximity),
        }
    }
}
