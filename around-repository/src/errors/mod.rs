//! Error types for the around repository.
//!
//! One error type per external store: the search index and the media blob store.

mod media_store_error;
mod search_index_error;

pub use media_store_error::MediaStoreError;
pub use search_index_error::SearchIndexError;
