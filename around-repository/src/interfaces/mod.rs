//! Interfaces for the external stores.
//!
//! Defines the traits implemented by the search index and blob store backends.

mod media_store;
mod search_index_provider;

pub use media_store::MediaStore;
pub use search_index_provider::SearchIndexProvider;
