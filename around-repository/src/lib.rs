//! # Around Repository
//!
//! This crate provides traits and implementations for the two external stores
//! behind the around service: the geo-enabled search index and the media blob
//! store. It includes error definitions, the collaborator interfaces, concrete
//! OpenSearch and Google Cloud Storage backends, and service facades that add
//! request timeouts.

pub mod config;
pub mod errors;
pub mod gcs;
pub mod interfaces;
pub mod media_service;
pub mod opensearch;
pub mod service;
pub mod types;
pub mod utils;

pub use config::{MediaServiceConfig, SearchIndexServiceConfig};
pub use errors::{MediaStoreError, SearchIndexError};
pub use gcs::{GcsConfig, GcsCredentials, GcsMediaStore};
pub use interfaces::{MediaStore, SearchIndexProvider};
pub use media_service::MediaService;
pub use opensearch::{IndexConfig, OpenSearchProvider};
pub use service::SearchIndexService;
pub use types::{GeoSearchResult, MediaAttachment};
