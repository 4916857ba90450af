//! Google Cloud Storage implementation of the media store.
//!
//! Talks to the Cloud Storage JSON API over HTTP, so any compatible endpoint
//! (including local emulators) can be targeted through `GcsConfig::base_url`.

mod store;

pub use store::{GcsConfig, GcsCredentials, GcsMediaStore, DEFAULT_GCS_BASE_URL};
