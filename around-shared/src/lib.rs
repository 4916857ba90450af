//! # Around Shared
//!
//! This crate defines the data structures exchanged between the HTTP layer,
//! the blob store and the search index: coordinates, posts and geo queries.
//! It performs no I/O.

pub mod errors;
pub mod types;

pub use errors::ModelError;
pub use types::coordinate::Coordinate;
pub use types::geo_query::{Distance, GeoQuery, DEFAULT_RADIUS_KM};
pub use types::post::{IndexedPost, Post};
