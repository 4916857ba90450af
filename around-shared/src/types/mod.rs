//! Core data structures of the geo-post model.
//!
//! Re-exports `Coordinate`, `Post`, `IndexedPost`, `Distance` and `GeoQuery`.

pub mod coordinate;
pub mod geo_query;
pub mod post;

pub use coordinate::Coordinate;
pub use geo_query::{Distance, GeoQuery};
pub use post::{IndexedPost, Post};
