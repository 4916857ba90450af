//! # Around
//!
//! Location-aware post service: clients submit short text posts tagged with a
//! coordinate, optionally with an image, and later query for posts within a
//! radius of a coordinate.
//!
//! ## Architecture
//!
//! The service wires two pipelines over injected collaborators:
//!
//! 1. **Ingestion**: validate a submission, issue an id, upload media to the
//!    blob store, index the post
//! 2. **Proximity query**: parse the search parameters and run a geo-distance
//!    search against the index
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`identity`]: Identifier issuer and current-user accessor
//! - [`ingest`]: Ingestion pipeline
//! - [`proximity`]: Proximity query pipeline
//! - [`server`]: HTTP routes and handlers
//! - [`errors`]: Error types for request handling

pub mod config;
pub mod errors;
pub mod identity;
pub mod ingest;
pub mod proximity;
pub mod server;

pub use config::{Dependencies, Settings};
pub use errors::PostError;

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP server error.
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
