//! Search index error types.
//!
//! This module defines the unified error type for all search index operations,
//! including low-level backend errors and request validation errors.

use std::time::Duration;

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait and `SearchIndexService` for all
/// search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., empty document id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend rejected a document write.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// The backend rejected the query itself (HTTP 400).
    #[error("Query error: {0}")]
    QueryError(String),

    /// The backend failed to execute a well-formed query.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Failed to parse a response from the search index backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search index backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The call did not complete within the configured time budget.
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(operation: &'static str, elapsed: Duration) -> Self {
        Self::Timeout { operation, elapsed }
    }

    /// True when the backend could not be reached or did not answer in time.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::Timeout { .. })
    }
}
