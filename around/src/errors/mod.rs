//! Error types for post ingestion and proximity search.
//!
//! `PostError` is what the pipelines return and what the HTTP layer renders.
//! Collaborator details are kept for logging; clients only see a short message.

use around_repository::{MediaStoreError, SearchIndexError};
use around_shared::ModelError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors that can occur while handling a post or search request.
#[derive(Error, Debug)]
pub enum PostError {
    /// Submitted latitude/longitude missing, malformed, or out of range.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Search parameters missing or malformed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The request body could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Blob store unreachable, bucket missing, or call timed out.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Media write, publish, or read-back failed.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// The search index rejected the post.
    #[error("Index write failed: {0}")]
    IndexWriteFailed(String),

    /// Search index unreachable, timed out, or failed to run the query.
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),
}

impl PostError {
    /// Classify a failure from the index write step of ingestion.
    pub fn from_index_write(err: SearchIndexError) -> Self {
        if err.is_unavailable() {
            Self::SearchUnavailable(err.to_string())
        } else {
            Self::IndexWriteFailed(err.to_string())
        }
    }

    /// Classify a failure from a geo search.
    pub fn from_search(err: SearchIndexError) -> Self {
        match err {
            SearchIndexError::QueryError(_) | SearchIndexError::ValidationError(_) => {
                Self::InvalidQuery(err.to_string())
            }
            other => Self::SearchUnavailable(other.to_string()),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCoordinate(_) | Self::InvalidQuery(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::StorageUnavailable(_) | Self::SearchUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::UploadFailed(_) => StatusCode::BAD_GATEWAY,
            Self::IndexWriteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients.
    ///
    /// Validation messages are echoed; collaborator failures are summarized.
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidCoordinate(msg) | Self::InvalidQuery(msg) | Self::BadRequest(msg) => {
                msg.clone()
            }
            Self::StorageUnavailable(_) => "Media storage is unavailable".to_string(),
            Self::UploadFailed(_) => "Failed to upload media".to_string(),
            Self::IndexWriteFailed(_) => "Failed to save post".to_string(),
            Self::SearchUnavailable(_) => "Search is unavailable".to_string(),
        }
    }
}

impl From<ModelError> for PostError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidCoordinate(msg) => Self::InvalidCoordinate(msg),
            ModelError::InvalidDistance(msg) => Self::InvalidQuery(msg),
        }
    }
}

impl From<MediaStoreError> for PostError {
    fn from(err: MediaStoreError) -> Self {
        if err.is_unavailable() {
            Self::StorageUnavailable(err.to_string())
        } else {
            Self::UploadFailed(err.to_string())
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        }

        (
            status,
            Json(json!({
                "status": "error",
                "message": self.client_message()
            })),
        )
            .into_response()
    }
}
