// HTTP request handlers
use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use around_shared::Post;

use crate::errors::PostError;
use crate::proximity::SearchParams;
use crate::server::multipart::read_submission;
use crate::server::state::AppState;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Around service is running")
}

/// Post endpoint - receives a multipart post with optional `image` and stores it
pub async fn create_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, PostError> {
    let submission = read_submission(multipart).await?;
    info!(message = %submission.message, "Received one post request");

    let receipt = state.ingestion.ingest(submission).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "id": receipt.id
        })),
    ))
}

/// Search endpoint - returns posts within `range` km of `lat`/`lon`
pub async fn search_posts(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Post>>, PostError> {
    info!("Received one request for search");
    let Query(params) = query.map_err(|e| PostError::InvalidQuery(e.body_text()))?;
    let posts = state.proximity.search(&params).await?;
    Ok(Json(posts))
}
