// Multipart form decoding for post submissions
use around_repository::MediaAttachment;
use axum::extract::{multipart::MultipartError, Multipart};
use tracing::debug;

use crate::errors::PostError;
use crate::ingest::PostSubmission;

/// Form field holding the attached media file.
pub const IMAGE_FIELD: &str = "image";

fn bad_request(err: MultipartError) -> PostError {
    PostError::BadRequest(format!("Malformed multipart body: {}", err))
}

/// Read `message`, `lat`, `lon` and the optional `image` file from a form.
///
/// Unknown fields are ignored. An `image` part with no content counts as no
/// attachment.
pub async fn read_submission(mut multipart: Multipart) -> Result<PostSubmission, PostError> {
    let mut submission = PostSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" => submission.message = field.text().await.map_err(bad_request)?,
            "lat" => submission.lat = field.text().await.map_err(bad_request)?,
            "lon" => submission.lon = field.text().await.map_err(bad_request)?,
            IMAGE_FIELD => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(bad_request)?;
                if data.is_empty() {
                    continue;
                }
                submission.attachment = Some(MediaAttachment { content_type, data });
            }
            other => debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(submission)
}
