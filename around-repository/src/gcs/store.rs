//! Cloud Storage media store.

use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::TokenProvider;
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::MediaStoreError;
use crate::interfaces::MediaStore;
use crate::types::MediaAttachment;

/// Public Cloud Storage endpoint.
pub const DEFAULT_GCS_BASE_URL: &str = "https://storage.googleapis.com";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Object ACL changes need full control.
const GCS_SCOPES: &[&str] = &["https://www.googleapis.com/auth/devstorage.full_control"];

/// How requests to Cloud Storage are authorized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GcsCredentials {
    /// Application Default Credentials; tokens are refreshed before they expire.
    #[default]
    ApplicationDefault,
    /// Fixed bearer token, for emulators and tests.
    StaticToken(String),
    /// No `Authorization` header at all.
    Anonymous,
}

/// Connection settings for [`GcsMediaStore`].
#[derive(Debug, Clone)]
pub struct GcsConfig {
    /// API root, e.g. `https://storage.googleapis.com`.
    pub base_url: String,
    /// Bucket that receives post media.
    pub bucket: String,
    pub credentials: GcsCredentials,
}

impl GcsConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GCS_BASE_URL.to_string(),
            bucket: bucket.into(),
            credentials: GcsCredentials::ApplicationDefault,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = GcsCredentials::StaticToken(token.into());
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.credentials = GcsCredentials::Anonymous;
        self
    }
}

enum Authorizer {
    /// Provider is discovered on first use.
    ApplicationDefault(OnceCell<Arc<dyn TokenProvider>>),
    Static(String),
    Anonymous,
}

impl From<GcsCredentials> for Authorizer {
    fn from(credentials: GcsCredentials) -> Self {
        match credentials {
            GcsCredentials::ApplicationDefault => Self::ApplicationDefault(OnceCell::new()),
            GcsCredentials::StaticToken(token) => Self::Static(token),
            GcsCredentials::Anonymous => Self::Anonymous,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ObjectResource {
    #[serde(rename = "mediaLink")]
    media_link: Option<String>,
}

/// Media store backed by a Cloud Storage bucket.
///
/// An upload runs four requests in order: bucket check, media upload,
/// public-read ACL grant, and metadata read-back for the `mediaLink`.
///
/// # Example
///
/// ```ignore
/// use around_repository::{GcsConfig, GcsMediaStore, MediaAttachment, MediaStore};
///
/// let store = GcsMediaStore::new(GcsConfig::new("post-images"))?;
/// let url = store
///     .upload("3f1c…", MediaAttachment::new(bytes).with_content_type("image/png"))
///     .await?;
/// ```
pub struct GcsMediaStore {
    client: ReqwestClient,
    base_url: Url,
    bucket: String,
    auth: Authorizer,
}

impl GcsMediaStore {
    pub fn new(config: GcsConfig) -> Result<Self, MediaStoreError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MediaStoreError::config(format!("Invalid GCS base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(MediaStoreError::config(format!(
                "GCS base URL cannot be a base: {}",
                config.base_url
            )));
        }
        if config.bucket.is_empty() {
            return Err(MediaStoreError::config("GCS bucket name is required"));
        }

        info!(
            base_url = %base_url,
            bucket = %config.bucket,
            credentials = ?CredentialKind::of(&config.credentials),
            "Created GCS media store"
        );

        Ok(Self {
            client: ReqwestClient::new(),
            base_url,
            bucket: config.bucket,
            auth: config.credentials.into(),
        })
    }

    /// Append percent-encoded path segments to the API root.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MediaStoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MediaStoreError::config("GCS base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn bucket_url(&self) -> Result<Url, MediaStoreError> {
        self.endpoint(&["storage", "v1", "b", &self.bucket])
    }

    fn object_url(&self, key: &str) -> Result<Url, MediaStoreError> {
        self.endpoint(&["storage", "v1", "b", &self.bucket, "o", key])
    }

    fn acl_url(&self, key: &str) -> Result<Url, MediaStoreError> {
        self.endpoint(&["storage", "v1", "b", &self.bucket, "o", key, "acl"])
    }

    fn upload_url(&self, key: &str) -> Result<Url, MediaStoreError> {
        let mut url = self.endpoint(&["upload", "storage", "v1", "b", &self.bucket, "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", key);
        Ok(url)
    }

    /// Attach a bearer token. Credential failures make the store unavailable.
    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, MediaStoreError> {
        match &self.auth {
            Authorizer::Anonymous => Ok(request),
            Authorizer::Static(token) => Ok(request.bearer_auth(token)),
            Authorizer::ApplicationDefault(provider) => {
                let provider = provider
                    .get_or_try_init(gcp_auth::provider)
                    .await
                    .map_err(|e| {
                        MediaStoreError::unavailable(format!("No Google Cloud credentials: {}", e))
                    })?;
                let token = provider.token(GCS_SCOPES).await.map_err(|e| {
                    MediaStoreError::unavailable(format!("Failed to obtain access token: {}", e))
                })?;
                Ok(request.bearer_auth(token.as_str()))
            }
        }
    }

    async fn check_bucket(&self) -> Result<(), MediaStoreError> {
        let response = self
            .authorize(self.client.get(self.bucket_url()?))
            .await?
            .send()
            .await
            .map_err(|e| MediaStoreError::unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, bucket = %self.bucket, body = %body, "Bucket check failed");
            return Err(MediaStoreError::unavailable(format!(
                "Bucket {} is not accessible (status {})",
                self.bucket, status
            )));
        }
        Ok(())
    }

    async fn write_object(
        &self,
        key: &str,
        attachment: MediaAttachment,
    ) -> Result<(), MediaStoreError> {
        let content_type = attachment
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let response = self
            .authorize(self.client.post(self.upload_url(key)?))
            .await?
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(attachment.data)
            .send()
            .await
            .map_err(|e| MediaStoreError::upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, key = %key, body = %body, "Object upload failed");
            return Err(MediaStoreError::upload(format!(
                "Upload of {} failed with status {}",
                key, status
            )));
        }
        Ok(())
    }

    async fn grant_public_read(&self, key: &str) -> Result<(), MediaStoreError> {
        let response = self
            .authorize(self.client.post(self.acl_url(key)?))
            .await?
            .json(&json!({ "entity": "allUsers", "role": "READER" }))
            .send()
            .await
            .map_err(|e| MediaStoreError::upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, key = %key, body = %body, "Setting public ACL failed");
            return Err(MediaStoreError::upload(format!(
                "Setting public ACL on {} failed with status {}",
                key, status
            )));
        }
        Ok(())
    }

    async fn read_media_link(&self, key: &str) -> Result<String, MediaStoreError> {
        let response = self
            .authorize(self.client.get(self.object_url(key)?))
            .await?
            .send()
            .await
            .map_err(|e| MediaStoreError::upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaStoreError::upload(format!(
                "Reading attributes of {} failed with status {}",
                key, status
            )));
        }

        let object: ObjectResource = response
            .json()
            .await
            .map_err(|e| MediaStoreError::upload(format!("Malformed object resource: {}", e)))?;

        object
            .media_link
            .filter(|link| !link.is_empty())
            .ok_or_else(|| MediaStoreError::upload(format!("Object {} has no mediaLink", key)))
    }
}

#[async_trait]
impl MediaStore for GcsMediaStore {
    async fn upload(
        &self,
        key: &str,
        attachment: MediaAttachment,
    ) -> Result<String, MediaStoreError> {
        let size = attachment.len();

        self.check_bucket().await?;
        self.write_object(key, attachment).await?;
        self.grant_public_read(key).await?;
        let media_link = self.read_media_link(key).await?;

        info!(key = %key, bytes = size, media_link = %media_link, "Media saved to GCS");
        Ok(media_link)
    }

    async fn delete(&self, key: &str) -> Result<(), MediaStoreError> {
        let response = self
            .authorize(self.client.delete(self.object_url(key)?))
            .await?
            .send()
            .await
            .map_err(|e| MediaStoreError::delete(e.to_string()))?;

        let status = response.status();

        // 404 is acceptable - the object may never have been written
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, key = %key, body = %body, "Object delete failed");
            return Err(MediaStoreError::delete(format!(
                "Delete of {} failed with status {}",
                key, status
            )));
        }

        debug!(key = %key, "Media object deleted");
        Ok(())
    }
}

/// Credential kind without the secret, for logs.
#[derive(Debug)]
enum CredentialKind {
    ApplicationDefault,
    StaticToken,
    Anonymous,
}

impl CredentialKind {
    fn of(credentials: &GcsCredentials) -> Self {
        match credentials {
            GcsCredentials::ApplicationDefault => Self::ApplicationDefault,
            GcsCredentials::StaticToken(_) => Self::StaticToken,
            GcsCredentials::Anonymous => Self::Anonymous,
        }
    }
}
