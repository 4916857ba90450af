//! Dependency initialization and wiring for the around service.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use around_repository::{
    GcsMediaStore, IndexConfig, MediaService, MediaServiceConfig, OpenSearchProvider,
    SearchIndexService, SearchIndexServiceConfig,
};

use crate::config::settings::{ConnectionMode, Settings};
use crate::identity::{PlaceholderUser, UuidIssuer};
use crate::ingest::IngestionPipeline;
use crate::proximity::ProximityQueryPipeline;
use crate::server::AppState;
use crate::AppError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared handler state holding both pipelines.
    pub state: AppState,
}

impl Dependencies {
    /// Connect to the external stores and wire the pipelines.
    ///
    /// Ensures the post index exists before returning; the service must not
    /// accept posts without its geo-point mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If initialization fails (connection failures only in fail-fast mode)
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            index = %settings.index.index,
            gcs_bucket = %settings.gcs.bucket,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            request_timeout_secs = settings.request_timeout.as_secs(),
            "Initializing dependencies"
        );

        // Initialize OpenSearch provider with retry logic
        let search_provider = Self::connect_to_opensearch(
            &settings.opensearch_url,
            settings.index.clone(),
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        let search = SearchIndexService::with_config(
            Arc::new(search_provider),
            SearchIndexServiceConfig::with_timeout(settings.request_timeout),
        );

        // Exits if the index cannot be created with its mapping
        search
            .ensure_index_exists()
            .await
            .map_err(|e| AppError::config(format!("Failed to ensure index exists: {}", e)))?;

        let media_store = GcsMediaStore::new(settings.gcs.clone())
            .map_err(|e| AppError::config(format!("Failed to create GCS media store: {}", e)))?;
        let media = MediaService::with_config(
            Arc::new(media_store),
            MediaServiceConfig::with_timeout(settings.request_timeout),
        );

        let ingestion = IngestionPipeline::new(
            search.clone(),
            media,
            Arc::new(UuidIssuer),
            Arc::new(PlaceholderUser::new(settings.placeholder_author.clone())),
        );
        let proximity = ProximityQueryPipeline::new(search);

        Ok(Self {
            state: AppState::new(ingestion, proximity),
        })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        index_config: IndexConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, AppError> {
        loop {
            match Self::try_connect_opensearch(url, index_config.clone()).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(AppError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Build the provider and confirm the cluster answers.
    async fn try_connect_opensearch(
        url: &str,
        index_config: IndexConfig,
    ) -> Result<OpenSearchProvider, AppError> {
        let provider = OpenSearchProvider::new(url, index_config)
            .await
            .map_err(|e| AppError::config(format!("Failed to create OpenSearch provider: {}", e)))?;

        provider
            .ping()
            .await
            .map_err(|e| AppError::config(format!("OpenSearch is not reachable: {}", e)))?;

        Ok(provider)
    }
}
