// App state for the Axum server
use std::sync::Arc;

use crate::ingest::IngestionPipeline;
use crate::proximity::ProximityQueryPipeline;

#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionPipeline>,
    pub proximity: Arc<ProximityQueryPipeline>,
}

impl AppState {
    pub fn new(ingestion: IngestionPipeline, proximity: ProximityQueryPipeline) -> Self {
        Self {
            ingestion: Arc::new(ingestion),
            proximity: Arc::new(proximity),
        }
    }
}
