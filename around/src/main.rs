//! Around Main Entry Point
//!
//! Starts the geo-tagged post service: connects to OpenSearch and Cloud
//! Storage, then serves the post and search endpoints.

use around::server::{create_app, run_server};
use around::{AppError, Dependencies, Settings};
use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("around=info,around_repository=info,tower_http=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "around",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "around",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting around service");

    let settings = Settings::from_env()?;

    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = create_app(deps.state, settings.max_upload_bytes);

    match run_server(app, settings.server_addr).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(error = %e, "Server failed");
            Err(e)
        }
    }
}
