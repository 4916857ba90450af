// Server module - HTTP server setup and routing
pub mod handlers;
pub mod multipart;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::AppError;
pub use self::state::AppState;

/// CORS layer allowing browser clients from any origin.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/post", post(handlers::create_post))
        .route("/search", get(handlers::search_posts))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Server listening on {}", addr);
    info!("- Post endpoint: http://{}/post", addr);
    info!("- Search endpoint: http://{}/search", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
