//! Liveness endpoint for the hosting platform.
//!
//! Answers `GET /` and `GET /health` with `200 OK`. Runs alongside the
//! Discord gateway connection and stops on the broadcast shutdown signal.

use anyhow::Result;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Build the health router.
pub fn build_router() -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
}

async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Start the health server on `0.0.0.0:{port}`.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_health_server(port: u16, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Health server listening on http://{}", addr);

    axum::serve(listener, build_router())
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Health server shutting down...");
        })
        .await?;

    Ok(())
}
