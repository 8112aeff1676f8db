// Relay HTTP server - Axum router with permissive CORS
// Serves the chat endpoint to browser front ends on any origin

pub mod routes;

use axum::Router;
use http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::RelayError;
use crate::relay::ChatRelay;

/// Shared state for request handlers
pub struct RelayServerState {
    pub relay: ChatRelay,
}

/// Build the application router (also used directly by tests)
pub fn app(relay: ChatRelay) -> Router {
    let state = Arc::new(RelayServerState { relay });

    // Preflight for POST /chat is answered here
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(HeaderValue::from_static("*"));

    routes::relay_routes().with_state(state).layer(cors)
}

/// Bind to the given port on all interfaces and serve until Ctrl-C
pub async fn serve(relay: ChatRelay, port: u16) -> Result<(), RelayError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!(addr = %actual_addr, "Relay server listening");

    axum::serve(listener, app(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections...");
}
