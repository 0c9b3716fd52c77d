//! Axum server setup and router construction.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};

/// Build the full axum router.
pub fn build_router(app_state: AppState) -> Router {
    // CORS layer for development (frontend dev server on a different port).
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(api::post_chat))
        .route("/api/context/clear", post(api::post_clear))
        .route("/api/context/{mode}", get(api::get_context))
        .route("/api/stats", get(api::get_stats))
        .with_state(app_state)
        .layer(cors)
}

/// Start the axum server on a Tokio task and return the bound address.
///
/// Binding to port 0 picks a random free port — integration tests rely on
/// this.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> Result<SocketAddr, String> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| format!("failed to bind {bind_addr}: {e}"))?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("failed to read bound address: {e}"))?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Server error: {e}");
        }
    });

    Ok(addr)
}
