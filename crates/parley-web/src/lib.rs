//! HTTP chat relay server for the Parley backend.
//!
//! `parley-web` exposes the conversation core over a small REST surface:
//!
//! - `POST /api/chat` — relay a user message through mode instructions,
//!   cached context, and the upstream model proxy.
//! - `POST /api/context/clear` — forget the caller's context for a mode.
//! - `GET /api/context/{mode}` — the caller's recent cached turns.
//! - `GET /api/stats` — context-store diagnostics.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::{Arc, Mutex};
//! use parley::memory::ContextStore;
//! use parley::upstream::UpstreamClient;
//! use parley_web::{AppState, LogSink, WebConfig, spawn_web};
//!
//! let state = AppState {
//!     store: Arc::new(Mutex::new(ContextStore::default())),
//!     upstream: Arc::new(UpstreamClient::new(None)?),
//!     sink: Arc::new(LogSink),
//! };
//! let addr = spawn_web(state, WebConfig::default()).await?;
//! println!("Relay listening on http://{addr}");
//! ```
//!
//! The retention sweeper is the composition root's job, not the server's:
//! `main` spawns it next to the server and stops it on shutdown, so tests
//! that only need HTTP behavior never leak a timer.

mod api;
mod server;
pub mod sink;

pub use api::{AppState, ChatBody, ChatResponse, ClearBody, ErrorBody};
pub use server::build_router;
pub use sink::{LogSink, TurnSink};

use std::net::SocketAddr;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`. Port 0 picks a random
    /// free port (used by the integration tests).
    pub bind_addr: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        }
    }
}

/// Spawn the relay server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(state: AppState, config: WebConfig) -> Result<SocketAddr, String> {
    let router = server::build_router(state);
    server::start_server(router, config.bind_addr).await
}
