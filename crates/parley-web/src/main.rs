//! Parley chat relay server.
//!
//! Boots the full backend: the conversation memory cache, the hourly
//! retention sweeper, and the REST relay surface.
//!
//! # Usage
//!
//! ```bash
//! PARLEY_API_KEY=sk-... cargo run -p parley-web
//! PARLEY_API_KEY=sk-... cargo run -p parley-web -- --port 8080
//! cargo run -p parley-web -- --upstream-url http://localhost:9000/v1/chat/completions
//! ```
//!
//! Then send messages over REST (`POST /api/chat`):
//! ```json
//! {"message": "What is creatine monohydrate?", "mode": "search"}
//! ```
//!
//! Callers identify themselves with an `x-identity` header; requests without
//! one share the `anonymous` conversation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use parley::memory::{ContextStore, spawn_sweeper};
use parley::upstream::{DEFAULT_UPSTREAM_URL, UpstreamClient};
use parley_web::{AppState, LogSink, WebConfig, spawn_web};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Chat relay server with per-caller conversation memory.
#[derive(Parser)]
#[command(about = "Chat relay server with per-caller conversation memory")]
struct Args {
    /// Port for the relay server.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Upstream chat-completion endpoint.
    #[arg(long, default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    /// Seconds between retention sweeps over the context cache.
    #[arg(long, default_value_t = 3600)]
    sweep_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1. Upstream client. The key is optional: a local stub upstream needs none.
    let api_key = std::env::var("PARLEY_API_KEY").ok();
    let upstream = UpstreamClient::with_url(&args.upstream_url, api_key)?;

    // 2. Shared context cache and its retention sweeper.
    let store = Arc::new(Mutex::new(ContextStore::default()));
    let sweeper = spawn_sweeper(store.clone(), Duration::from_secs(args.sweep_secs));

    // 3. Spawn the relay server.
    let state = AppState {
        store,
        upstream: Arc::new(upstream),
        sink: Arc::new(LogSink),
    };
    let web_config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
    };
    let addr = spawn_web(state, web_config).await?;
    println!("Relay listening on http://{addr}");
    println!("POST /api/chat to talk. Ctrl-C to stop.\n");

    // 4. Run until interrupted, then stop the sweeper cleanly.
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for ctrl-c: {e}"))?;
    sweeper.stop().await;

    Ok(())
}
