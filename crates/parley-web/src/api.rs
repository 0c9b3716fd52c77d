//! REST API endpoint handlers.
//!
//! Each handler stays thin: validate input, read the context cache, relay upstream,
//! write back to the cache and the persistence sink. All conversation-memory
//! policy lives in `parley::memory`; all the handlers add is HTTP.

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use parley::memory::{ContextStore, MemoryStats};
use parley::upstream::UpstreamClient;
use parley::{Turn, branding, modes, prompt};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sink::TurnSink;

/// Shared application state passed to all handlers via axum's `State`
/// extractor. The store mutex is held only for single cache operations,
/// never across the upstream call.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ContextStore>>,
    pub upstream: Arc<UpstreamClient>,
    pub sink: Arc<dyn TurnSink>,
}

/// The caller's opaque identity, from the `x-identity` header. The relay
/// never inspects its structure; absent means `"anonymous"`.
fn identity_from(headers: &HeaderMap) -> String {
    headers
        .get("x-identity")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string()
}

// ── POST /api/chat ─────────────────────────────────────────────────

/// Request body for POST /api/chat.
#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
    /// `"auto"` defers to the mode's default model.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Auxiliary text supplied by the retrieval collaborator, if any.
    #[serde(default)]
    pub retrieved: String,
}

fn default_model() -> String {
    modes::AUTO_MODEL.to_string()
}

fn default_mode() -> String {
    modes::GENERAL_MODE.to_string()
}

/// Successful chat response.
#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub model: String,
}

/// Error body matching the relay's public error shape.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// POST /api/chat — relay one user message.
///
/// Reads the caller's context summary, assembles the outbound prompt under
/// the mode's budget, relays upstream, brands the reply, and remembers both
/// turns — in the cache and through the persistence sink.
pub async fn post_chat(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorBody>)> {
    if body.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "empty message".into(),
                message: "Please provide a message.".into(),
            }),
        ));
    }

    let identity = identity_from(&headers);
    let spec = modes::mode_spec(&body.mode);
    let model = modes::resolve_model(&body.model, spec);

    // Snapshot the context block; the lock must not span the upstream call.
    let context_block = {
        let store = app.store.lock().unwrap();
        store.context_summary(&identity, spec.name).to_string()
    };

    let outbound = prompt::assemble(
        spec.instructions,
        &context_block,
        &body.retrieved,
        &body.message,
        spec.depth.max_prompt_chars(),
    );

    let reply = match app.upstream.chat(&outbound, model).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Chat relay failed: {e}");
            return Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    error: "upstream failure".into(),
                    message: "Sorry, I encountered an error. Please try again.".into(),
                }),
            ));
        }
    };

    let branded = branding::brand_reply(&reply.text);
    let user_turn = Turn::user(&body.message);
    let assistant_turn = Turn::assistant(&branded);

    {
        let mut store = app.store.lock().unwrap();
        store.append(&identity, spec.name, user_turn.clone());
        store.append(&identity, spec.name, assistant_turn.clone());
    }
    app.sink.record(&identity, spec.name, &user_turn);
    app.sink.record(&identity, spec.name, &assistant_turn);

    Ok(Json(ChatResponse {
        message: branded,
        model: reply.model,
    }))
}

// ── POST /api/context/clear ────────────────────────────────────────

/// Request body for POST /api/context/clear.
#[derive(Deserialize)]
pub struct ClearBody {
    #[serde(default = "default_mode")]
    pub mode: String,
}

/// POST /api/context/clear — forget the caller's context for a mode.
///
/// Idempotent: clearing a conversation that never existed is still 204.
pub async fn post_clear(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ClearBody>,
) -> StatusCode {
    let identity = identity_from(&headers);
    let spec = modes::mode_spec(&body.mode);
    app.store.lock().unwrap().clear(&identity, spec.name);
    StatusCode::NO_CONTENT
}

// ── GET /api/context/{mode} ────────────────────────────────────────

/// GET /api/context/{mode} — the caller's recent cached turns, oldest first.
///
/// Serves the cache only; full durable history lives behind the persistence
/// collaborator, not this endpoint.
pub async fn get_context(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(mode): Path<String>,
) -> Json<Vec<Turn>> {
    let identity = identity_from(&headers);
    let spec = modes::mode_spec(&mode);
    let store = app.store.lock().unwrap();
    Json(store.get_context(&identity, spec.name).to_vec())
}

// ── GET /api/stats ─────────────────────────────────────────────────

/// GET /api/stats — context-store diagnostic snapshot.
pub async fn get_stats(State(app): State<AppState>) -> Json<MemoryStats> {
    let stats = app.store.lock().unwrap().stats();
    Json(stats)
}
