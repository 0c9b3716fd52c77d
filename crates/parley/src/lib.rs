//! Conversation memory core and model-relay client for the Parley chat backend.
//!
//! `parley` is the library under the Parley chat relay: a service that takes a
//! user message, wraps it with mode instructions and recent conversation
//! context, forwards it to an external chat-completions proxy, brands the
//! reply, and remembers the exchange for the next turn.
//!
//! The heart of the crate is the [`memory`] module — a bounded, per
//! (identity, mode) in-process cache of conversation turns:
//!
//! - [`ContextStore`](memory::ContextStore) holds the turns and a derived
//!   summary per entry, trimming to the last `max_turns` on every append.
//! - [`build_summary`](memory::build_summary) renders the recent turns into a
//!   bounded text block suitable for prompt injection.
//! - [`spawn_sweeper`](memory::spawn_sweeper) runs a cancellable background
//!   task that expires entries idle past the staleness threshold.
//!
//! Around it sit the pieces a relay needs:
//!
//! - [`modes`] — the mode registry: per-mode instructions, default model,
//!   and prompt-budget depth, as a lookup table.
//! - [`prompt`] — [`assemble`](prompt::assemble) composes the outbound prompt
//!   from instructions, context, retrieved text, and the user input under a
//!   character budget.
//! - [`upstream`] — [`UpstreamClient`](upstream::UpstreamClient), the async
//!   HTTP client for the chat-completions proxy.
//! - [`branding`] — signature footer and model-name scrubbing applied to
//!   every relayed reply.
//!
//! # Volatility
//!
//! The store is deliberately in-memory only. A process restart silently
//! starts every conversation with empty context; durable history is the
//! caller's job, through whatever persistence layer sits behind the route
//! handlers. The store is a cache in front of that history, not a
//! replacement for it.
//!
//! # Concurrency
//!
//! [`ContextStore`](memory::ContextStore) is a plain synchronous struct. The
//! composition root owns it as `Arc<Mutex<ContextStore>>` and every access —
//! request handlers and the sweeper alike — locks it for the duration of a
//! single operation. No operation performs I/O or suspends while holding the
//! lock.

pub mod branding;
pub mod memory;
pub mod modes;
pub mod prompt;
pub mod upstream;

use serde::{Deserialize, Serialize};

// ── Turn ───────────────────────────────────────────────────────────

/// Who produced a turn.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::User => write!(f, "User"),
            TurnRole::Assistant => write!(f, "Assistant"),
        }
    }
}

/// One message in a conversation. Immutable once created: the store appends
/// turns and drops them, it never edits them.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    /// Unix epoch seconds at creation.
    pub created_at: u64,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            created_at: epoch_secs(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            created_at: epoch_secs(),
        }
    }
}

// ── Helper ─────────────────────────────────────────────────────────

/// Current unix epoch in seconds.
pub fn epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
