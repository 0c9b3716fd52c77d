//! Conversation memory: bounded per-(identity, mode) context with expiry.
//!
//! Three pieces, composed by the route handlers:
//!
//! 1. **[`store`]** — [`ContextStore`] maps an (identity, mode) key to a
//!    bounded list of recent turns plus a derived summary. FIFO trimming
//!    keeps every entry under `max_turns`; the summary is recomputed on
//!    every append so it is never stale.
//!
//! 2. **[`summary`]** — [`build_summary`] renders the most recent turns into
//!    a bounded text block for prompt injection. Pure and deterministic.
//!
//! 3. **[`sweeper`]** — [`spawn_sweeper`] runs [`ContextStore::sweep`] on a
//!    fixed interval, evicting entries idle past the staleness threshold.
//!    Cancellable via the returned [`SweeperHandle`].
//!
//! The store trades durability for simplicity and latency: context is a
//! soft, best-effort cache, and losing it (restart, sweep) only means the
//! assistant forgets prior turns in that mode — degraded, not broken.

pub mod store;
pub mod summary;
pub mod sweeper;

pub use store::{ContextStore, MemoryConfig, MemoryStats};
pub use summary::build_summary;
pub use sweeper::{SweeperHandle, spawn_sweeper};
