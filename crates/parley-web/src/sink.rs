//! Durable-persistence boundary.
//!
//! The context store is a volatile cache; every turn it sees is expected to
//! be written to durable history as well. [`TurnSink`] is that seam: the
//! chat handler hands it each turn right after appending to the store, and
//! whatever database layer the deployment uses implements it.

use parley::Turn;
use tracing::debug;

/// Receiver for turns bound for durable storage.
///
/// Implementations must not block the request path on slow storage — queue
/// internally if the backing store is slow.
pub trait TurnSink: Send + Sync {
    fn record(&self, identity: &str, mode: &str, turn: &Turn);
}

/// Default sink: logs the turn and drops it. Stands in where no database is
/// wired up (tests, local development).
pub struct LogSink;

impl TurnSink for LogSink {
    fn record(&self, identity: &str, mode: &str, turn: &Turn) {
        debug!(
            "Turn recorded: identity={identity}, mode={mode}, role={}, {} chars",
            turn.role,
            turn.content.chars().count()
        );
    }
}
