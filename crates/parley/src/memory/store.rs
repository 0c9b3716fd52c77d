//! Bounded per-conversation context store.
//!
//! One [`ContextStore`] lives for the process lifetime, constructed at the
//! composition root and shared behind `Arc<Mutex<_>>`. It is keyed by
//! (identity, mode): the same person talking in two different modes holds
//! two independent entries, and two people in the same mode never touch each
//! other's context.
//!
//! Every entry is bounded twice over — at most `max_turns` turns, at most
//! `max_summary_chars` of derived summary — so per-entry memory and
//! prompt-injection cost stay flat no matter how long a conversation runs.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::Turn;
use crate::memory::summary::build_summary;

/// Tuning knobs for the context store.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum turns kept per entry; the oldest are dropped first.
    pub max_turns: usize,
    /// Number of most-recent turns returned by [`ContextStore::get_context`].
    pub context_window: usize,
    /// Number of most-recent turns folded into the derived summary.
    pub summary_window: usize,
    /// Character cap on the derived summary block.
    pub max_summary_chars: usize,
    /// Idle duration after which an entry is eligible for sweeping.
    pub staleness: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_turns: 20,
            context_window: 10,
            summary_window: 5,
            max_summary_chars: 8000,
            staleness: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Composite map key: opaque identity plus conversation mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ContextKey {
    identity: String,
    mode: String,
}

impl ContextKey {
    fn new(identity: &str, mode: &str) -> Self {
        Self {
            identity: identity.to_string(),
            mode: mode.to_string(),
        }
    }
}

/// One conversation's bounded turn history plus derived summary.
#[derive(Debug)]
struct ContextEntry {
    turns: Vec<Turn>,
    summary: String,
    last_updated: Instant,
}

/// Read-only diagnostic snapshot of the store.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MemoryStats {
    pub entry_count: usize,
    pub total_turns: usize,
    /// Rounded to the nearest whole turn; 0 when the store is empty.
    pub avg_turns_per_entry: usize,
}

/// In-process conversation context cache, keyed by (identity, mode).
///
/// All operations are synchronous and in-memory; none suspends or performs
/// I/O. The store is mutated only through [`append`](Self::append) and
/// [`clear`](Self::clear), read through [`get_context`](Self::get_context)
/// and [`context_summary`](Self::context_summary), and swept through
/// [`sweep`](Self::sweep).
#[derive(Debug)]
pub struct ContextStore {
    entries: HashMap<ContextKey, ContextEntry>,
    config: MemoryConfig,
}

impl ContextStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// Append a turn to the (identity, mode) entry, creating it on first use.
    ///
    /// Drops the oldest turns until the `max_turns` bound holds, then
    /// recomputes the summary from the trailing `summary_window` turns, so
    /// the summary is never stale after an append.
    pub fn append(&mut self, identity: &str, mode: &str, turn: Turn) {
        let entry = self
            .entries
            .entry(ContextKey::new(identity, mode))
            .or_insert_with(|| ContextEntry {
                turns: Vec::new(),
                summary: String::new(),
                last_updated: Instant::now(),
            });

        entry.turns.push(turn);
        if entry.turns.len() > self.config.max_turns {
            let excess = entry.turns.len() - self.config.max_turns;
            entry.turns.drain(..excess);
        }
        entry.summary = build_summary(
            &entry.turns,
            self.config.summary_window,
            self.config.max_summary_chars,
        );
        entry.last_updated = Instant::now();
    }

    /// The most recent `context_window` turns for (identity, mode), oldest
    /// first. Empty when no entry exists.
    pub fn get_context(&self, identity: &str, mode: &str) -> &[Turn] {
        match self.entries.get(&ContextKey::new(identity, mode)) {
            Some(entry) => {
                let start = entry.turns.len().saturating_sub(self.config.context_window);
                &entry.turns[start..]
            }
            None => &[],
        }
    }

    /// The current derived summary for (identity, mode), or `""` when no
    /// entry exists. This is the block the prompt assembler injects.
    pub fn context_summary(&self, identity: &str, mode: &str) -> &str {
        self.entries
            .get(&ContextKey::new(identity, mode))
            .map(|e| e.summary.as_str())
            .unwrap_or("")
    }

    /// Delete the (identity, mode) entry if present. Idempotent.
    pub fn clear(&mut self, identity: &str, mode: &str) {
        self.entries.remove(&ContextKey::new(identity, mode));
    }

    /// Remove entries idle longer than the staleness threshold, judged
    /// against the supplied `now`. Returns the number removed.
    ///
    /// Pure in store state and `now`: scheduling is the sweeper's job, not
    /// this method's.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let staleness = self.config.staleness;
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_updated) <= staleness);
        before - self.entries.len()
    }

    /// Diagnostic snapshot: entry count, total turns, rounded average.
    pub fn stats(&self) -> MemoryStats {
        let entry_count = self.entries.len();
        let total_turns: usize = self.entries.values().map(|e| e.turns.len()).sum();
        let avg_turns_per_entry = if entry_count == 0 {
            0
        } else {
            ((total_turns as f64 / entry_count as f64).round()) as usize
        };
        MemoryStats {
            entry_count,
            total_turns,
            avg_turns_per_entry,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}
