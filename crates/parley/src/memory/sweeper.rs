//! Background retention sweeping.
//!
//! [`spawn_sweeper`] runs [`ContextStore::sweep`] on a fixed period from a
//! dedicated tokio task. The task is owned through a [`SweeperHandle`]
//! registered at startup and stopped at shutdown — never a fire-and-forget
//! timer that outlives the process handle in tests.
//!
//! A failed cycle (a poisoned store lock) is logged and the schedule
//! continues; a sweep failure must never reach request handlers or stop
//! future ticks.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::memory::store::ContextStore;

/// Default sweep period: hourly.
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Handle to a running sweeper task. Dropping it without calling
/// [`stop`](Self::stop) aborts nothing — stop it explicitly at teardown.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the task to exit and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Spawn the periodic sweep task over a shared store.
///
/// The store lock is held only for the duration of a single
/// [`ContextStore::sweep`] call per tick; the task never suspends while
/// holding it.
pub fn spawn_sweeper(store: Arc<Mutex<ContextStore>>, period: Duration) -> SweeperHandle {
    let (shutdown, mut rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it so the first real
        // sweep happens one full period after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => sweep_once(&store),
                _ = rx.changed() => {
                    debug!("Retention sweeper stopping");
                    break;
                }
            }
        }
    });

    SweeperHandle { shutdown, task }
}

/// One sweep cycle. Lock failures are logged, never propagated.
fn sweep_once(store: &Arc<Mutex<ContextStore>>) {
    match store.lock() {
        Ok(mut store) => {
            let removed = store.sweep(Instant::now());
            if removed > 0 {
                debug!("Retention sweep evicted {removed} stale context entries");
            }
        }
        Err(e) => warn!("Retention sweep skipped: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Turn;
    use crate::memory::store::MemoryConfig;

    #[tokio::test]
    async fn sweeper_evicts_stale_entries_on_schedule() {
        let store = Arc::new(Mutex::new(ContextStore::new(MemoryConfig {
            staleness: Duration::from_millis(1),
            ..MemoryConfig::default()
        })));
        store
            .lock()
            .unwrap()
            .append("u", "general", Turn::user("hi"));

        let handle = spawn_sweeper(store.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.stop().await;

        assert!(store.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sweeper_leaves_fresh_entries_alone() {
        let store = Arc::new(Mutex::new(ContextStore::default()));
        store
            .lock()
            .unwrap()
            .append("u", "general", Turn::user("hi"));

        let handle = spawn_sweeper(store.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.stop().await;

        assert_eq!(store.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stop_terminates_task_before_first_tick() {
        let store = Arc::new(Mutex::new(ContextStore::default()));
        let handle = spawn_sweeper(store, DEFAULT_SWEEP_PERIOD);
        // Must return promptly even though the period is an hour.
        handle.stop().await;
    }

    #[tokio::test]
    async fn appends_proceed_while_sweeper_runs() {
        let store = Arc::new(Mutex::new(ContextStore::default()));
        let handle = spawn_sweeper(store.clone(), Duration::from_millis(5));

        for i in 0..20 {
            store
                .lock()
                .unwrap()
                .append("u", "coding", Turn::user(format!("m{i}")));
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        handle.stop().await;

        assert_eq!(store.lock().unwrap().get_context("u", "coding").len(), 10);
    }
}
