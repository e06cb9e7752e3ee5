//! Timeout sweeper.
//!
//! A sweep runs in three steps: stale entries are collected under the lock,
//! observers are notified with the lock released, and the collected entries
//! are removed under the lock again. An entry updated between the first and
//! last step is still removed.

use crate::cache::events::{CacheEvent, CacheEventKind, MissingValue};
use crate::cache::ValueCache;
use crate::core::identity::ValueIdentity;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Entry selected for eviction
#[derive(Debug)]
struct Expired {
    name: String,
    time: SystemTime,
    interval: Duration,
    mask: u64,
}

impl ValueCache {
    /// Evict every entry that has not been updated for
    /// `interval * timeout_multiplier`; returns the number removed.
    pub fn check_timeout(&self) -> usize {
        self.check_timeout_at(Instant::now())
    }

    /// Same as `check_timeout`, measured against `now`
    pub fn check_timeout_at(&self, now: Instant) -> usize {
        let multiplier = self.config.timeout_multiplier;

        let expired: Vec<Expired> = {
            let store = self.lock();
            store
                .iter()
                .filter(|(_, entry)| entry.is_expired(now, multiplier))
                .map(|(name, entry)| Expired {
                    name: name.clone(),
                    time: entry.last_time,
                    interval: entry.interval,
                    mask: entry.callbacks_mask,
                })
                .collect()
        };

        if expired.is_empty() {
            return 0;
        }

        for item in &expired {
            self.notify_expired(item);
        }

        let mut store = self.lock();
        let removed = expired
            .iter()
            .filter(|item| store.remove(&item.name).is_some())
            .count();
        debug!("Timeout sweep removed {} cache entries", removed);
        removed
    }

    fn notify_expired(&self, item: &Expired) {
        let identity = match ValueIdentity::parse(&item.name) {
            Ok(identity) => identity,
            Err(e) => {
                error!("Cannot notify about expired value {}: {}", item.name, e);
                return;
            }
        };

        let missing = MissingValue {
            name: item.name.clone(),
            identity,
            time: item.time,
            interval: item.interval,
        };
        for observer in self.observers() {
            observer.missing(&missing);
        }

        if item.mask != 0 {
            self.dispatch_event(&CacheEvent {
                kind: CacheEventKind::Expired,
                mask: item.mask,
                name: &item.name,
                identity: &missing.identity,
                time: item.time,
                interval: item.interval,
                values: &[],
            });
        }
    }
}

/// Handle to a running periodic sweeper
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Arc<AtomicBool>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Ask the sweeper to stop after its current sweep
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.wake.notify_one();
    }

    /// Stop the sweeper and wait for its task to finish
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            error!("Sweeper task failed: {}", e);
        }
    }
}

/// Run `check_timeout` every `sweep_interval` of the cache's config on the
/// current tokio runtime.
pub fn spawn_sweeper(cache: Arc<ValueCache>) -> SweeperHandle {
    let period = cache.config().sweep_interval;
    let shutdown = Arc::new(AtomicBool::new(false));
    let wake = Arc::new(Notify::new());

    let task = {
        let shutdown = Arc::clone(&shutdown);
        let wake = Arc::clone(&wake);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            while !shutdown.load(Ordering::Relaxed) {
                tokio::select! {
                    _ = interval.tick() => {
                        cache.check_timeout();
                    }
                    _ = wake.notified() => {}
                }
            }
            debug!("Sweeper stopped");
        })
    };

    SweeperHandle {
        shutdown,
        wake,
        task,
    }
}
