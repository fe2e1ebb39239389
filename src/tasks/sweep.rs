//! Expiration Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::TtlCache;

// == Sweep Handle ==
/// Owner side of a running sweep task.
///
/// Stopping consumes the handle, so the stop signal can only be sent once.
#[derive(Debug)]
pub struct SweepHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the task to cancel its timer and exit.
    pub fn stop(self) {
        // The receiver is gone when the task already exited on its own.
        let _ = self.stop.send(true);
    }

    /// Signals the task and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a task that calls [`TtlCache::delete_expired`] every `interval`.
///
/// The task holds only a weak reference, so it also exits once the cache has
/// been dropped. It stops on the first tick after a stop signal or when the
/// [`SweepHandle`] is dropped.
///
/// # Panics
/// Panics if `interval` is zero or if called outside a tokio runtime.
pub fn spawn_sweep_task<V>(cache: Weak<TtlCache<V>>, interval: Duration) -> SweepHandle
where
    V: Clone + Send + Sync + 'static,
{
    let (stop, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {:?}",
            interval
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(cache) = cache.upgrade() else {
                        debug!("Cache dropped, sweep task exiting");
                        break;
                    };

                    let removed = cache.delete_expired();
                    if removed > 0 {
                        info!("Cache sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Cache sweep: no expired entries found");
                    }
                }
                _ = stopped.changed() => {
                    debug!("Cache sweep task received stop signal");
                    break;
                }
            }
        }
    });

    SweepHandle { stop, task }
}
