//! Ticker for scheduling repeated callbacks with cancellation support.
//!
//! Runs a closure after an initial delay and then on regular intervals.
//! Supports immediate cancellation and an awaited drain with a bounded wait,
//! which is how instance retirement guarantees no tick fires against a
//! detached window.

use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Maximum time retirement waits for ticker tasks to acknowledge cancellation.
pub const STOP_WAIT_TIMEOUT_MS: u64 = 50;

struct TickerEntry {
    token: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

/// Minimal ticker core: schedules a closure after an initial delay and then on
/// each interval tick. Starting an id that is already active replaces it.
#[derive(Clone, Default)]
pub struct Ticker {
    entries: Arc<Mutex<HashMap<&'static str, TickerEntry>>>,
}

impl Ticker {
    /// Create an empty ticker registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a ticker is active for the given id.
    #[cfg(test)]
    pub fn is_active(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Start or replace a ticker for `id` with given timings and on_tick closure.
    pub fn start<F>(&self, id: &'static str, initial: Duration, interval: Duration, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        // Replace any existing ticker for this id.
        self.stop(id);

        let token = CancellationToken::new();
        let cancel = token.clone();

        let fut = async move {
            trace!(
                "ticker_start" = %id,
                init_ms = initial.as_millis(),
                int_ms = interval.as_millis()
            );

            tokio::select! {
                _ = time::sleep(initial) => {}
                _ = cancel.cancelled() => {
                    trace!("ticker_cancelled_initial" = %id);
                    return;
                }
            }

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        trace!("ticker_cancelled" = %id);
                        return;
                    }
                    _ = ticker.tick() => {
                        on_tick();
                    }
                }
            }
        };

        let handle = tokio::spawn(fut);
        self.entries.lock().insert(id, TickerEntry { token, handle });
    }

    /// Stop a ticker if present (non-blocking).
    pub fn stop(&self, id: &str) {
        if let Some(entry) = self.entries.lock().remove(id) {
            entry.token.cancel();
            // Don't abort the handle, let it cancel gracefully via the token.
            trace!("ticker_stop" = %id);
        }
    }

    /// Cancel all tickers and await their completion with a bounded wait.
    ///
    /// Returns `true` if every task confirmed completion before the timeout.
    pub async fn clear_wait(&self, timeout: Duration) -> bool {
        let entries: Vec<TickerEntry> = {
            let mut map = self.entries.lock();
            map.drain().map(|(_, e)| e).collect()
        };

        // Cancel all tokens first so the tasks wind down in parallel.
        for e in &entries {
            e.token.cancel();
        }

        let mut all_done = true;
        for e in entries {
            if time::timeout(timeout, e.handle).await.is_err() {
                all_done = false;
            }
        }
        trace!(all_done, "ticker_clear_wait");
        all_done
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn start_replaces_existing_id() {
        let ticker = Ticker::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let f = first.clone();
        ticker.start("t", Duration::from_millis(1), Duration::from_millis(5), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = second.clone();
        ticker.start("t", Duration::from_millis(1), Duration::from_millis(5), move || {
            s.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(40)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0, "replaced ticker must not fire");
        assert!(second.load(Ordering::SeqCst) > 0);
        assert!(ticker.is_active("t"));
        ticker.stop("t");
        assert!(!ticker.is_active("t"));
    }

    #[tokio::test]
    async fn clear_wait_confirms_completion() {
        let ticker = Ticker::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let t = ticks.clone();
        ticker.start("a", Duration::from_millis(1), Duration::from_millis(2), move || {
            t.fetch_add(1, Ordering::SeqCst);
        });
        time::sleep(Duration::from_millis(10)).await;

        assert!(ticker.clear_wait(Duration::from_millis(STOP_WAIT_TIMEOUT_MS)).await);
        let after = ticks.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after, "no tick after drain");
    }
}
