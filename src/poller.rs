//! Polling scheduler
//!
//! Fetches a fresh snapshot on a fixed interval and offers it to the
//! shared store. One fetch in flight at a time: the loop awaits the fetch
//! before taking the next tick, and missed ticks are skipped rather than
//! queued. A failed cycle is logged and surfaced as a soft toast; it never
//! stops subsequent cycles and never redirects. Teardown cancels the timer
//! exactly once via the shutdown channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::{ListsApi, View};
use crate::classify::{classify, Context};
use crate::notify::Notifier;
use crate::session::{PollOutcome, SharedStore};

/// Poll loop configuration
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between snapshot fetches
    pub interval_ms: u64,
    /// Which read endpoint to poll
    pub view: View,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            view: View::All,
        }
    }
}

/// Handle to a running poll task
pub struct PollScheduler {
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PollScheduler {
    /// Spawn the poll loop
    pub fn start(
        config: PollConfig,
        api: Arc<dyn ListsApi>,
        store: SharedStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        info!(
            interval_ms = config.interval_ms,
            view = ?config.view,
            "starting poll scheduler"
        );
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let handle = tokio::spawn(run_poll_loop(config, api, store, notifier, shutdown_rx));
        Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Stop the loop; safe to call more than once
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

async fn run_poll_loop(
    config: PollConfig,
    api: Arc<dyn ListsApi>,
    store: SharedStore,
    notifier: Arc<dyn Notifier>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut interval = tokio::time::interval(Duration::from_millis(config.interval_ms));
    // the fetch is awaited inside the loop body; skipping missed ticks is
    // what keeps two fetches from ever overlapping
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // the constructor's interval fires immediately; the session already
    // loaded the initial snapshot, so swallow the first tick
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("poll scheduler stopped");
                return;
            }
            _ = interval.tick() => {
                let observed = store.version().await;
                let started = Utc::now();
                match api.fetch_snapshot(config.view).await {
                    Ok(payload) => {
                        let snapshot = payload.into_snapshot();
                        let outcome = store.apply_poll(observed, snapshot).await;
                        debug!(
                            outcome = ?outcome,
                            elapsed_ms = (Utc::now() - started).num_milliseconds(),
                            "poll cycle complete"
                        );
                        if outcome == PollOutcome::Stale {
                            debug!("poll lost to a concurrent mutation; next cycle reconciles");
                        }
                    }
                    Err(err) => {
                        let classified = classify(&err, &Context::polling());
                        warn!(error = %err, kind = ?classified.kind, "poll cycle failed");
                        // stale data is the only consequence; toast, no redirect
                        notifier.toast(&classified.message);
                    }
                }
            }
        }
    }
}
