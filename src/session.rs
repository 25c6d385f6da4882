//! Shared store and session wiring
//!
//! The [`SharedStore`] is the single point where the two mutation paths
//! (user-optimistic and poll-confirmed) converge. It guards the snapshot
//! with a monotonic version counter: every local mutation bumps it, and a
//! poll result fetched against an older version is rejected instead of
//! overwriting fresher optimistic state. Snapshots are published to the
//! presentation layer over a `watch` channel; unchanged polls publish
//! nothing, so no needless downstream re-renders.

use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::api::{ApiConfig, HttpListsApi, ListsApi, View};
use crate::coordinator::MutationCoordinator;
use crate::config::Args;
use crate::notify::Notifier;
use crate::poller::{PollConfig, PollScheduler};
use crate::types::{Result, SyncError};
use listsync_core::{ListId, Selection, Snapshot};

/// Snapshot plus the bookkeeping the engine needs around it
#[derive(Debug, Default)]
pub struct StoreState {
    pub snapshot: Snapshot,
    /// Bumped on every local mutation and every applied poll
    pub version: u64,
    pub selection: Selection,
}

/// Outcome of offering a poll result to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Snapshot differed and was applied
    Applied,
    /// Structurally identical to current state; nothing published
    Unchanged,
    /// A mutation landed while the fetch was in flight; result discarded
    Stale,
}

/// Shared, versioned snapshot store
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<StoreState>>,
    publisher: watch::Sender<Snapshot>,
}

impl SharedStore {
    pub fn new(initial: Snapshot) -> Self {
        let (publisher, _) = watch::channel(initial.clone());
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                snapshot: initial,
                version: 0,
                selection: Selection::new(),
            })),
            publisher,
        }
    }

    /// Subscribe to snapshot updates (the presentation "read props")
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.snapshot.clone()
    }

    pub async fn version(&self) -> u64 {
        self.inner.read().await.version
    }

    /// Commit a locally computed snapshot (mutation path)
    pub async fn commit(&self, snapshot: Snapshot) {
        let mut state = self.inner.write().await;
        state.version += 1;
        state.snapshot = snapshot.clone();
        debug!(version = state.version, lists = snapshot.len(), "snapshot committed");
        drop(state);
        let _ = self.publisher.send(snapshot);
    }

    /// Offer a polled snapshot, guarded by the version observed pre-fetch
    pub async fn apply_poll(&self, observed_version: u64, snapshot: Snapshot) -> PollOutcome {
        let mut state = self.inner.write().await;
        if state.version != observed_version {
            debug!(
                observed = observed_version,
                current = state.version,
                "discarding stale poll snapshot"
            );
            return PollOutcome::Stale;
        }
        if state.snapshot == snapshot {
            return PollOutcome::Unchanged;
        }
        state.version += 1;
        state.snapshot = snapshot.clone();
        debug!(version = state.version, "poll snapshot applied");
        drop(state);
        let _ = self.publisher.send(snapshot);
        PollOutcome::Applied
    }

    // Selection passthroughs; the selection lives with the snapshot so a
    // batch mutation can read both under one lock.

    pub async fn set_multi_select(&self, on: bool) {
        self.inner.write().await.selection.set_multi(on);
    }

    pub async fn is_multi_select(&self) -> bool {
        self.inner.read().await.selection.is_multi()
    }

    /// Toggle a list in the selection; returns whether it is now selected
    pub async fn toggle_selected(&self, id: &str) -> bool {
        self.inner.write().await.selection.toggle(id)
    }

    pub async fn selected(&self) -> Vec<ListId> {
        self.inner.read().await.selection.selected().to_vec()
    }

    pub async fn clear_selection(&self) {
        let mut state = self.inner.write().await;
        state.selection.set_multi(false);
    }
}

/// A mounted engine instance: store + coordinator + poll scheduler
///
/// Created at view-mount, torn down at unmount. Owns its poll timer; no
/// module-level singletons.
pub struct SyncSession {
    store: SharedStore,
    coordinator: MutationCoordinator,
    poller: PollScheduler,
}

impl SyncSession {
    /// Fetch the initial snapshot, then start polling
    pub async fn start(args: &Args, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let api: Arc<dyn ListsApi> = Arc::new(
            HttpListsApi::new(ApiConfig {
                base_url: args.api_url.clone(),
                auth_token: args.auth_token.clone(),
                timeout_ms: args.request_timeout_ms,
            })
            .map_err(SyncError::Api)?,
        );
        Self::start_with_api(args.view(), args.poll_interval_ms, api, notifier).await
    }

    /// Start against an explicit API implementation (tests, custom hosts)
    pub async fn start_with_api(
        view: View,
        poll_interval_ms: u64,
        api: Arc<dyn ListsApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let initial = api
            .fetch_snapshot(view)
            .await
            .map_err(SyncError::Api)?
            .into_snapshot();
        info!(lists = initial.len(), view = ?view, "initial snapshot loaded");

        let store = SharedStore::new(initial);
        let coordinator =
            MutationCoordinator::new(Arc::clone(&api), store.clone(), Arc::clone(&notifier), view);
        let poller = PollScheduler::start(
            PollConfig {
                interval_ms: poll_interval_ms,
                view,
            },
            api,
            store.clone(),
            notifier,
        );

        Ok(Self {
            store,
            coordinator,
            poller,
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn coordinator(&self) -> &MutationCoordinator {
        &self.coordinator
    }

    /// Snapshot updates for the presentation layer
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.store.subscribe()
    }

    /// Tear down the session, cancelling the poll timer exactly once
    pub async fn shutdown(mut self) {
        self.poller.stop().await;
    }
}
