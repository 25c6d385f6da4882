//! Mutation coordinator
//!
//! Implements the optimistic mutations (accept, reject, delete, complete,
//! refresh, merge, create, edit) over the shared store. Every operation
//! follows the same template:
//!
//! 1. resolve the effective target set: the whole selection when
//!    multi-select is active and non-empty, otherwise the single list
//! 2. partition the targets by the operation's rule (ownership, completion)
//! 3. issue one request per target concurrently, or one batched request
//!    for merge
//! 4. on aggregate success, compute the next snapshot with the pure store
//!    operations, clear the selection, commit, toast
//! 5. on any failure, classify the first error into a toast/redirect and
//!    leave state unchanged
//!
//! Batches are all-or-nothing: a single rejected request discards the
//! whole batch locally; the server-side partial effects reconcile on the
//! next poll.
//!
//! In-flight gating is an explicit state machine, not a boolean: starting
//! an operation while one is running returns
//! [`SyncError::OperationInFlight`], so double submission is impossible by
//! construction. Reject, delete, and merge are confirmation-gated: a
//! `request_*` call stages the frozen target set, `confirm_*` fires it,
//! `dismiss` drops it without any request.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::{ListEdit, ListsApi, View};
use crate::classify::{classify, Context, JoinWord};
use crate::notify::Notifier;
use crate::session::SharedStore;
use crate::types::{ApiError, Result, SyncError};
use listsync_core::store;
use listsync_core::{List, ListId, ListType, Snapshot};

/// Whether a mutation batch is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    InFlight,
}

/// A staged, confirmation-gated operation
///
/// Targets are frozen at request time so a selection change between the
/// confirmation prompt and the confirm click cannot alter the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingConfirmation {
    Reject(Vec<ListId>),
    Delete(Vec<ListId>),
    Merge(Vec<ListId>),
}

/// Drives optimistic mutations against the shared store
pub struct MutationCoordinator {
    api: Arc<dyn ListsApi>,
    store: SharedStore,
    notifier: Arc<dyn Notifier>,
    view: View,
    op_state: Mutex<OpState>,
    staged: Mutex<Option<PendingConfirmation>>,
}

fn noun(count: usize) -> &'static str {
    if count == 1 {
        "List"
    } else {
        "Lists"
    }
}

fn join_for(list_type: ListType) -> JoinWord {
    if list_type.has_exclusive_fields() {
        JoinWord::Or
    } else {
        JoinWord::And
    }
}

fn first_error<T>(results: Vec<std::result::Result<T, ApiError>>) -> Option<ApiError> {
    results.into_iter().find_map(|r| r.err())
}

impl MutationCoordinator {
    pub fn new(
        api: Arc<dyn ListsApi>,
        store: SharedStore,
        notifier: Arc<dyn Notifier>,
        view: View,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
            view,
            op_state: Mutex::new(OpState::Idle),
            staged: Mutex::new(None),
        }
    }

    pub async fn is_in_flight(&self) -> bool {
        *self.op_state.lock().await == OpState::InFlight
    }

    /// The staged confirmation, if any (drives the confirmation prompt)
    pub async fn staged(&self) -> Option<PendingConfirmation> {
        self.staged.lock().await.clone()
    }

    /// Drop the staged confirmation without issuing any request
    pub async fn dismiss(&self) {
        *self.staged.lock().await = None;
    }

    async fn begin(&self) -> Result<()> {
        let mut state = self.op_state.lock().await;
        if *state == OpState::InFlight {
            return Err(SyncError::OperationInFlight);
        }
        *state = OpState::InFlight;
        Ok(())
    }

    async fn finish(&self) {
        *self.op_state.lock().await = OpState::Idle;
    }

    /// Selection when multi-select is active and non-empty, else the single id
    async fn effective_targets(&self, single: &str) -> Vec<ListId> {
        if self.store.is_multi_select().await {
            let selected = self.store.selected().await;
            if !selected.is_empty() {
                return selected;
            }
        }
        vec![single.to_string()]
    }

    fn report(&self, err: &ApiError, ctx: &Context) {
        let classified = classify(err, ctx);
        warn!(error = %err, kind = ?classified.kind, "mutation failed");
        self.notifier.toast(&classified.message);
        if let Some(route) = classified.redirect {
            self.notifier.redirect(&route);
        }
    }

    async fn succeed(&self, next: Snapshot, toast: &str) {
        self.store.clear_selection().await;
        self.store.commit(next).await;
        self.notifier.toast(toast);
    }

    // ------------------------------------------------------------------
    // Accept / reject
    // ------------------------------------------------------------------

    /// Accept pending invitations
    pub async fn accept(&self, list_id: &str) -> Result<()> {
        self.begin().await?;
        let result = self.run_accept(list_id).await;
        self.finish().await;
        result
    }

    async fn run_accept(&self, list_id: &str) -> Result<()> {
        let snapshot = self.store.snapshot().await;
        let target_ids = self.effective_targets(list_id).await;
        let targets: Vec<List> = snapshot
            .pending
            .iter()
            .filter(|l| target_ids.contains(&l.id))
            .cloned()
            .collect();
        if targets.is_empty() {
            return Ok(());
        }
        debug!(count = targets.len(), "accepting invitations");

        let results = join_all(targets.iter().map(|list| {
            let api = Arc::clone(&self.api);
            let id = list.id.clone();
            let users_list_id = list.users_list_id.clone();
            async move { api.set_accepted(&id, &users_list_id, true).await }
        }))
        .await;

        let ctx = Context::mutation(noun(targets.len())).with_join(join_for(targets[0].list_type));
        if let Some(err) = first_error(results) {
            self.report(&err, &ctx);
            return Ok(());
        }

        let ids: Vec<ListId> = targets.iter().map(|l| l.id.clone()).collect();
        let next = store::apply_accept(&snapshot, &ids);
        self.succeed(next, &format!("{} accepted", ctx.noun)).await;
        Ok(())
    }

    /// Stage a reject for confirmation; no request fires until confirmed
    pub async fn request_reject(&self, list_id: &str) {
        let snapshot = self.store.snapshot().await;
        let target_ids = self.effective_targets(list_id).await;
        let ids: Vec<ListId> = snapshot
            .pending
            .iter()
            .filter(|l| target_ids.contains(&l.id))
            .map(|l| l.id.clone())
            .collect();
        if !ids.is_empty() {
            *self.staged.lock().await = Some(PendingConfirmation::Reject(ids));
        }
    }

    /// Fire the staged reject
    pub async fn confirm_reject(&self) -> Result<()> {
        let ids = {
            let mut staged = self.staged.lock().await;
            match staged.take() {
                Some(PendingConfirmation::Reject(ids)) => ids,
                other => {
                    *staged = other;
                    return Err(SyncError::NothingStaged);
                }
            }
        };
        self.begin().await?;
        let result = self.run_reject(ids).await;
        self.finish().await;
        result
    }

    async fn run_reject(&self, ids: Vec<ListId>) -> Result<()> {
        let snapshot = self.store.snapshot().await;
        let targets: Vec<List> = snapshot
            .pending
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        let results = join_all(targets.iter().map(|list| {
            let api = Arc::clone(&self.api);
            let id = list.id.clone();
            let users_list_id = list.users_list_id.clone();
            async move { api.set_accepted(&id, &users_list_id, false).await }
        }))
        .await;

        let ctx = Context::mutation(noun(targets.len()));
        if let Some(err) = first_error(results) {
            self.report(&err, &ctx);
            return Ok(());
        }

        let ids: Vec<ListId> = targets.iter().map(|l| l.id.clone()).collect();
        let next = store::apply_reject(&snapshot, &ids);
        self.succeed(next, &format!("{} rejected", ctx.noun)).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Delete (owner) / unshare (collaborator)
    // ------------------------------------------------------------------

    /// Stage a delete for confirmation
    pub async fn request_delete(&self, list_id: &str) {
        let snapshot = self.store.snapshot().await;
        let target_ids = self.effective_targets(list_id).await;
        let ids: Vec<ListId> = snapshot
            .incomplete
            .iter()
            .chain(snapshot.completed.iter())
            .filter(|l| target_ids.contains(&l.id))
            .map(|l| l.id.clone())
            .collect();
        if !ids.is_empty() {
            *self.staged.lock().await = Some(PendingConfirmation::Delete(ids));
        }
    }

    /// Fire the staged delete
    ///
    /// Owned targets get a destructive delete; shared targets get an
    /// unshare instead. A collaborator never destroys another user's list.
    pub async fn confirm_delete(&self) -> Result<()> {
        let ids = {
            let mut staged = self.staged.lock().await;
            match staged.take() {
                Some(PendingConfirmation::Delete(ids)) => ids,
                other => {
                    *staged = other;
                    return Err(SyncError::NothingStaged);
                }
            }
        };
        self.begin().await?;
        let result = self.run_delete(ids).await;
        self.finish().await;
        result
    }

    async fn run_delete(&self, ids: Vec<ListId>) -> Result<()> {
        let snapshot = self.store.snapshot().await;
        let targets: Vec<List> = snapshot
            .incomplete
            .iter()
            .chain(snapshot.completed.iter())
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect();
        if targets.is_empty() {
            return Ok(());
        }
        let me = snapshot.current_user_id.clone();
        debug!(count = targets.len(), "deleting/unsharing lists");

        let results = join_all(targets.iter().map(|list| {
            let api = Arc::clone(&self.api);
            let owned = list.is_owned_by(&me);
            let id = list.id.clone();
            let users_list_id = list.users_list_id.clone();
            async move {
                if owned {
                    api.delete_list(&id).await
                } else {
                    api.set_accepted(&id, &users_list_id, false).await
                }
            }
        }))
        .await;

        let ctx = Context::mutation(noun(targets.len()));
        if let Some(err) = first_error(results) {
            self.report(&err, &ctx);
            return Ok(());
        }

        let ids: Vec<ListId> = targets.iter().map(|l| l.id.clone()).collect();
        let next = store::apply_remove(&snapshot, &ids);
        self.succeed(next, &format!("{} deleted", ctx.noun)).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Complete / refresh
    // ------------------------------------------------------------------

    /// Mark owned, not-yet-completed lists complete
    ///
    /// Non-owned or already-completed targets are filtered out; an empty
    /// filter result issues zero requests and changes nothing.
    pub async fn complete(&self, list_id: &str) -> Result<()> {
        self.begin().await?;
        let result = self.run_complete(list_id).await;
        self.finish().await;
        result
    }

    async fn run_complete(&self, list_id: &str) -> Result<()> {
        let snapshot = self.store.snapshot().await;
        let target_ids = self.effective_targets(list_id).await;
        let me = snapshot.current_user_id.clone();
        let targets: Vec<List> = snapshot
            .incomplete
            .iter()
            .filter(|l| target_ids.contains(&l.id) && l.is_owned_by(&me) && !l.completed)
            .cloned()
            .collect();
        if targets.is_empty() {
            debug!("complete: no eligible targets, nothing to do");
            return Ok(());
        }

        let results = join_all(targets.iter().map(|list| {
            let api = Arc::clone(&self.api);
            let id = list.id.clone();
            async move { api.edit_list(&id, &ListEdit::complete()).await }
        }))
        .await;

        let ctx = Context::mutation(noun(targets.len()));
        if let Some(err) = first_error(results) {
            self.report(&err, &ctx);
            return Ok(());
        }

        let ids: Vec<ListId> = targets.iter().map(|l| l.id.clone()).collect();
        let next = store::apply_complete(&snapshot, &ids);
        self.succeed(next, &format!("{} completed", ctx.noun)).await;
        Ok(())
    }

    /// Clone owned completed lists into new incomplete ones
    ///
    /// Targets are marked `refreshed` locally before the requests fire, so
    /// the marker is visible while they are outstanding. Each response
    /// list is inserted into incomplete with its permission entry set
    /// first.
    pub async fn refresh(&self, list_id: &str) -> Result<()> {
        self.begin().await?;
        let result = self.run_refresh(list_id).await;
        self.finish().await;
        result
    }

    async fn run_refresh(&self, list_id: &str) -> Result<()> {
        let snapshot = self.store.snapshot().await;
        let target_ids = self.effective_targets(list_id).await;
        let me = snapshot.current_user_id.clone();
        let targets: Vec<List> = snapshot
            .completed
            .iter()
            .filter(|l| target_ids.contains(&l.id) && l.is_owned_by(&me))
            .cloned()
            .collect();
        if targets.is_empty() {
            return Ok(());
        }
        let ids: Vec<ListId> = targets.iter().map(|l| l.id.clone()).collect();

        // optimistic marker, committed ahead of the requests
        let marked = store::mark_refreshed(&snapshot, &ids);
        self.store.commit(marked.clone()).await;

        let results = join_all(ids.iter().map(|id| {
            let api = Arc::clone(&self.api);
            let id = id.clone();
            async move { api.refresh_list(&id).await }
        }))
        .await;

        let ctx = Context::mutation(noun(targets.len()));
        let mut new_lists = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(list) => new_lists.push(list),
                Err(err) => {
                    self.report(&err, &ctx);
                    return Ok(());
                }
            }
        }

        let next = store::apply_refresh(&marked, &new_lists);
        self.succeed(next, &format!("{} refreshed", ctx.noun)).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Merge
    // ------------------------------------------------------------------

    /// Stage a merge of the current selection
    ///
    /// The first selected list decides the merge type; later selections of
    /// a different type are silently excluded, not rejected.
    pub async fn request_merge(&self) {
        if !self.store.is_multi_select().await {
            return;
        }
        let selected = self.store.selected().await;
        if selected.is_empty() {
            return;
        }
        let snapshot = self.store.snapshot().await;
        let lists: Vec<List> = selected
            .iter()
            .filter_map(|id| {
                snapshot
                    .incomplete
                    .iter()
                    .chain(snapshot.completed.iter())
                    .find(|l| &l.id == id)
                    .cloned()
            })
            .collect();
        let Some(first) = lists.first() else {
            return;
        };
        let merge_type = first.list_type;
        let ids: Vec<ListId> = lists
            .iter()
            .filter(|l| l.list_type == merge_type)
            .map(|l| l.id.clone())
            .collect();
        debug!(count = ids.len(), merge_type = %merge_type, "merge staged");
        *self.staged.lock().await = Some(PendingConfirmation::Merge(ids));
    }

    /// Fire the staged merge under the given name
    ///
    /// An empty (or all-whitespace) name is rejected client-side before
    /// any request; the staged merge stays so the user can retry.
    pub async fn confirm_merge(&self, new_name: &str) -> Result<()> {
        let name = new_name.trim();
        if name.is_empty() {
            return Err(SyncError::EmptyMergeName);
        }
        let ids = {
            let mut staged = self.staged.lock().await;
            match staged.take() {
                Some(PendingConfirmation::Merge(ids)) => ids,
                other => {
                    *staged = other;
                    return Err(SyncError::NothingStaged);
                }
            }
        };
        self.begin().await?;
        let result = self.run_merge(ids, name).await;
        self.finish().await;
        result
    }

    async fn run_merge(&self, ids: Vec<ListId>, name: &str) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let snapshot = self.store.snapshot().await;
        let merge_type = snapshot
            .find(&ids[0])
            .map(|l| l.list_type)
            .unwrap_or(ListType::Simple);
        let joined = ids.join(",");

        let ctx = Context::mutation("Lists").with_join(join_for(merge_type));
        let merged = match self.api.merge_lists(&joined, name).await {
            Ok(list) => list,
            Err(err) => {
                self.report(&err, &ctx);
                return Ok(());
            }
        };

        let completed_only = self.view == View::Completed;
        let next = store::apply_merge(&snapshot, &ids, &merged, completed_only);
        self.succeed(next, "Lists merged").await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Create / edit
    // ------------------------------------------------------------------

    /// Create a new list; it lands in incomplete with a write grant
    pub async fn create(&self, name: &str, list_type: ListType) -> Result<()> {
        self.begin().await?;
        let result = self.run_create(name, list_type).await;
        self.finish().await;
        result
    }

    async fn run_create(&self, name: &str, list_type: ListType) -> Result<()> {
        let ctx = Context::mutation("List").with_join(join_for(list_type));
        let created = match self.api.create_list(name, list_type).await {
            Ok(list) => list,
            Err(err) => {
                self.report(&err, &ctx);
                return Ok(());
            }
        };
        let snapshot = self.store.snapshot().await;
        let next = store::apply_create(&snapshot, &created);
        self.succeed(next, "List created").await;
        Ok(())
    }

    /// Edit a list's name, type, or completion
    pub async fn edit(&self, list_id: &str, edit: ListEdit) -> Result<()> {
        self.begin().await?;
        let result = self.run_edit(list_id, edit).await;
        self.finish().await;
        result
    }

    async fn run_edit(&self, list_id: &str, edit: ListEdit) -> Result<()> {
        let snapshot = self.store.snapshot().await;
        // only accepted lists are editable
        let Some(current) = snapshot
            .incomplete
            .iter()
            .chain(snapshot.completed.iter())
            .find(|l| l.id == list_id)
            .cloned()
        else {
            return Ok(());
        };
        let join = join_for(edit.list_type.unwrap_or(current.list_type));
        let ctx = Context::mutation("List")
            .with_join(join)
            .with_redirect("/lists");

        if let Err(err) = self.api.edit_list(list_id, &edit).await {
            self.report(&err, &ctx);
            return Ok(());
        }

        let mut updated = current;
        if let Some(name) = edit.name {
            updated.name = name;
        }
        if let Some(list_type) = edit.list_type {
            updated.list_type = list_type;
        }
        if let Some(completed) = edit.completed {
            updated.completed = completed;
        }
        let next = store::apply_edit(&snapshot, &updated);
        self.succeed(next, "List updated").await;
        Ok(())
    }
}
