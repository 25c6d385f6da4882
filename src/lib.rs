//! Listsync - client-side reconciliation engine for shared lists
//!
//! Keeps three local collections (pending / incomplete / completed) and a
//! per-list permission map consistent with a periodically polled server
//! snapshot, while optimistic mutations run ahead of server confirmation.
//!
//! ## Components
//!
//! - **Store** ([`session::SharedStore`]): versioned shared snapshot; the
//!   point where the optimistic and poll-confirmed paths converge
//! - **Poller** ([`poller::PollScheduler`]): fixed-interval snapshot
//!   fetches, structural diffing, version-guarded application
//! - **Coordinator** ([`coordinator::MutationCoordinator`]): accept,
//!   reject, delete, complete, refresh, merge, create, edit as
//!   request-then-reconcile batches over the current selection
//! - **Classifier** ([`classify`]): failed request -> toast + optional
//!   redirect
//!
//! Pure collection state (model, store transformations, selection machine)
//! lives in the `listsync-core` crate.

pub mod api;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod logging;
pub mod notify;
pub mod poller;
pub mod session;
pub mod types;

pub use api::{ApiConfig, HttpListsApi, ListEdit, ListsApi, View};
pub use classify::{classify, Classified, Context, ErrorKind};
pub use config::Args;
pub use coordinator::{MutationCoordinator, OpState, PendingConfirmation};
pub use notify::{Notifier, TracingNotifier};
pub use poller::{PollConfig, PollScheduler};
pub use session::{PollOutcome, SharedStore, SyncSession};
pub use types::{ApiError, Result, SyncError};
