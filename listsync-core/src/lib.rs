//! Pure collection-state engine for shared list synchronization
//!
//! Holds the data model and the transformation layer that the async engine
//! in the `listsync` crate drives. Everything here is synchronous and
//! side-effect free:
//!
//! - **Model**: lists, list types, per-list permissions, and the snapshot
//!   of the three lifecycle collections (pending / incomplete / completed)
//! - **Store**: pure snapshot transformations that enforce the
//!   one-collection-per-list invariant and canonical ordering
//! - **Selection**: the single/multi selection state machine that batch
//!   mutations draw their target sets from
//!
//! Every store operation returns a fresh [`Snapshot`] rather than mutating
//! in place, so concurrent async callers holding an old snapshot can never
//! observe a half-applied mutation.

pub mod model;
pub mod selection;
pub mod store;

pub use model::{List, ListId, ListType, Permission, Snapshot};
pub use selection::{SelectMode, Selection};
