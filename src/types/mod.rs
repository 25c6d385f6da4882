//! Shared types for listsync

pub mod error;

pub use error::{ApiError, Result, SyncError};
