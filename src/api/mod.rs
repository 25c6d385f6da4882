//! REST API boundary: wire types, client trait, HTTP implementation

pub mod client;
pub mod types;

pub use client::{ApiConfig, HttpListsApi, ListsApi};
pub use types::{ListEdit, SnapshotPayload, View};
