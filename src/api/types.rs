//! Wire types for the lists REST API

use listsync_core::{List, ListType, Permission, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which snapshot view a session reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// All lists: pending + incomplete + completed
    #[default]
    All,
    /// Completed lists only (full-page completed view)
    Completed,
}

impl View {
    /// Read endpoint path for this view
    pub fn path(&self) -> &'static str {
        match self {
            View::All => "/lists",
            View::Completed => "/completed_lists",
        }
    }
}

/// Accepted lists split by completion, as the server groups them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcceptedLists {
    #[serde(default)]
    pub completed_lists: Vec<List>,
    /// Absent in the completed-only view
    #[serde(default)]
    pub not_completed_lists: Vec<List>,
}

/// Full snapshot payload returned by the read endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotPayload {
    /// Absent in the completed-only view
    #[serde(default)]
    pub pending_lists: Vec<List>,
    pub accepted_lists: AcceptedLists,
    pub current_list_permissions: HashMap<String, Permission>,
    pub current_user_id: String,
}

impl SnapshotPayload {
    /// Convert the wire grouping into the engine snapshot
    pub fn into_snapshot(self) -> Snapshot {
        let mut snapshot = Snapshot {
            pending: self.pending_lists,
            incomplete: self.accepted_lists.not_completed_lists,
            completed: self.accepted_lists.completed_lists,
            permissions: self.current_list_permissions,
            current_user_id: self.current_user_id,
        };
        listsync_core::store::canonical_order(&mut snapshot.incomplete);
        listsync_core::store::canonical_order(&mut snapshot.completed);
        snapshot
    }
}

/// Fields an edit may change
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub list_type: Option<ListType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ListEdit {
    /// Edit that marks a list complete
    pub fn complete() -> Self {
        Self {
            completed: Some(true),
            ..Default::default()
        }
    }
}

// Request envelopes, matching the server's nested parameter style.

#[derive(Debug, Serialize)]
pub(crate) struct UsersListBody {
    pub users_list: UsersListParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct UsersListParams {
    pub has_accepted: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBody<T: Serialize> {
    pub list: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateListParams {
    pub name: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
}

#[derive(Debug, Serialize)]
pub(crate) struct MergeListsBody {
    pub merge_lists: MergeListsParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct MergeListsParams {
    /// Comma-joined ordered source ids
    pub list_ids: String,
    pub new_list_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_paths() {
        assert_eq!(View::All.path(), "/lists");
        assert_eq!(View::Completed.path(), "/completed_lists");
    }

    #[test]
    fn test_payload_into_snapshot() {
        let json = r#"{
            "pending_lists": [{
                "id": "1", "name": "invited", "type": "GroceryList",
                "owner_id": "u2", "created_at": "2026-01-01T00:00:00Z",
                "completed": false, "users_list_id": "ul-1"
            }],
            "accepted_lists": {
                "completed_lists": [{
                    "id": "2", "name": "done", "type": "ToDoList",
                    "owner_id": "u1", "created_at": "2026-01-01T00:00:00Z",
                    "completed": true, "users_list_id": "ul-2"
                }],
                "not_completed_lists": [{
                    "id": "3", "name": "zzz", "type": "BookList",
                    "owner_id": "u1", "created_at": "2026-01-01T00:00:00Z",
                    "completed": false, "users_list_id": "ul-3"
                }, {
                    "id": "4", "name": "aaa", "type": "BookList",
                    "owner_id": "u1", "created_at": "2026-01-01T00:00:00Z",
                    "completed": false, "users_list_id": "ul-4"
                }]
            },
            "current_list_permissions": {"1": "read", "2": "write", "3": "write", "4": "write"},
            "current_user_id": "u1"
        }"#;
        let payload: SnapshotPayload = serde_json::from_str(json).unwrap();
        let snapshot = payload.into_snapshot();
        assert_eq!(snapshot.pending.len(), 1);
        assert_eq!(snapshot.completed.len(), 1);
        // canonical order applied during conversion
        assert_eq!(snapshot.incomplete[0].id, "4");
        assert_eq!(snapshot.incomplete[1].id, "3");
        assert_eq!(snapshot.permission("1"), Some(Permission::Read));
        listsync_core::store::check_invariants(&snapshot).unwrap();
    }

    #[test]
    fn test_completed_only_payload_defaults() {
        let json = r#"{
            "accepted_lists": { "completed_lists": [] },
            "current_list_permissions": {},
            "current_user_id": "u1"
        }"#;
        let payload: SnapshotPayload = serde_json::from_str(json).unwrap();
        assert!(payload.pending_lists.is_empty());
        assert!(payload.accepted_lists.not_completed_lists.is_empty());
    }

    #[test]
    fn test_merge_body_shape() {
        let body = MergeListsBody {
            merge_lists: MergeListsParams {
                list_ids: "1,2".to_string(),
                new_list_name: "merged".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["merge_lists"]["list_ids"], "1,2");
        assert_eq!(json["merge_lists"]["new_list_name"], "merged");
    }

    #[test]
    fn test_edit_serializes_only_set_fields() {
        let edit = ListEdit::complete();
        let json = serde_json::to_value(&edit).unwrap();
        assert_eq!(json, serde_json::json!({"completed": true}));
    }
}
