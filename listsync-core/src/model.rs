//! Data model for shared lists
//!
//! Wire-compatible with the server's JSON representation: list types use
//! their server class names (`"GroceryList"` etc.), permissions are
//! lowercase strings, and ids are kept as strings because the permission
//! map arrives keyed by string ids.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Server-side list identifier
pub type ListId = String;

/// The fixed set of list kinds
///
/// Immutable once a list is created; merge eligibility is partitioned by
/// this type. Ordering is the stable secondary sort key for collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ListType {
    #[serde(rename = "BookList")]
    Book,
    #[serde(rename = "GroceryList")]
    Grocery,
    #[serde(rename = "MusicList")]
    Music,
    #[serde(rename = "SimpleList")]
    Simple,
    #[serde(rename = "ToDoList")]
    ToDo,
}

impl ListType {
    /// Whether this type's validation fields are mutually exclusive
    /// alternatives (a book has a title or an author, a song a title or
    /// an artist). Drives the join word in validation toasts.
    pub fn has_exclusive_fields(&self) -> bool {
        matches!(self, ListType::Book | ListType::Music)
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListType::Book => write!(f, "BookList"),
            ListType::Grocery => write!(f, "GroceryList"),
            ListType::Music => write!(f, "MusicList"),
            ListType::Simple => write!(f, "SimpleList"),
            ListType::ToDo => write!(f, "ToDoList"),
        }
    }
}

/// Per-list grant for the current user
///
/// `Write` for the owner and for collaborators accepted with write access,
/// `Read` otherwise. Every visible list has exactly one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
}

/// A named, typed, shareable list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
    pub owner_id: String,
    pub created_at: String,
    pub completed: bool,
    #[serde(default)]
    pub refreshed: bool,
    /// Id of the current user's share record on this list
    pub users_list_id: ListId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl List {
    /// Whether the given user owns this list
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// The full client-side view of a user's lists
///
/// The three collections are disjoint: a list id appears in exactly one of
/// them at any time. Derives `PartialEq` so the polling path can detect
/// no-change snapshots structurally and skip delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Invited, not yet accepted or rejected
    pub pending: Vec<List>,
    /// Accepted, not completed
    pub incomplete: Vec<List>,
    /// Accepted and completed
    pub completed: Vec<List>,
    /// Per-list grant for the current user
    pub permissions: HashMap<ListId, Permission>,
    pub current_user_id: String,
}

impl Snapshot {
    /// Look up a list by id across all three collections
    pub fn find(&self, id: &str) -> Option<&List> {
        self.pending
            .iter()
            .chain(self.incomplete.iter())
            .chain(self.completed.iter())
            .find(|l| l.id == id)
    }

    /// Permission for a list, `Read` when no entry exists
    ///
    /// Missing entries are treated as no-access by UI derivations, so the
    /// store takes care to insert entries before lists become readable.
    pub fn permission(&self, id: &str) -> Option<Permission> {
        self.permissions.get(id).copied()
    }

    /// Total number of visible lists
    pub fn len(&self) -> usize {
        self.pending.len() + self.incomplete.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, list_type: ListType) -> List {
        List {
            id: id.to_string(),
            name: format!("list-{id}"),
            list_type,
            owner_id: "u1".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            completed: false,
            refreshed: false,
            users_list_id: format!("ul-{id}"),
            categories: None,
        }
    }

    #[test]
    fn test_list_type_wire_names() {
        let json = serde_json::to_string(&ListType::Grocery).unwrap();
        assert_eq!(json, "\"GroceryList\"");
        let back: ListType = serde_json::from_str("\"ToDoList\"").unwrap();
        assert_eq!(back, ListType::ToDo);
    }

    #[test]
    fn test_permission_wire_names() {
        assert_eq!(serde_json::to_string(&Permission::Write).unwrap(), "\"write\"");
        let p: Permission = serde_json::from_str("\"read\"").unwrap();
        assert_eq!(p, Permission::Read);
    }

    #[test]
    fn test_exclusive_field_types() {
        assert!(ListType::Book.has_exclusive_fields());
        assert!(ListType::Music.has_exclusive_fields());
        assert!(!ListType::Grocery.has_exclusive_fields());
        assert!(!ListType::Simple.has_exclusive_fields());
        assert!(!ListType::ToDo.has_exclusive_fields());
    }

    #[test]
    fn test_list_deserializes_type_field() {
        let json = r#"{
            "id": "1",
            "name": "Groceries",
            "type": "GroceryList",
            "owner_id": "u1",
            "created_at": "2026-01-01T00:00:00Z",
            "completed": false,
            "users_list_id": "ul-1"
        }"#;
        let list: List = serde_json::from_str(json).unwrap();
        assert_eq!(list.list_type, ListType::Grocery);
        assert!(!list.refreshed);
        assert!(list.categories.is_none());
    }

    #[test]
    fn test_snapshot_find_spans_collections() {
        let snap = Snapshot {
            pending: vec![sample("1", ListType::Book)],
            incomplete: vec![sample("2", ListType::Grocery)],
            completed: vec![sample("3", ListType::Music)],
            permissions: HashMap::new(),
            current_user_id: "u1".to_string(),
        };
        assert!(snap.find("1").is_some());
        assert!(snap.find("2").is_some());
        assert!(snap.find("3").is_some());
        assert!(snap.find("4").is_none());
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn test_structural_equality() {
        let a = Snapshot {
            incomplete: vec![sample("2", ListType::Grocery)],
            ..Default::default()
        };
        let b = a.clone();
        assert_eq!(a, b);
        let mut c = a.clone();
        c.incomplete[0].name = "renamed".to_string();
        assert_ne!(a, c);
    }
}
