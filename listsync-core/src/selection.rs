//! Multi-select state machine
//!
//! Two states: `Single` (multi-select off, selection always empty) and
//! `Multi`. Both transitions clear the selection as a side effect.
//! Within `Multi`, toggling a list id is idempotent in pairs: toggling
//! twice restores the original set.
//!
//! The selection preserves insertion order. That order is observable: the
//! first selected list decides the merge type tie-break, so this is a
//! `Vec` rather than a hash set.

use crate::model::ListId;

/// Whether multi-select mode is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    #[default]
    Single,
    Multi,
}

/// Tracks which lists are multi-selected
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectMode,
    selected: Vec<ListId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn is_multi(&self) -> bool {
        self.mode == SelectMode::Multi
    }

    /// Switch multi-select mode on or off, clearing the selection either way
    pub fn set_multi(&mut self, on: bool) {
        self.mode = if on { SelectMode::Multi } else { SelectMode::Single };
        self.selected.clear();
    }

    /// Toggle a list in or out of the selection
    ///
    /// No-op outside multi-select mode. Returns whether the list is
    /// selected after the toggle.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.mode != SelectMode::Multi {
            return false;
        }
        if let Some(pos) = self.selected.iter().position(|s| s.as_str() == id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(id.to_string());
            true
        }
    }

    /// Selected ids in insertion order
    pub fn selected(&self) -> &[ListId] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear the selection, keeping the current mode
    ///
    /// Called after a batch mutation completes.
    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_single_and_empty() {
        let sel = Selection::new();
        assert_eq!(sel.mode(), SelectMode::Single);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_outside_multi_is_noop() {
        let mut sel = Selection::new();
        assert!(!sel.toggle("1"));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_is_idempotent_in_pairs() {
        let mut sel = Selection::new();
        sel.set_multi(true);
        assert!(sel.toggle("1"));
        assert!(sel.toggle("2"));
        assert!(!sel.toggle("1"));
        assert!(sel.toggle("1"));
        assert!(!sel.toggle("1"));
        assert_eq!(sel.selected(), &["2".to_string()]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut sel = Selection::new();
        sel.set_multi(true);
        sel.toggle("b");
        sel.toggle("a");
        sel.toggle("c");
        assert_eq!(
            sel.selected(),
            &["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_mode_transitions_clear_selection() {
        let mut sel = Selection::new();
        sel.set_multi(true);
        sel.toggle("1");
        sel.set_multi(false);
        assert!(sel.is_empty());
        assert_eq!(sel.mode(), SelectMode::Single);

        sel.set_multi(true);
        sel.toggle("2");
        sel.set_multi(true); // re-entering multi also clears
        assert!(sel.is_empty());
    }
}
