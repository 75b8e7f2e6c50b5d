//! Expand/collapse state for row ids.
//!
//! Expansion uses string IDs so it survives data refreshes as long as the
//! host keeps ids stable.

use std::collections::HashSet;

/// Set of expanded row ids.
///
/// Every id starts collapsed. Collapsing a row does not touch its
/// descendants: their flags persist and reappear unchanged when the
/// parent is expanded again. Any id may be recorded, including ids of
/// rows without children; that simply has no visual effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    /// Create a state with every row collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an id is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip an id between collapsed and expanded.
    /// Returns the new state (`true` = expanded).
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    /// Expand an id. Returns true if it was collapsed before.
    pub fn expand(&mut self, id: &str) -> bool {
        if self.expanded.contains(id) {
            false
        } else {
            self.expanded.insert(id.to_string())
        }
    }

    /// Collapse an id. Returns true if it was expanded before.
    pub fn collapse(&mut self, id: &str) -> bool {
        self.expanded.remove(id)
    }

    /// Get the number of expanded ids.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Check if nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Get all expanded ids (sorted for deterministic ordering).
    pub fn expanded(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.expanded.iter().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collapsed() {
        let state = ExpansionState::new();
        assert!(state.is_empty());
        assert!(!state.is_expanded("1"));
    }

    #[test]
    fn toggle_twice_restores() {
        let mut state = ExpansionState::new();
        state.expand("a");
        let before = state.clone();

        assert!(state.toggle("b"));
        assert!(!state.toggle("b"));
        assert_eq!(state, before);

        assert!(!state.toggle("a"));
        assert!(state.toggle("a"));
        assert_eq!(state, before);
    }

    #[test]
    fn expand_and_collapse_report_changes() {
        let mut state = ExpansionState::new();
        assert!(state.expand("1"));
        assert!(!state.expand("1"));
        assert!(state.collapse("1"));
        assert!(!state.collapse("1"));
    }

    #[test]
    fn records_any_id() {
        let mut state = ExpansionState::new();
        state.toggle("no-such-row");
        assert_eq!(state.expanded(), vec!["no-such-row".to_string()]);
    }
}
