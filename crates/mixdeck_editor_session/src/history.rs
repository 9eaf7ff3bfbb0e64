// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo stacks over graph changes.

use crate::change::GraphChange;
use mixdeck_editor_graph::Graph;
use std::collections::VecDeque;

/// Maximum undo history depth
const MAX_HISTORY: usize = 100;

/// Undo/redo history for one document.
///
/// Two stacks of [`GraphChange`] records. Recording a fresh change clears
/// the redo stack; branching history is not supported.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<GraphChange>,
    redo_stack: VecDeque<GraphChange>,
    max_depth: usize,
}

impl History {
    /// Create a new history with the default depth cap
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with a custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Record a change that was just applied to the live graph.
    ///
    /// Clears the redo stack and drops the oldest record beyond the cap.
    pub fn record(&mut self, change: GraphChange) {
        self.redo_stack.clear();
        self.undo_stack.push_back(change);

        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the most recent change against the live graph.
    ///
    /// Returns `false` (a no-op) when the undo stack is empty.
    pub fn undo(&mut self, live: &mut Graph) -> bool {
        let Some(change) = self.undo_stack.pop_back() else {
            return false;
        };

        tracing::debug!(label = %change.label, "undo");
        change.revert(live);
        self.redo_stack.push_back(change.inverted());
        true
    }

    /// Redo the most recently undone change against the live graph.
    ///
    /// Returns `false` (a no-op) when the redo stack is empty.
    pub fn redo(&mut self, live: &mut Graph) -> bool {
        let Some(change) = self.redo_stack.pop_back() else {
            return false;
        };

        tracing::debug!(label = %change.label, "redo");
        change.revert(live);
        self.undo_stack.push_back(change.inverted());
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the next change to undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.label.as_str())
    }

    /// Label of the next change to redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|c| c.label.as_str())
    }

    /// Undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixdeck_editor_graph::graphs::mix::create_mix_registry;
    use mixdeck_editor_graph::NodeId;

    fn creation_of_new_node(live: &mut Graph) -> (NodeId, GraphChange) {
        let registry = create_mix_registry();
        let node = registry.create_node("float_constant").unwrap();
        let id = node.id;

        let mut payload = Graph::new();
        payload.add_node(node.clone()).unwrap();
        live.add_node(node).unwrap();

        (id, GraphChange::creation("Create Constant Float", payload))
    }

    #[test]
    fn test_undo_redo_inverse_law() {
        let mut live = Graph::new();
        let mut history = History::new();

        let (id, change) = creation_of_new_node(&mut live);
        history.record(change);

        assert!(history.undo(&mut live));
        assert!(!live.contains_node(id));

        assert!(history.redo(&mut live));
        assert!(live.contains_node(id));
        // Identity is preserved across the round trip, not just shape.
        assert_eq!(live.node_count(), 1);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut live = Graph::new();
        let mut history = History::new();

        assert!(!history.undo(&mut live));
        assert!(!history.redo(&mut live));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_fresh_record_clears_redo() {
        let mut live = Graph::new();
        let mut history = History::new();

        let (_, first) = creation_of_new_node(&mut live);
        history.record(first);
        history.undo(&mut live);
        assert!(history.can_redo());

        let (_, second) = creation_of_new_node(&mut live);
        history.record(second);
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_depth_cap_drops_oldest() {
        let mut live = Graph::new();
        let mut history = History::with_max_depth(2);

        for _ in 0..3 {
            let (_, change) = creation_of_new_node(&mut live);
            history.record(change);
        }

        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_descriptions_follow_the_stacks() {
        let mut live = Graph::new();
        let mut history = History::new();

        let (_, change) = creation_of_new_node(&mut live);
        history.record(change);

        assert_eq!(history.undo_description(), Some("Create Constant Float"));
        assert_eq!(history.redo_description(), None);

        history.undo(&mut live);
        assert_eq!(history.undo_description(), None);
        assert_eq!(history.redo_description(), Some("Create Constant Float"));
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut live = Graph::new();
        let mut history = History::new();

        let (_, change) = creation_of_new_node(&mut live);
        history.record(change);
        history.undo(&mut live);

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
