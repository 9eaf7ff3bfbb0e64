// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reversible graph changes: the unit stored on the undo and redo stacks.

use mixdeck_editor_graph::{Graph, NodeId};

/// Whether a change created or deleted its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The payload was added to the graph
    Creation,
    /// The payload was removed from the graph
    Deletion,
}

impl ChangeKind {
    /// The logical inverse of this kind
    pub fn inverted(self) -> Self {
        match self {
            Self::Creation => Self::Deletion,
            Self::Deletion => Self::Creation,
        }
    }
}

/// One undo/redo stack entry: a minimal throwaway graph holding exactly the
/// nodes and connections one user action created or deleted.
///
/// Payload connections may reference nodes outside the payload itself (a
/// deleted node's edges to surviving neighbors); they are resolved against
/// the live graph when the change is reverted.
#[derive(Debug, Clone)]
pub struct GraphChange {
    /// Creation or deletion
    pub kind: ChangeKind,
    /// Human-readable action label for undo/redo menu entries
    pub label: String,
    payload: Graph,
}

impl GraphChange {
    /// Record a creation
    pub fn creation(label: impl Into<String>, payload: Graph) -> Self {
        Self {
            kind: ChangeKind::Creation,
            label: label.into(),
            payload,
        }
    }

    /// Record a deletion
    pub fn deletion(label: impl Into<String>, payload: Graph) -> Self {
        Self {
            kind: ChangeKind::Deletion,
            label: label.into(),
            payload,
        }
    }

    /// The affected nodes and connections
    pub fn payload(&self) -> &Graph {
        &self.payload
    }

    /// The same payload with the kind flipped
    pub fn inverted(self) -> Self {
        Self {
            kind: self.kind.inverted(),
            ..self
        }
    }

    /// Undo this change against the live graph.
    ///
    /// A Creation is reverted by removing every payload connection and then
    /// every payload node; a Deletion by re-inserting the nodes and then
    /// re-resolving the connections. Entries are keyed purely by identifier:
    /// any entry that no longer resolves against the live graph (an external
    /// mutation got there first, or two records overlap) is skipped with a
    /// warning while the rest of the record still applies.
    pub fn revert(&self, live: &mut Graph) {
        match self.kind {
            ChangeKind::Creation => {
                // Connections first, so nodes are detached when they go.
                for connection in self.payload.connections() {
                    if !live.disconnect(&connection.from, &connection.to) {
                        tracing::warn!(
                            from = %connection.from,
                            to = %connection.to,
                            "undo: connection already gone, skipping"
                        );
                    }
                }
                for id in self.payload.node_ids().collect::<Vec<NodeId>>() {
                    if live.remove_node(id).is_none() {
                        tracing::warn!(node = %id, "undo: node already gone, skipping");
                    }
                }
            }
            ChangeKind::Deletion => {
                for node in self.payload.nodes() {
                    if let Err(error) = live.add_node(node.clone()) {
                        tracing::warn!(%error, "undo: cannot restore node, skipping");
                    }
                }
                for connection in self.payload.connections() {
                    if let Err(error) = live.connect(connection.from.clone(), connection.to.clone())
                    {
                        tracing::warn!(
                            from = %connection.from,
                            to = %connection.to,
                            %error,
                            "undo: cannot restore connection, skipping"
                        );
                    }
                }
            }
        }
    }
}
