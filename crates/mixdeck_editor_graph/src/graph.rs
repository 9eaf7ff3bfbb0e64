// SPDX-License-Identifier: MIT OR Apache-2.0
//! The graph container: nodes plus directed, type-checked connections.
//!
//! One live `Graph` backs each open document. Throwaway graphs of the same
//! type serve as undo-change payloads and clipboard buffers.

use crate::connection::Connection;
use crate::identifier::{NodeId, PortRef};
use crate::node::{Node, Port};
use crate::schema::DataType;
use indexmap::IndexMap;

/// A node graph: an insertion-ordered node collection and an ordered
/// connection list.
///
/// Connections may form cycles; this layer deliberately does not detect or
/// reject them.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    connections: Vec<Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node.
    ///
    /// Connections are NOT cascaded: callers detach them first so that every
    /// removal is individually recordable by the undo engine. A node removed
    /// with connections still attached leaves those connections dangling.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id);

        if node.is_some() && self.connections.iter().any(|c| c.involves_node(node_id)) {
            tracing::warn!(%node_id, "node removed while connections still reference it");
        }

        node
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Whether a node with this ID exists
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Find a node by its textual identifier, matched case-insensitively.
    ///
    /// Connection endpoint strings are resolved through this rather than
    /// the map's own indexing.
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.is_named(name))
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node IDs, in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Validate a prospective connection without mutating anything.
    ///
    /// Pure in the two port refs and the current connection list; the view
    /// layer uses this for live drop-target feedback during drags.
    pub fn check_connection(
        &self,
        from: &PortRef,
        to: &PortRef,
    ) -> Result<ConnectOutcome, ConnectError> {
        let (_, output) = self
            .resolve_output(from)
            .ok_or_else(|| ConnectError::UnknownPort(from.clone()))?;
        let (_, input) = self
            .resolve_input(to)
            .ok_or_else(|| ConnectError::UnknownPort(to.clone()))?;

        if from.node == to.node {
            return Err(ConnectError::SelfConnection);
        }

        if output.data_type != input.data_type {
            return Err(ConnectError::TypeMismatch {
                from: output.data_type,
                to: input.data_type,
            });
        }

        // Single writer per input. Re-dropping onto the existing source is a
        // no-op rather than an error.
        if let Some(existing) = self.connections.iter().find(|c| c.to == *to) {
            if existing.from == *from {
                return Ok(ConnectOutcome::AlreadyConnected);
            }
            return Err(ConnectError::InputOccupied(to.clone()));
        }

        Ok(ConnectOutcome::New)
    }

    /// Connect an output port to an input port.
    ///
    /// Appends the pair on success; outputs may fan out to any number of
    /// inputs, but each input accepts at most one driving connection.
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Result<ConnectOutcome, ConnectError> {
        let outcome = self.check_connection(&from, &to)?;

        if outcome == ConnectOutcome::New {
            tracing::debug!(%from, %to, "connected");
            self.connections.push(Connection::new(from, to));
        }

        Ok(outcome)
    }

    /// Append a connection without validation.
    ///
    /// For assembling throwaway graphs (undo payloads, clipboard buffers)
    /// whose connections may reference nodes outside the graph itself. Live
    /// document graphs go through [`Graph::connect`].
    pub fn push_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Remove the connection matching this endpoint pair.
    ///
    /// Returns whether a connection was removed; a missing pair is a no-op,
    /// not an error.
    pub fn disconnect(&mut self, from: &PortRef, to: &PortRef) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| !(c.from == *from && c.to == *to));
        self.connections.len() != before
    }

    /// All connections, in insertion order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections driven by a specific output port
    pub fn connections_from<'a>(&'a self, from: &'a PortRef) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |c| c.from == *from)
    }

    /// The connection driving a specific input port, if any
    pub fn connection_to(&self, to: &PortRef) -> Option<&Connection> {
        self.connections.iter().find(|c| c.to == *to)
    }

    /// Connections touching a node on either end
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.involves_node(node_id))
    }

    /// Resolve an output-port reference against the live nodes
    pub fn resolve_output(&self, port: &PortRef) -> Option<(&Node, &Port)> {
        let node = self.nodes.get(&port.node)?;
        Some((node, node.output(&port.port)?))
    }

    /// Resolve an input-port reference against the live nodes
    pub fn resolve_input(&self, port: &PortRef) -> Option<(&Node, &Port)> {
        let node = self.nodes.get(&port.node)?;
        Some((node, node.input(&port.port)?))
    }

    /// Bounding-box center of a set of node positions.
    ///
    /// `None` when no ID resolves; used for paste placement.
    pub fn bounding_center(&self, ids: &[NodeId]) -> Option<[f32; 2]> {
        let mut min = [f32::INFINITY, f32::INFINITY];
        let mut max = [f32::NEG_INFINITY, f32::NEG_INFINITY];
        let mut any = false;

        for node in ids.iter().filter_map(|id| self.nodes.get(id)) {
            any = true;
            for axis in 0..2 {
                min[axis] = min[axis].min(node.position[axis]);
                max[axis] = max[axis].max(node.position[axis]);
            }
        }

        any.then(|| [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0])
    }
}

/// Result of a successful connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new connection was appended
    New,
    /// The input was already driven by this exact output; nothing changed
    AlreadyConnected,
}

/// Error adding a node
#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphError {
    /// A node with this ID is already present
    #[error("duplicate node ID {0}")]
    DuplicateId(NodeId),
}

/// Reason a prospective connection was rejected
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectError {
    /// An endpoint does not resolve to an existing node and port of the
    /// required direction
    #[error("unknown port {0}")]
    UnknownPort(PortRef),

    /// Both endpoints live on the same node
    #[error("cannot connect a node to itself")]
    SelfConnection,

    /// Output and input carry different data types; no implicit coercion
    #[error("type mismatch: {from:?} output into {to:?} input")]
    TypeMismatch {
        /// Output port type
        from: DataType,
        /// Input port type
        to: DataType,
    },

    /// The input is already driven by a different output
    #[error("input {0} already has a connection")]
    InputOccupied(PortRef),
}
