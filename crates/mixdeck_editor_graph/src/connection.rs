// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::identifier::{NodeId, PortRef};
use serde::{Deserialize, Serialize};

/// A directed connection from an output port to an input port.
///
/// A connection has no identity beyond its endpoint pair: disconnecting and
/// reconnecting the same pair yields a new, equal connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Driving output port
    pub from: PortRef,
    /// Driven input port
    pub to: PortRef,
}

impl Connection {
    /// Create a connection
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self { from, to }
    }

    /// Check if this connection touches a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }
}
