// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clipboard subgraph transforms: selection capture, identifier
//! regeneration, and paste placement.

use crate::connection::Connection;
use crate::graph::Graph;
use crate::identifier::{NodeId, PortRef};
use std::collections::HashMap;

/// Build a throwaway graph holding exactly the selected nodes plus every
/// connection whose endpoints BOTH lie inside the selection. Connections
/// crossing the selection boundary are dropped.
pub fn copy_subgraph(graph: &Graph, selection: &[NodeId]) -> Graph {
    let mut subgraph = Graph::new();

    for id in selection {
        if let Some(node) = graph.node(*id) {
            // Ids are unique in the source graph, so this cannot collide.
            let _ = subgraph.add_node(node.clone());
        }
    }

    for connection in graph.connections() {
        if subgraph.contains_node(connection.from.node) && subgraph.contains_node(connection.to.node)
        {
            subgraph.push_connection(connection.clone());
        }
    }

    subgraph
}

/// Rebuild a subgraph with every node ID regenerated and all connection
/// identifiers rewritten to match.
///
/// After this no ID in the result equals any ID that ever appeared in the
/// source, so the result can be merged into any graph without collision.
/// A connection endpoint that does not map to a regenerated node (possible
/// only in a malformed payload) is dropped rather than left pointing at the
/// paste target's existing nodes.
pub fn regenerate_ids(graph: &Graph) -> Graph {
    let mut remapped = Graph::new();
    let mut ids: HashMap<NodeId, NodeId> = HashMap::new();

    for node in graph.nodes() {
        let mut node = node.clone();
        let fresh = NodeId::new();
        ids.insert(node.id, fresh);
        node.id = fresh;
        let _ = remapped.add_node(node);
    }

    for connection in graph.connections() {
        let (Some(from), Some(to)) = (ids.get(&connection.from.node), ids.get(&connection.to.node))
        else {
            tracing::debug!(from = %connection.from, to = %connection.to, "dropping unmapped connection");
            continue;
        };

        remapped.push_connection(Connection::new(
            PortRef::new(*from, connection.from.port.clone()),
            PortRef::new(*to, connection.to.port.clone()),
        ));
    }

    remapped
}

/// Translate all node positions so the subgraph's bounding-box center lands
/// on `target`.
pub fn offset_to(graph: &mut Graph, target: [f32; 2]) {
    let ids: Vec<NodeId> = graph.node_ids().collect();
    let Some(center) = graph.bounding_center(&ids) else {
        return;
    };

    let delta = [target[0] - center[0], target[1] - center[1]];
    for id in ids {
        if let Some(node) = graph.node_mut(id) {
            node.position[0] += delta[0];
            node.position[1] += delta[1];
        }
    }
}
