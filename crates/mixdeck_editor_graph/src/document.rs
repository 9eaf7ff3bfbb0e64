// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph document serialization.
//!
//! Documents are JSON: a node list where each record carries its schema tag
//! as the polymorphic dispatch key, followed by the ordered connection list
//! as identifier-string pairs. Ports are never serialized; they are
//! rematerialized from the registry on load.

use crate::graph::Graph;
use crate::identifier::{NodeId, PortRef};
use crate::node::Node;
use crate::schema::{NodeRegistry, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct GraphDocument {
    nodes: Vec<NodeRecord>,
    connections: Vec<(PortRef, PortRef)>,
}

#[derive(Serialize, Deserialize)]
struct NodeRecord {
    node_type: String,
    id: NodeId,
    position: [f32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    values: IndexMap<String, Value>,
}

impl NodeRecord {
    fn from_node(node: &Node) -> Self {
        Self {
            node_type: node.schema_id.clone(),
            id: node.id,
            position: node.position,
            name: node.name.clone(),
            comment: node.comment.clone(),
            values: node.values.clone(),
        }
    }
}

/// Serialize a graph to document text
pub fn serialize_graph(graph: &Graph) -> Result<String, DocumentError> {
    let document = GraphDocument {
        nodes: graph.nodes().map(NodeRecord::from_node).collect(),
        connections: graph
            .connections()
            .map(|c| (c.from.clone(), c.to.clone()))
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

/// Deserialize document text into a graph.
///
/// Nodes are rebuilt first, keeping their stored IDs and field values, with
/// ports rematerialized from `registry`. Connections are then re-resolved in
/// order; any connection that no longer validates (dangling endpoint, type
/// mismatch, occupied input) is skipped with a warning so that a partially
/// corrupt document still yields the maximum valid subgraph.
pub fn deserialize_graph(text: &str, registry: &NodeRegistry) -> Result<Graph, DocumentError> {
    let document: GraphDocument = serde_json::from_str(text)?;

    let mut graph = Graph::new();

    for record in document.nodes {
        let schema = registry
            .get(&record.node_type)
            .ok_or_else(|| DocumentError::UnknownNodeType(record.node_type.clone()))?;

        let mut node = Node::from_schema(schema);
        node.id = record.id;
        node.position = record.position;
        node.name = record.name;
        node.comment = record.comment;

        for (name, value) in record.values {
            if let Err(error) = node.set_value(&name, value) {
                tracing::warn!(node = %record.id, %error, "ignoring stored value");
            }
        }

        graph
            .add_node(node)
            .map_err(|_| DocumentError::DuplicateId(record.id))?;
    }

    for (from, to) in document.connections {
        if let Err(error) = graph.connect(from.clone(), to.clone()) {
            tracing::warn!(%from, %to, %error, "skipping connection");
        }
    }

    Ok(graph)
}

/// Error loading or saving a graph document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The text is not a structurally valid graph document
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A node record's type tag is not present in the registry
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    /// Two node records share an ID
    #[error("duplicate node ID {0} in document")]
    DuplicateId(NodeId),
}
