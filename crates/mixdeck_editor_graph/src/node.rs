// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node instances.

use crate::identifier::NodeId;
use crate::schema::{DataType, NodeSchema, PortRole, Value};
use indexmap::IndexMap;

/// A port materialized on a node instance.
///
/// Ports are derived data: they are rebuilt from the node's schema and never
/// stored or addressed independently of their `(node, name)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    /// Port name, unique within the node
    pub name: String,
    /// Data type flowing through the port
    pub data_type: DataType,
    /// Whether this is a constant output (editable value, no upstream)
    pub constant: bool,
}

/// A node instance in the graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID, immutable for the node's lifetime
    pub id: NodeId,
    /// Schema (type) tag this node was built from
    pub schema_id: String,
    /// Optional user-given name; nodes may share names freely
    pub name: Option<String>,
    /// Optional free-text comment
    pub comment: Option<String>,
    /// Layout position; not structural
    pub position: [f32; 2],
    /// Current values of constant ports and schema properties, by name
    pub values: IndexMap<String, Value>,
    /// Materialized input ports
    pub inputs: Vec<Port>,
    /// Materialized output ports (constants included)
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a node from its schema: fresh random ID, zeroed position,
    /// port lists materialized from the port table, values seeded from the
    /// constant and property defaults.
    pub fn from_schema(schema: &NodeSchema) -> Self {
        let mut values = IndexMap::new();
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for spec in &schema.ports {
            let port = Port {
                name: spec.name.clone(),
                data_type: spec.data_type,
                constant: spec.role == PortRole::Constant,
            };
            match spec.role {
                PortRole::Input => inputs.push(port),
                PortRole::Output | PortRole::Constant => outputs.push(port),
            }
            if let Some(default) = &spec.default {
                values.insert(spec.name.clone(), default.clone());
            }
        }

        for prop in &schema.properties {
            values.insert(prop.name.clone(), prop.default.clone());
        }

        Self {
            id: NodeId::new(),
            schema_id: schema.id.clone(),
            name: None,
            comment: None,
            position: [0.0, 0.0],
            values,
            inputs,
            outputs,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Case-insensitive ID equality against a textual identifier.
    ///
    /// Connection endpoints arrive as strings; they are matched here rather
    /// than through the graph's internal indexing.
    pub fn is_named(&self, candidate: &str) -> bool {
        candidate
            .parse::<NodeId>()
            .is_ok_and(|id| id == self.id)
    }

    /// Look up an input port by exact name
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Look up an output port by exact name
    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Current value of a constant port or property
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Write a constant port or property value.
    ///
    /// The value's data type must match the type seeded from the schema.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), ValueError> {
        let current = self
            .values
            .get_mut(name)
            .ok_or_else(|| ValueError::Unknown(name.to_string()))?;

        if current.data_type() != value.data_type() {
            return Err(ValueError::TypeMismatch {
                name: name.to_string(),
                expected: current.data_type(),
                found: value.data_type(),
            });
        }

        *current = value;
        Ok(())
    }
}

/// Error writing a node value
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValueError {
    /// No constant port or property with this name
    #[error("node has no value named `{0}`")]
    Unknown(String),

    /// Value type differs from the schema-declared type
    #[error("value `{name}` expects {expected:?}, got {found:?}")]
    TypeMismatch {
        /// Value name
        name: String,
        /// Schema-declared type
        expected: DataType,
        /// Type of the rejected value
        found: DataType,
    },
}
