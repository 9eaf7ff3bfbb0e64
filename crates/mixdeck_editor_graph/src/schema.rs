// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node type schemas and the session-scoped type registry.
//!
//! Port sets are declared statically per node type as an ordered table of
//! `(name, data type, role)` rows. A node instance never invents ports of
//! its own; it materializes whatever its schema declares.

use crate::node::Node;
use serde::{Deserialize, Serialize};

/// Data type carried by a port. Connections require exact equality;
/// there are no implicit conversions between types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Audio stream
    Audio,
    /// Floating point value
    Float,
    /// Integer value
    Int,
    /// Boolean value
    Bool,
    /// 3D vector
    Vec3,
    /// Text value
    Text,
}

impl DataType {
    /// Human-readable type name, shown on port handles
    pub fn label(&self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::Float => "Float",
            Self::Int => "Integer",
            Self::Bool => "Boolean",
            Self::Vec3 => "Vector3",
            Self::Text => "Text",
        }
    }

    /// Single-letter glyph drawn inside the port handle
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Audio => "a",
            Self::Float => "f",
            Self::Int => "i",
            Self::Bool => "b",
            Self::Vec3 => "v",
            Self::Text => "t",
        }
    }

    /// Handle color for this type (for the view layer)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Audio => [157, 194, 213],
            Self::Float => [190, 147, 99],
            Self::Int => [130, 186, 109],
            Self::Bool => [180, 157, 201],
            Self::Vec3 => [255, 240, 138],
            Self::Text => [221, 221, 221],
        }
    }
}

/// Value stored on a constant output or schema-declared property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Floating point value
    Float(f32),
    /// Integer value
    Int(i32),
    /// Boolean value
    Bool(bool),
    /// 3D vector
    Vec3([f32; 3]),
    /// Text value
    Text(String),
}

impl Value {
    /// The data type this value satisfies
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Float(_) => DataType::Float,
            Self::Int(_) => DataType::Int,
            Self::Bool(_) => DataType::Bool,
            Self::Vec3(_) => DataType::Vec3,
            Self::Text(_) => DataType::Text,
        }
    }
}

/// Role of a port within its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortRole {
    /// Consumes a value from a driving connection
    Input,
    /// Produces a value, fanning out to any number of connections
    Output,
    /// An output with an editable value and no upstream requirement
    Constant,
}

/// One row of a node type's port table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortSpec {
    /// Port name, unique within the schema
    pub name: String,
    /// Data type flowing through the port
    pub data_type: DataType,
    /// Input, output, or constant output
    pub role: PortRole,
    /// Editable default, present on constants
    pub default: Option<Value>,
}

impl PortSpec {
    /// Declare an input port
    pub fn input(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            role: PortRole::Input,
            default: None,
        }
    }

    /// Declare an output port
    pub fn output(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            role: PortRole::Output,
            default: None,
        }
    }

    /// Declare a constant output port with its editable default
    pub fn constant(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            data_type: default.data_type(),
            role: PortRole::Constant,
            default: Some(default),
        }
    }

    /// Whether this row describes an output (constants included)
    pub fn is_output(&self) -> bool {
        matches!(self.role, PortRole::Output | PortRole::Constant)
    }
}

/// A schema-declared property: an editable field on the node that is not a
/// port (e.g. a track's source file path). Properties are serialized with
/// the node but never participate in connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Property name, unique within the schema
    pub name: String,
    /// Default value; also fixes the property's data type
    pub default: Value,
}

impl PropertySpec {
    /// Declare a property
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// Node type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSchema {
    /// Unique type tag, the dispatch key for serialization
    pub id: String,
    /// Display name
    pub name: String,
    /// Description for menus and tooltips
    pub description: String,
    /// Menu group
    pub group: String,
    /// Ordered port table
    pub ports: Vec<PortSpec>,
    /// Non-port editable fields
    pub properties: Vec<PropertySpec>,
}

impl NodeSchema {
    /// Create a schema with an empty port table
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            group: group.into(),
            ports: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Append a port row
    pub fn with_port(mut self, port: PortSpec) -> Self {
        self.ports.push(port);
        self
    }

    /// Append a property
    pub fn with_property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    /// Input rows, in declaration order
    pub fn inputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports.iter().filter(|p| p.role == PortRole::Input)
    }

    /// Output rows (constants included), in declaration order
    pub fn outputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports.iter().filter(|p| p.is_output())
    }

    /// Look up any port row by exact name
    pub fn port(&self, name: &str) -> Option<&PortSpec> {
        self.ports.iter().find(|p| p.name == name)
    }
}

/// Registry of available node types.
///
/// Owned by the application session and handed to the serializer
/// explicitly; there is no process-wide registry.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    types: indexmap::IndexMap<String, NodeSchema>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type, replacing any earlier schema with the same ID
    pub fn register(&mut self, schema: NodeSchema) {
        self.types.insert(schema.id.clone(), schema);
    }

    /// Get a schema by type ID
    pub fn get(&self, id: &str) -> Option<&NodeSchema> {
        self.types.get(id)
    }

    /// All registered schemas
    pub fn schemas(&self) -> impl Iterator<Item = &NodeSchema> {
        self.types.values()
    }

    /// Schemas belonging to a menu group
    pub fn schemas_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a NodeSchema> {
        self.types.values().filter(move |s| s.group == group)
    }

    /// Instantiate a node from a type ID
    pub fn create_node(&self, id: &str) -> Option<Node> {
        self.get(id).map(Node::from_schema)
    }
}
