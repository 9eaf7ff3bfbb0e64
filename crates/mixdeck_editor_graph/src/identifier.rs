// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node and port identifiers.
//!
//! Ports have no identity of their own; anywhere a port must be addressed
//! outside of in-memory references (connections, serialized documents, undo
//! payloads) the textual form `"<nodeId>.<portName>"` is used instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NodeId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Uuid parsing accepts either case, so id matching stays
        // case-insensitive like the rest of the identifier scheme.
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdentifierError::InvalidNodeId(s.to_string()))
    }
}

/// Address of a single port: the owning node's ID plus the port name.
///
/// The textual form is `"<nodeId>.<portName>"`, split on the first `.`.
/// Node IDs are UUIDs and never contain the separator; port names must not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortRef {
    /// Owning node
    pub node: NodeId,
    /// Port name on that node
    pub port: String,
}

impl PortRef {
    /// Create a port reference
    pub fn new(node: NodeId, port: impl Into<String>) -> Self {
        Self {
            node,
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

impl FromStr for PortRef {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (node, port) = s
            .split_once('.')
            .ok_or_else(|| IdentifierError::MissingSeparator(s.to_string()))?;

        Ok(Self {
            node: node.parse()?,
            port: port.to_string(),
        })
    }
}

impl Serialize for PortRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PortRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error parsing a textual identifier
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentifierError {
    /// The `.` separator between node ID and port name is missing
    #[error("malformed identifier `{0}`: missing `.` separator")]
    MissingSeparator(String),

    /// The node half is not a valid UUID
    #[error("malformed identifier: `{0}` is not a valid node ID")]
    InvalidNodeId(String),
}
