// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph core for Mixdeck Editor.
//!
//! This crate is the data-model half of the audio-mixing graph editor:
//! - Typed nodes built from statically-declared port schemas
//! - Directed, type-checked connections with a single writer per input
//! - Textual port identifiers for serialization and undo bookkeeping
//! - JSON document round-tripping through a session-scoped type registry
//! - Clipboard subgraph capture and identifier regeneration
//!
//! Everything here is synchronous and in-memory; file I/O, painting, and
//! gesture handling belong to the host editor shell.

pub mod clipboard;
pub mod connection;
pub mod document;
pub mod graph;
pub mod graphs;
pub mod identifier;
pub mod node;
pub mod schema;

pub use connection::Connection;
pub use document::{deserialize_graph, serialize_graph, DocumentError};
pub use graph::{ConnectError, ConnectOutcome, Graph, GraphError};
pub use identifier::{IdentifierError, NodeId, PortRef};
pub use node::{Node, Port, ValueError};
pub use schema::{DataType, NodeRegistry, NodeSchema, PortRole, PortSpec, PropertySpec, Value};
