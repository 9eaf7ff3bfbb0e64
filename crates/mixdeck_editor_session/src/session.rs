// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-document editing session.
//!
//! The session is the single entry point the view layer drives: it owns the
//! live graph, the node-type registry, the selection, the undo history, and
//! the clipboard buffer, and it notifies subscribers after every structural
//! or selection mutation so views can re-render.

use crate::change::GraphChange;
use crate::history::History;
use mixdeck_editor_graph::clipboard::{copy_subgraph, offset_to, regenerate_ids};
use mixdeck_editor_graph::{
    deserialize_graph, serialize_graph, ConnectError, ConnectOutcome, Connection, DocumentError,
    Graph, GraphError, Node, NodeId, NodeRegistry, PortRef, Value, ValueError,
};

/// Notification sent to session subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Nodes or connections changed; views should re-layout
    GraphChanged,
    /// The selected node set changed
    SelectionChanged,
}

/// Selection mode for multi-select operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Replace current selection
    #[default]
    Set,
    /// Add to current selection (Shift+Click)
    Add,
    /// Remove from current selection (Ctrl+Click)
    Remove,
    /// Toggle in current selection (Ctrl+Shift+Click)
    Toggle,
}

/// Ordered set of selected node IDs
#[derive(Debug, Clone, Default)]
pub struct Selection {
    nodes: Vec<NodeId>,
}

impl Selection {
    /// Selected IDs, in selection order
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Whether a node is selected
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Whether the selection is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn set(&mut self, ids: &[NodeId]) -> bool {
        let mut next = Vec::new();
        for id in ids {
            if !next.contains(id) {
                next.push(*id);
            }
        }
        let changed = next != self.nodes;
        self.nodes = next;
        changed
    }

    fn apply(&mut self, ids: &[NodeId], mode: SelectMode) -> bool {
        match mode {
            SelectMode::Set => self.set(ids),
            SelectMode::Add => {
                let mut changed = false;
                for id in ids {
                    if !self.nodes.contains(id) {
                        self.nodes.push(*id);
                        changed = true;
                    }
                }
                changed
            }
            SelectMode::Remove => self.remove_ids(ids),
            SelectMode::Toggle => {
                for id in ids {
                    if let Some(index) = self.nodes.iter().position(|n| n == id) {
                        self.nodes.remove(index);
                    } else {
                        self.nodes.push(*id);
                    }
                }
                !ids.is_empty()
            }
        }
    }

    fn remove_ids(&mut self, ids: &[NodeId]) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| !ids.contains(n));
        self.nodes.len() != before
    }

    fn clear(&mut self) -> bool {
        let changed = !self.nodes.is_empty();
        self.nodes.clear();
        changed
    }
}

type Subscriber = Box<dyn FnMut(SessionEvent)>;

/// One open document: the live graph plus all editing state around it
pub struct Session {
    graph: Graph,
    registry: NodeRegistry,
    selection: Selection,
    history: History,
    clipboard: Option<String>,
    dirty: bool,
    view_center: [f32; 2],
    subscribers: Vec<Subscriber>,
}

impl Session {
    /// Create an empty session over a node-type registry
    pub fn new(registry: NodeRegistry) -> Self {
        Self {
            graph: Graph::new(),
            registry,
            selection: Selection::default(),
            history: History::new(),
            clipboard: None,
            dirty: false,
            view_center: [0.0, 0.0],
            subscribers: Vec::new(),
        }
    }

    /// The live graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The node-type registry backing this session
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Register a notification callback
    pub fn subscribe(&mut self, subscriber: impl FnMut(SessionEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    // ------------------------------------------------------------------
    // Structural mutations
    // ------------------------------------------------------------------

    /// Instantiate a node type at a position, recording one creation
    pub fn create_node(
        &mut self,
        schema_id: &str,
        position: [f32; 2],
    ) -> Result<NodeId, SessionError> {
        let schema = self
            .registry
            .get(schema_id)
            .ok_or_else(|| SessionError::UnknownNodeType(schema_id.to_string()))?;

        let node = Node::from_schema(schema).with_position(position[0], position[1]);
        let label = format!("Create {}", schema.name);

        let mut payload = Graph::new();
        let _ = payload.add_node(node.clone());
        let id = self.graph.add_node(node)?;

        self.history.record(GraphChange::creation(label, payload));
        tracing::info!(node = %id, node_type = schema_id, "created node");
        self.touch();
        Ok(id)
    }

    /// Delete a set of nodes and every connection touching them, as one
    /// atomically undoable deletion. Unknown IDs are ignored.
    pub fn delete_nodes(&mut self, ids: &[NodeId]) -> usize {
        let present: Vec<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| self.graph.contains_node(*id))
            .collect();
        if present.is_empty() {
            return 0;
        }

        // The payload carries the nodes, their interior connections, and
        // the boundary connections to surviving neighbors.
        let mut payload = copy_subgraph(&self.graph, &present);
        let involved: Vec<Connection> = self
            .graph
            .connections()
            .filter(|c| present.iter().any(|id| c.involves_node(*id)))
            .cloned()
            .collect();
        for connection in &involved {
            let interior = payload.contains_node(connection.from.node)
                && payload.contains_node(connection.to.node);
            if !interior {
                payload.push_connection(connection.clone());
            }
        }

        // Connections first, then nodes.
        for connection in &involved {
            self.graph.disconnect(&connection.from, &connection.to);
        }
        for id in &present {
            self.graph.remove_node(*id);
        }

        let label = if present.len() == 1 {
            "Delete Node"
        } else {
            "Delete Selection"
        };
        self.history.record(GraphChange::deletion(label, payload));
        tracing::info!(count = present.len(), "deleted nodes");

        if self.selection.remove_ids(&present) {
            self.emit(SessionEvent::SelectionChanged);
        }
        self.touch();
        present.len()
    }

    /// Delete the current selection as one undoable gesture
    pub fn delete_selection(&mut self) -> usize {
        let ids = self.selection.as_slice().to_vec();
        self.delete_nodes(&ids)
    }

    /// Connect an output port to an input port, recording the creation
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Result<ConnectOutcome, ConnectError> {
        let outcome = self.graph.connect(from.clone(), to.clone())?;

        if outcome == ConnectOutcome::New {
            let mut payload = Graph::new();
            payload.push_connection(Connection::new(from, to));
            self.history.record(GraphChange::creation("Connect", payload));
            self.touch();
        }

        Ok(outcome)
    }

    /// Remove a connection, recording the deletion; `false` if absent
    pub fn disconnect(&mut self, from: &PortRef, to: &PortRef) -> bool {
        if !self.graph.disconnect(from, to) {
            return false;
        }

        let mut payload = Graph::new();
        payload.push_connection(Connection::new(from.clone(), to.clone()));
        self.history.record(GraphChange::deletion("Disconnect", payload));
        self.touch();
        true
    }

    /// Move a node; layout only, so the move is not undo-recorded
    pub fn move_node(&mut self, id: NodeId, position: [f32; 2]) -> bool {
        let Some(node) = self.graph.node_mut(id) else {
            return false;
        };
        node.position = position;
        self.touch();
        true
    }

    /// Write a constant port or property value on a node
    pub fn set_node_value(
        &mut self,
        id: NodeId,
        name: &str,
        value: Value,
    ) -> Result<(), SessionError> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or(SessionError::UnknownNode(id))?;
        node.set_value(name, value)?;
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Undo the most recent change; no-op on an empty stack
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.graph) {
            return false;
        }
        self.touch();
        true
    }

    /// Redo the most recently undone change; no-op on an empty stack
    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.graph) {
            return false;
        }
        self.touch();
        true
    }

    /// Whether undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Label for the Edit > Undo menu entry
    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    /// Label for the Edit > Redo menu entry
    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Copy the selection (and its interior connections) to the clipboard.
    ///
    /// Returns whether anything was copied.
    pub fn copy_selection(&mut self) -> Result<bool, DocumentError> {
        if self.selection.is_empty() {
            return Ok(false);
        }

        let subgraph = copy_subgraph(&self.graph, self.selection.as_slice());
        self.clipboard = Some(serialize_graph(&subgraph)?);
        Ok(true)
    }

    /// Copy the selection, then delete it as one undoable gesture
    pub fn cut_selection(&mut self) -> Result<bool, DocumentError> {
        if !self.copy_selection()? {
            return Ok(false);
        }
        self.delete_selection();
        Ok(true)
    }

    /// Paste at the last-known view center
    pub fn paste(&mut self) -> Result<Vec<NodeId>, SessionError> {
        self.paste_at(self.view_center)
    }

    /// Paste the clipboard centered on a target point.
    ///
    /// Every pasted node gets a fresh ID (connections rewritten to match),
    /// the whole insertion is recorded as one creation, and the pasted
    /// nodes become the new selection.
    pub fn paste_at(&mut self, target: [f32; 2]) -> Result<Vec<NodeId>, SessionError> {
        let Some(text) = self.clipboard.clone() else {
            return Ok(Vec::new());
        };

        let mut pasted = regenerate_ids(&deserialize_graph(&text, &self.registry)?);
        offset_to(&mut pasted, target);

        let inserted: Vec<NodeId> = pasted.node_ids().collect();
        if inserted.is_empty() {
            return Ok(inserted);
        }

        for node in pasted.nodes() {
            if let Err(error) = self.graph.add_node(node.clone()) {
                tracing::warn!(%error, "paste: skipping node");
            }
        }
        for connection in pasted.connections() {
            if let Err(error) = self
                .graph
                .connect(connection.from.clone(), connection.to.clone())
            {
                tracing::warn!(%error, "paste: skipping connection");
            }
        }

        self.history.record(GraphChange::creation("Paste", pasted));
        tracing::info!(count = inserted.len(), "pasted nodes");

        if self.selection.set(&inserted) {
            self.emit(SessionEvent::SelectionChanged);
        }
        self.touch();
        Ok(inserted)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Update the selection
    pub fn select(&mut self, ids: &[NodeId], mode: SelectMode) {
        if self.selection.apply(ids, mode) {
            self.emit(SessionEvent::SelectionChanged);
        }
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.emit(SessionEvent::SelectionChanged);
        }
    }

    /// Selected node IDs, in selection order
    pub fn selection(&self) -> &[NodeId] {
        self.selection.as_slice()
    }

    /// Whether any node is selected
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Serialize the live graph to document text
    pub fn serialize(&self) -> Result<String, DocumentError> {
        serialize_graph(&self.graph)
    }

    /// Replace the live graph with a loaded document, clearing the
    /// selection, the history, and the dirty flag
    pub fn load(&mut self, text: &str) -> Result<(), DocumentError> {
        self.graph = deserialize_graph(text, &self.registry)?;
        self.selection.clear();
        self.history.clear();
        self.dirty = false;

        tracing::info!(nodes = self.graph.node_count(), "loaded document");
        self.emit(SessionEvent::SelectionChanged);
        self.emit(SessionEvent::GraphChanged);
        Ok(())
    }

    /// Whether the document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the host wrote the document out
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Record the visible-area center, the fallback paste target
    pub fn set_view_center(&mut self, center: [f32; 2]) {
        self.view_center = center;
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.emit(SessionEvent::GraphChanged);
    }

    fn emit(&mut self, event: SessionEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}

/// Error performing a session operation
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The node type tag is not present in the registry
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    /// No node with this ID in the live graph
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Graph-level failure
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Document (clipboard) failure
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Value write failure
    #[error(transparent)]
    Value(#[from] ValueError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixdeck_editor_graph::graphs::mix::create_mix_registry;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn session() -> Session {
        Session::new(create_mix_registry())
    }

    fn connected_pair(session: &mut Session) -> (NodeId, NodeId) {
        let track = session.create_node("track", [0.0, 0.0]).unwrap();
        let output = session.create_node("output", [200.0, 0.0]).unwrap();
        session
            .connect(PortRef::new(track, "Output"), PortRef::new(output, "Input"))
            .unwrap();
        (track, output)
    }

    #[test]
    fn test_create_undo_redo_preserves_identity() {
        let mut session = session();
        let id = session.create_node("track", [10.0, 10.0]).unwrap();

        assert!(session.undo());
        assert!(!session.graph().contains_node(id));

        assert!(session.redo());
        assert!(session.graph().contains_node(id));
        assert_eq!(session.graph().node(id).unwrap().position, [10.0, 10.0]);
    }

    #[test]
    fn test_unknown_node_type_is_rejected() {
        let mut session = session();
        assert!(matches!(
            session.create_node("reverb", [0.0, 0.0]),
            Err(SessionError::UnknownNodeType(_))
        ));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_connection_undo_redo() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);
        assert_eq!(session.graph().connection_count(), 1);

        // Undo removes the connection but leaves both nodes.
        assert!(session.undo());
        assert_eq!(session.graph().connection_count(), 0);
        assert!(session.graph().contains_node(track));
        assert!(session.graph().contains_node(output));

        assert!(session.redo());
        assert_eq!(session.graph().connection_count(), 1);
    }

    #[test]
    fn test_duplicate_connect_records_nothing() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);

        let outcome = session
            .connect(PortRef::new(track, "Output"), PortRef::new(output, "Input"))
            .unwrap();
        assert_eq!(outcome, ConnectOutcome::AlreadyConnected);

        // Still exactly three undoable steps: create, create, connect.
        let mut undone = 0;
        while session.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
    }

    #[test]
    fn test_delete_selection_is_one_undoable_gesture() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);

        // A surviving neighbor driven by the same track.
        let outside = session.create_node("output", [400.0, 0.0]).unwrap();
        session
            .connect(PortRef::new(track, "Output"), PortRef::new(outside, "Input"))
            .unwrap();

        session.select(&[track, output], SelectMode::Set);
        assert_eq!(session.delete_selection(), 2);
        assert_eq!(session.graph().node_count(), 1);
        assert_eq!(session.graph().connection_count(), 0);
        assert!(!session.has_selection());

        // One undo restores both nodes, the interior connection, and the
        // boundary connection to the surviving node.
        assert!(session.undo());
        assert_eq!(session.graph().node_count(), 3);
        assert_eq!(session.graph().connection_count(), 2);
        assert!(session.graph().contains_node(track));
        assert!(session.graph().contains_node(output));
    }

    #[test]
    fn test_disconnect_missing_records_nothing() {
        let mut session = session();
        let track = session.create_node("track", [0.0, 0.0]).unwrap();
        let output = session.create_node("output", [200.0, 0.0]).unwrap();

        let from = PortRef::new(track, "Output");
        let to = PortRef::new(output, "Input");
        assert!(!session.disconnect(&from, &to));
        assert_eq!(session.undo_description(), Some("Create Output"));
    }

    #[test]
    fn test_copy_paste_twice_never_collides() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);
        let originals: HashSet<NodeId> = [track, output].into();

        session.select(&[track, output], SelectMode::Set);
        assert!(session.copy_selection().unwrap());

        let first = session.paste_at([500.0, 0.0]).unwrap();
        let second = session.paste_at([500.0, 300.0]).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);

        // Four distinct fresh IDs, none equal to the originals.
        let mut pasted: HashSet<NodeId> = HashSet::new();
        for id in first.iter().chain(second.iter()) {
            assert!(pasted.insert(*id));
            assert!(!originals.contains(id));
        }

        // Each pasted pair is connected to itself and not to the originals.
        assert_eq!(session.graph().connection_count(), 3);
        for batch in [&first, &second] {
            let members: HashSet<NodeId> = batch.iter().copied().collect();
            let interior = session
                .graph()
                .connections()
                .filter(|c| members.contains(&c.from.node) && members.contains(&c.to.node))
                .count();
            assert_eq!(interior, 1);
        }

        // The second paste became the selection.
        assert_eq!(session.selection(), second.as_slice());
    }

    #[test]
    fn test_paste_is_one_undoable_creation() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);

        session.select(&[track, output], SelectMode::Set);
        session.copy_selection().unwrap();
        session.paste_at([500.0, 0.0]).unwrap();

        assert_eq!(session.undo_description(), Some("Paste"));
        assert!(session.undo());
        assert_eq!(session.graph().node_count(), 2);
        assert_eq!(session.graph().connection_count(), 1);
    }

    #[test]
    fn test_paste_lands_on_target_center() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);

        session.select(&[track, output], SelectMode::Set);
        session.copy_selection().unwrap();
        let pasted = session.paste_at([1000.0, 400.0]).unwrap();

        assert_eq!(session.graph().bounding_center(&pasted), Some([1000.0, 400.0]));
    }

    #[test]
    fn test_paste_with_empty_clipboard_is_noop() {
        let mut session = session();
        assert!(session.paste().unwrap().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_cut_then_paste_round_trips_subgraph() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);

        session.select(&[track, output], SelectMode::Set);
        assert!(session.cut_selection().unwrap());
        assert_eq!(session.graph().node_count(), 0);

        let pasted = session.paste_at([0.0, 0.0]).unwrap();
        assert_eq!(pasted.len(), 2);
        assert_eq!(session.graph().connection_count(), 1);
        // Fresh identities even though the originals are gone.
        assert!(!pasted.contains(&track));
        assert!(!pasted.contains(&output));
    }

    #[test]
    fn test_events_are_emitted() {
        let events: Rc<RefCell<Vec<SessionEvent>>> = Rc::default();
        let sink = Rc::clone(&events);

        let mut session = session();
        session.subscribe(move |event| sink.borrow_mut().push(event));

        let id = session.create_node("track", [0.0, 0.0]).unwrap();
        session.select(&[id], SelectMode::Set);

        let seen = events.borrow().clone();
        assert_eq!(
            seen,
            vec![SessionEvent::GraphChanged, SessionEvent::SelectionChanged]
        );
    }

    #[test]
    fn test_selection_modes() {
        let mut session = session();
        let a = session.create_node("track", [0.0, 0.0]).unwrap();
        let b = session.create_node("output", [0.0, 0.0]).unwrap();

        session.select(&[a], SelectMode::Set);
        session.select(&[b], SelectMode::Add);
        assert_eq!(session.selection(), &[a, b]);

        session.select(&[a], SelectMode::Remove);
        assert_eq!(session.selection(), &[b]);

        session.select(&[a, b], SelectMode::Toggle);
        assert_eq!(session.selection(), &[a]);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut session = session();
        assert!(!session.is_dirty());

        session.create_node("track", [0.0, 0.0]).unwrap();
        assert!(session.is_dirty());

        session.mark_saved();
        assert!(!session.is_dirty());

        session.undo();
        assert!(session.is_dirty());
    }

    #[test]
    fn test_moves_touch_but_are_not_undoable() {
        let mut session = session();
        let id = session.create_node("track", [0.0, 0.0]).unwrap();
        session.mark_saved();
        session.undo(); // consume the creation record
        session.redo();

        assert!(session.move_node(id, [50.0, 60.0]));
        assert!(session.is_dirty());
        assert_eq!(session.undo_description(), Some("Create Track"));
    }

    #[test]
    fn test_load_resets_session_state() {
        let mut session = session();
        let (track, output) = connected_pair(&mut session);
        session.select(&[track], SelectMode::Set);
        let text = session.serialize().unwrap();

        let mut fresh = Session::new(create_mix_registry());
        fresh.create_node("float_constant", [0.0, 0.0]).unwrap();
        fresh.load(&text).unwrap();

        assert_eq!(fresh.graph().node_count(), 2);
        assert!(fresh.graph().contains_node(track));
        assert!(fresh.graph().contains_node(output));
        assert!(!fresh.can_undo());
        assert!(!fresh.has_selection());
        assert!(!fresh.is_dirty());
    }

    #[test]
    fn test_set_node_value_validates() {
        let mut session = session();
        let id = session.create_node("float_constant", [0.0, 0.0]).unwrap();

        session.set_node_value(id, "Value", Value::Float(0.5)).unwrap();
        assert_eq!(
            session.graph().node(id).unwrap().value("Value"),
            Some(&Value::Float(0.5))
        );

        assert!(matches!(
            session.set_node_value(id, "Value", Value::Bool(true)),
            Err(SessionError::Value(_))
        ));
        assert!(matches!(
            session.set_node_value(NodeId::new(), "Value", Value::Float(1.0)),
            Err(SessionError::UnknownNode(_))
        ));
    }
}
