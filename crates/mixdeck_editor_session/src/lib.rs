// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session for Mixdeck Editor.
//!
//! Wraps a live [`mixdeck_editor_graph::Graph`] with everything one open
//! document needs beyond the data model itself:
//! - Snapshot-free undo/redo built from creation/deletion graph deltas
//! - Selection state with the usual multi-select modes
//! - Clipboard capture with identifier regeneration on paste
//! - Dirty tracking and change notifications for the host editor shell
//!
//! The session is single-threaded and synchronous; the host drives it from
//! its UI thread and re-renders on the emitted events.

pub mod change;
pub mod history;
pub mod session;

pub use change::{ChangeKind, GraphChange};
pub use history::History;
pub use session::{SelectMode, Selection, Session, SessionError, SessionEvent};
