//! # curio-editor
//!
//! The write side of the Curio annotation core: a plain-text editing buffer
//! with the toolbar's formatting commands, a bounded undo/redo history with
//! debounced checkpointing, and the mention-autocomplete engine (trigger
//! tracking, candidate navigation, dropdown placement math).
//!
//! Everything here is synchronous and host-driven. The host UI feeds in
//! keystrokes, cursor positions, element geometry and clock readings; the
//! library hands back buffer states, dropdown state and screen coordinates.
//! The only deferred actions (the history checkpoint and the dropdown's
//! blur-close grace) are cancellable single-shot deadlines the host polls,
//! so a stale timer can never mutate state its owner already left.

pub mod editing;
pub mod mention;

// Re-export key types for easier usage
pub use editing::buffer::EditorBuffer;
pub use editing::commands::{Cmd, EditorAction, apply, resolve_shortcut};
pub use editing::history::History;
pub use mention::geometry::{
    DropdownSize, Point, SurfaceMetrics, ViewportSize, caret_anchor, clamp_to_viewport,
};
pub use mention::state::{MentionCommit, MentionTracker};
