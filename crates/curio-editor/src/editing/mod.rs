//! # Editing Core
//!
//! The editor buffer and everything that mutates it.
//!
//! ## Architecture
//!
//! - **Single source of truth**: the entire draft lives in one
//!   `xi_rope::Rope` buffer; every edit compiles to a `Delta` and applies
//!   atomically ([`buffer`]).
//! - **Command-based editing**: the toolbar's formatting actions are a
//!   [`Cmd`](commands::Cmd) enum; each command computes its edit and the
//!   selection the user ends up with ([`commands`]).
//! - **Linear undo/redo**: full-buffer snapshots on a bounded stack,
//!   checkpointed after a quiet period rather than per keystroke
//!   ([`history`]).
//! - **Deferred actions as owned deadlines**: the debounced checkpoint and
//!   the mention dropdown's blur-close are [`Debounce`](debounce::Debounce)
//!   values their owner arms, cancels and polls explicitly ([`debounce`]).

pub mod buffer;
pub mod commands;
pub mod debounce;
pub mod history;

pub use buffer::EditorBuffer;
pub use commands::{Cmd, EditorAction};
pub use debounce::Debounce;
pub use history::History;
