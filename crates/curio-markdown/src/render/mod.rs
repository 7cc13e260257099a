//! # Annotated Markdown Rendering
//!
//! Turns markdown source into a renderable block tree whose every text leaf
//! has been through the segment tokenizer, so hashtags and mentions stay
//! clickable wherever they appear, not only in top-level paragraphs.
//!
//! ## Modules
//!
//! - **`tree`**: `Block`/`Inline` render-tree types the host UI walks
//! - **`processor`**: `render_markdown()`, the pulldown-cmark event walk
//! - **`sanitize`**: raw-HTML neutralization (script/style stripped, the
//!   rest escaped to inert text)
//! - **`viewer`**: image zoom-overlay state machine and load status
//!
//! The renderer fails soft: malformed markdown renders as whatever the
//! parser makes of it, never an error. There is no incremental re-parse;
//! the whole document is re-rendered per call, which is the correctness-
//! first contract the host expects at this scale.

pub mod processor;
pub mod sanitize;
pub mod tree;
pub mod viewer;

pub use processor::render_markdown;
pub use tree::{Block, ColumnAlignment, Inline};
pub use viewer::{ImageStatus, ImageViewer, LOAD_FAILURE_PLACEHOLDER};
