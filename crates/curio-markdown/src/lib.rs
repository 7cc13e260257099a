//! # curio-markdown
//!
//! The read side of the Curio annotation core: classify free text into
//! hashtag/mention/plain segments and expand whole markdown documents into a
//! renderable tree whose every text leaf has been through that classification.
//!
//! The crate is a pure in-memory library. It performs no I/O of its own; the
//! host page fetches the mentionable-user list from the document store and
//! hands it in as a [`UserDirectory`], and wires segment activations to its
//! own router.

pub mod annotate;
pub mod directory;
pub mod render;

// Re-export key types for easier usage
pub use annotate::{Activation, Segment, tokenize};
pub use directory::{DirectoryError, MAX_SUGGESTIONS, MentionCandidate, UserDirectory};
pub use render::{Block, ColumnAlignment, ImageStatus, ImageViewer, Inline, render_markdown};
