//! # Segment Tokenization
//!
//! Scans raw text left to right and emits an ordered sequence of
//! plain-text/hashtag/mention segments.
//!
//! ## Boundary rule
//!
//! A `#` or `@` token is only recognized at the start of the string or
//! immediately after whitespace. A marker embedded mid-word (`foo@bar`)
//! stays plain text. The whitespace that separates a token from the text
//! before it is bucketed into the preceding text segment, so concatenating
//! [`Segment::source_text`] over a tokenize result reproduces the input
//! exactly.
//!
//! ## Validity
//!
//! Hashtags are open vocabulary and always valid. Mentions are valid only
//! when the captured username resolves (case-insensitively) against the
//! supplied [`UserDirectory`](crate::UserDirectory); invalid mentions are
//! still emitted as mention segments so the literal `@name` text survives,
//! they just carry `is_valid: false` and never activate.
//!
//! ## Modules
//!
//! - **`types`**: `Segment` enum and `Activation` mapping for click handling
//! - **`kinds`**: marker and word-character knowledge owned by token types
//! - **`tokenizer`**: `tokenize()` entry point

pub mod kinds;
pub mod tokenizer;
pub mod types;

pub use tokenizer::tokenize;
pub use types::{Activation, Segment};
