use serde::Serialize;

use super::kinds::{Hashtag, Mention};

/// One classified span of text.
///
/// Produced fresh on every parse and never persisted. The `tag`/`username`
/// fields hold the captured word *without* its `#`/`@` marker;
/// [`Segment::source_text`] reinserts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text between tokens, including any whitespace that separated a
    /// token from the text before it.
    Text { content: String },
    /// A `#tag` token. Hashtags are open vocabulary, so there is no validity
    /// flag; every hashtag is clickable.
    Hashtag { tag: String },
    /// An `@username` token. Invalid mentions render as inert text but keep
    /// their literal content.
    Mention { username: String, is_valid: bool },
}

/// What clicking a segment should do. The host wires these to its router:
/// hashtags go to a tag-filtered search view, mentions to a profile view
/// keyed by username (not by store-internal user id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    SearchTag { tag: String },
    Profile { username: String },
}

impl Segment {
    /// The exact source characters this segment was scanned from, marker
    /// included.
    pub fn source_text(&self) -> String {
        match self {
            Segment::Text { content } => content.clone(),
            Segment::Hashtag { tag } => format!("{}{tag}", Hashtag::MARKER),
            Segment::Mention { username, .. } => format!("{}{username}", Mention::MARKER),
        }
    }

    /// The activation a click on this segment triggers, if any. Plain text
    /// and invalid mentions are inert.
    pub fn activation(&self) -> Option<Activation> {
        match self {
            Segment::Text { .. } => None,
            Segment::Hashtag { tag } => Some(Activation::SearchTag { tag: tag.clone() }),
            Segment::Mention { username, is_valid } => is_valid.then(|| Activation::Profile {
                username: username.clone(),
            }),
        }
    }
}

/// Reconstructs the source string from a tokenize result.
pub fn source_of(segments: &[Segment]) -> String {
    segments.iter().map(Segment::source_text).collect()
}
