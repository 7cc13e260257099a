use serde::Serialize;

use crate::annotate::Segment;

/// Column alignment for table cells, as written in the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAlignment {
    Default,
    Left,
    Center,
    Right,
}

/// One block-level node of the render tree.
///
/// The tree is what a host UI walks to produce DOM (or any other surface).
/// It carries no callbacks; clickable behavior comes from the [`Segment`]s
/// at the text leaves (see [`Segment::activation`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        content: Vec<Inline>,
    },
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    List {
        ordered: bool,
        start: u64,
        items: Vec<Vec<Block>>,
    },
    BlockQuote {
        blocks: Vec<Block>,
    },
    Table {
        alignments: Vec<ColumnAlignment>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Rule,
    /// Sanitized raw HTML, kept as inert text (never re-emitted as markup).
    Html {
        content: String,
    },
}

/// One inline node of the render tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    /// A tokenized text leaf. Every piece of plain text in the document goes
    /// through the segment tokenizer, so hashtags and mentions are clickable
    /// in paragraph bodies, headings, list items, table cells, blockquotes,
    /// and emphasis content alike.
    Segments { segments: Vec<Segment> },
    Emphasis { children: Vec<Inline> },
    Strong { children: Vec<Inline> },
    Strikethrough { children: Vec<Inline> },
    /// A code span. Raw zone: its content is never tokenized.
    Code { code: String },
    /// `external` links (absolute http/https targets) are rendered by the
    /// host in a new context with no-opener/no-referrer semantics.
    Link {
        href: String,
        external: bool,
        children: Vec<Inline>,
    },
    /// Rendered bounded-height and lazy-loaded by the host; clicking opens
    /// the zoom overlay (see [`ImageViewer`](crate::render::ImageViewer)).
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    HardBreak,
}

impl Inline {
    /// Plain-text projection of this inline, markers reinserted for token
    /// segments.
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Segments { segments } => segments.iter().map(Segment::source_text).collect(),
            Inline::Emphasis { children }
            | Inline::Strong { children }
            | Inline::Strikethrough { children }
            | Inline::Link { children, .. } => children.iter().map(Inline::plain_text).collect(),
            Inline::Code { code } => code.clone(),
            Inline::Image { alt, .. } => alt.clone(),
            Inline::HardBreak => "\n".to_string(),
        }
    }
}
