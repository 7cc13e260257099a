//! Markdown event processing.
//!
//! Expands a markdown document through pulldown-cmark and re-threads every
//! plain-text leaf through the segment tokenizer, producing the [`Block`]
//! tree the host renders. There is exactly one interception point
//! ([`TreeBuilder::flush_text`]): wherever a text leaf appears (paragraph
//! body, heading, list item, table cell, blockquote, emphasis content) it
//! goes through the same tokenize call, so hashtags and mentions stay
//! clickable everywhere.
//!
//! # Event flow
//!
//! pulldown-cmark emits a flat event stream; containers arrive as
//! `Start`/`End` pairs with their children in between, and nested lists
//! appear *inside* their parent item, between the item's own text and the
//! item's `End`. The builder keeps a container stack for open block
//! structure and a wrapper stack for open inline structure, and buckets
//! pending text into whichever is innermost.
//!
//! Raw zones: code fences and code spans collect verbatim text that never
//! reaches the tokenizer. Raw HTML goes through the sanitizer and comes back
//! as inert text or not at all.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::annotate::{Segment, tokenize};
use crate::directory::UserDirectory;

use super::sanitize::sanitize_html;
use super::tree::{Block, ColumnAlignment, Inline};

/// Parses `text` as CommonMark + tables + strikethrough and returns the
/// render tree, with every text leaf tokenized against `directory`.
///
/// Soft line breaks are promoted to hard breaks (the editor treats a
/// newline as a line break, not a join). Malformed markdown cannot fail:
/// whatever the parser yields is rendered, and anything unrecognized
/// degrades to its literal text.
pub fn render_markdown(text: &str, directory: &UserDirectory) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(text, options);

    let mut builder = TreeBuilder::new(directory);
    for event in parser {
        builder.handle_event(event);
    }
    builder.finish()
}

fn is_external_url(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// Open block container on the builder stack.
enum Container {
    BlockQuote {
        blocks: Vec<Block>,
    },
    List {
        ordered: bool,
        start: u64,
        items: Vec<Vec<Block>>,
    },
    Item {
        blocks: Vec<Block>,
    },
    Table {
        alignments: Vec<ColumnAlignment>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
        current_row: Vec<Vec<Inline>>,
        in_head: bool,
    },
}

/// Open inline wrapper (emphasis-family or link).
enum InlineWrap {
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, external: bool },
}

impl InlineWrap {
    fn build(self, children: Vec<Inline>) -> Inline {
        match self {
            InlineWrap::Emphasis => Inline::Emphasis { children },
            InlineWrap::Strong => Inline::Strong { children },
            InlineWrap::Strikethrough => Inline::Strikethrough { children },
            InlineWrap::Link { href, external } => Inline::Link {
                href,
                external,
                children,
            },
        }
    }
}

struct ImageCtx {
    src: String,
    title: Option<String>,
    alt: String,
}

struct CodeCtx {
    language: Option<String>,
    code: String,
}

struct TreeBuilder<'a> {
    directory: &'a UserDirectory,
    /// Completed top-level blocks.
    blocks: Vec<Block>,
    /// Open block containers, innermost last.
    containers: Vec<Container>,
    /// Open inline wrappers, innermost last.
    inline_stack: Vec<(InlineWrap, Vec<Inline>)>,
    /// Finished inlines at the current base level.
    inlines: Vec<Inline>,
    /// Pending plain text, tokenized on flush.
    text_buf: String,
    /// Level of the currently open heading.
    heading_level: Option<u8>,
    /// Alt-text collector while inside an image tag.
    image: Option<ImageCtx>,
    /// Verbatim collector while inside a code fence.
    code: Option<CodeCtx>,
    /// Raw collector while inside an HTML block.
    html: Option<String>,
}

impl<'a> TreeBuilder<'a> {
    fn new(directory: &'a UserDirectory) -> Self {
        Self {
            directory,
            blocks: Vec::new(),
            containers: Vec::new(),
            inline_stack: Vec::new(),
            inlines: Vec::new(),
            text_buf: String::new(),
            heading_level: None,
            image: None,
            code: None,
            html: None,
        }
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => self.add_code_span(&code),
            Event::Html(html) => self.add_raw_html(&html),
            Event::InlineHtml(html) => self.add_inline_html(&html),
            Event::SoftBreak | Event::HardBreak => self.add_line_break(),
            Event::Rule => {
                self.flush_pending_paragraph();
                self.finish_block(Block::Rule);
            }
            // Footnotes, task lists, math and metadata are not enabled;
            // nothing else reaches here.
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        if self.image.is_some() {
            // Inside an image tag only the alt text matters; nested markup
            // is flattened into it by add_text.
            return;
        }
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_pending_paragraph();
                self.heading_level = Some(level as u8);
            }
            Tag::BlockQuote(_) => {
                self.flush_pending_paragraph();
                self.containers
                    .push(Container::BlockQuote { blocks: Vec::new() });
            }
            Tag::List(start) => {
                self.flush_pending_paragraph();
                self.containers.push(Container::List {
                    ordered: start.is_some(),
                    start: start.unwrap_or(1),
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.containers.push(Container::Item { blocks: Vec::new() });
            }
            Tag::CodeBlock(kind) => {
                self.flush_pending_paragraph();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.code = Some(CodeCtx {
                    language,
                    code: String::new(),
                });
            }
            Tag::Table(alignments) => {
                self.flush_pending_paragraph();
                self.containers.push(Container::Table {
                    alignments: alignments.iter().map(|a| column_alignment(*a)).collect(),
                    head: Vec::new(),
                    rows: Vec::new(),
                    current_row: Vec::new(),
                    in_head: false,
                });
            }
            Tag::TableHead => {
                if let Some(Container::Table { in_head, .. }) = self.containers.last_mut() {
                    *in_head = true;
                }
            }
            Tag::TableRow => {}
            Tag::TableCell => {}
            Tag::Emphasis => self.push_wrap(InlineWrap::Emphasis),
            Tag::Strong => self.push_wrap(InlineWrap::Strong),
            Tag::Strikethrough => self.push_wrap(InlineWrap::Strikethrough),
            Tag::Link { dest_url, .. } => {
                let href = dest_url.to_string();
                let external = is_external_url(&href);
                self.push_wrap(InlineWrap::Link { href, external });
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.flush_text();
                self.image = Some(ImageCtx {
                    src: dest_url.to_string(),
                    title: (!title.is_empty()).then(|| title.to_string()),
                    alt: String::new(),
                });
            }
            Tag::HtmlBlock => {
                self.flush_pending_paragraph();
                self.html = Some(String::new());
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if self.image.is_some() && tag != TagEnd::Image {
            return;
        }
        match tag {
            TagEnd::Paragraph => {
                let content = self.take_inlines();
                if !content.is_empty() {
                    self.finish_block(Block::Paragraph { content });
                }
            }
            TagEnd::Heading(_) => {
                let content = self.take_inlines();
                let level = self.heading_level.take().unwrap_or(1);
                self.finish_block(Block::Heading { level, content });
            }
            TagEnd::BlockQuote(_) => {
                self.flush_pending_paragraph();
                if let Some(Container::BlockQuote { blocks }) = self.containers.pop() {
                    self.finish_block(Block::BlockQuote { blocks });
                }
            }
            TagEnd::List(_) => {
                if let Some(Container::List {
                    ordered,
                    start,
                    items,
                }) = self.containers.pop()
                {
                    self.finish_block(Block::List {
                        ordered,
                        start,
                        items,
                    });
                }
            }
            TagEnd::Item => {
                // Tight list items carry bare text; close it off as an
                // implicit paragraph before the item seals.
                self.flush_pending_paragraph();
                if let Some(Container::Item { blocks }) = self.containers.pop() {
                    if let Some(Container::List { items, .. }) = self.containers.last_mut() {
                        items.push(blocks);
                    } else {
                        for block in blocks {
                            self.finish_block(block);
                        }
                    }
                }
            }
            TagEnd::CodeBlock => {
                if let Some(CodeCtx { language, code }) = self.code.take() {
                    self.finish_block(Block::CodeBlock { language, code });
                }
            }
            TagEnd::Table => {
                if let Some(Container::Table {
                    alignments,
                    head,
                    rows,
                    ..
                }) = self.containers.pop()
                {
                    self.finish_block(Block::Table {
                        alignments,
                        head,
                        rows,
                    });
                }
            }
            TagEnd::TableHead => {
                if let Some(Container::Table {
                    head,
                    current_row,
                    in_head,
                    ..
                }) = self.containers.last_mut()
                {
                    *head = std::mem::take(current_row);
                    *in_head = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(Container::Table {
                    rows, current_row, ..
                }) = self.containers.last_mut()
                {
                    rows.push(std::mem::take(current_row));
                }
            }
            TagEnd::TableCell => {
                let cell = self.take_inlines();
                if let Some(Container::Table { current_row, .. }) = self.containers.last_mut() {
                    current_row.push(cell);
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.flush_text();
                if let Some((wrap, children)) = self.inline_stack.pop() {
                    let inline = wrap.build(children);
                    self.push_inline(inline);
                }
            }
            TagEnd::Image => {
                if let Some(ImageCtx { src, title, alt }) = self.image.take() {
                    self.push_inline(Inline::Image { src, alt, title });
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(raw) = self.html.take()
                    && let Some(content) = sanitize_html(&raw)
                {
                    self.finish_block(Block::Html { content });
                }
            }
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.code.push_str(text);
        } else if let Some(html) = &mut self.html {
            html.push_str(text);
        } else if let Some(image) = &mut self.image {
            image.alt.push_str(text);
        } else {
            self.text_buf.push_str(text);
        }
    }

    fn add_code_span(&mut self, code: &str) {
        if let Some(image) = &mut self.image {
            image.alt.push_str(code);
            return;
        }
        self.flush_text();
        self.push_inline(Inline::Code {
            code: code.to_string(),
        });
    }

    fn add_raw_html(&mut self, raw: &str) {
        if let Some(html) = &mut self.html {
            html.push_str(raw);
        } else {
            self.add_inline_html(raw);
        }
    }

    fn add_inline_html(&mut self, raw: &str) {
        // Inline HTML comes back from the sanitizer as inert text; it is
        // deliberately not tokenized (an attribute is not a mention).
        if let Some(content) = sanitize_html(raw) {
            self.flush_text();
            self.push_inline(Inline::Segments {
                segments: vec![Segment::Text { content }],
            });
        }
    }

    fn add_line_break(&mut self) {
        if let Some(code) = &mut self.code {
            code.code.push('\n');
        } else if let Some(image) = &mut self.image {
            image.alt.push(' ');
        } else {
            self.flush_text();
            self.push_inline(Inline::HardBreak);
        }
    }

    fn push_wrap(&mut self, wrap: InlineWrap) {
        self.flush_text();
        self.inline_stack.push((wrap, Vec::new()));
    }

    fn push_inline(&mut self, inline: Inline) {
        match self.inline_stack.last_mut() {
            Some((_, children)) => children.push(inline),
            None => self.inlines.push(inline),
        }
    }

    /// The single text-leaf interception point: pending text becomes a
    /// tokenized segment run.
    fn flush_text(&mut self) {
        if self.text_buf.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text_buf);
        let segments = tokenize(&text, self.directory);
        self.push_inline(Inline::Segments { segments });
    }

    /// Closes the current inline run, collapsing any wrapper left open by
    /// malformed input into its parent.
    fn take_inlines(&mut self) -> Vec<Inline> {
        self.flush_text();
        while let Some((wrap, children)) = self.inline_stack.pop() {
            let inline = wrap.build(children);
            match self.inline_stack.last_mut() {
                Some((_, parent)) => parent.push(inline),
                None => self.inlines.push(inline),
            }
        }
        std::mem::take(&mut self.inlines)
    }

    /// Wraps stray inlines into an implicit paragraph (tight list items,
    /// trailing text before a nested block opens).
    fn flush_pending_paragraph(&mut self) {
        let content = self.take_inlines();
        if !content.is_empty() {
            self.finish_block(Block::Paragraph { content });
        }
    }

    /// Attaches a finished block to the innermost container that accepts
    /// block children, or to the top level.
    fn finish_block(&mut self, block: Block) {
        let receiver = self
            .containers
            .iter()
            .rposition(|c| matches!(c, Container::Item { .. } | Container::BlockQuote { .. }));
        if let Some(idx) = receiver {
            if let Container::Item { blocks } | Container::BlockQuote { blocks } =
                &mut self.containers[idx]
            {
                blocks.push(block);
            }
        } else {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        // Settle any collector the event stream left open.
        if let Some(CodeCtx { language, code }) = self.code.take() {
            self.finish_block(Block::CodeBlock { language, code });
        }
        if let Some(raw) = self.html.take()
            && let Some(content) = sanitize_html(&raw)
        {
            self.finish_block(Block::Html { content });
        }
        if let Some(ImageCtx { src, title, alt }) = self.image.take() {
            self.push_inline(Inline::Image { src, alt, title });
        }
        self.flush_pending_paragraph();

        while let Some(container) = self.containers.pop() {
            match container {
                Container::BlockQuote { blocks } => {
                    self.finish_block(Block::BlockQuote { blocks });
                }
                Container::List {
                    ordered,
                    start,
                    items,
                } => {
                    self.finish_block(Block::List {
                        ordered,
                        start,
                        items,
                    });
                }
                Container::Item { blocks } => {
                    if let Some(Container::List { items, .. }) = self.containers.last_mut() {
                        items.push(blocks);
                    } else {
                        for block in blocks {
                            self.finish_block(block);
                        }
                    }
                }
                Container::Table {
                    alignments,
                    head,
                    mut rows,
                    current_row,
                    ..
                } => {
                    if !current_row.is_empty() {
                        rows.push(current_row);
                    }
                    self.finish_block(Block::Table {
                        alignments,
                        head,
                        rows,
                    });
                }
            }
        }

        self.blocks
    }
}

fn column_alignment(alignment: Alignment) -> ColumnAlignment {
    match alignment {
        Alignment::None => ColumnAlignment::Default,
        Alignment::Left => ColumnAlignment::Left,
        Alignment::Center => ColumnAlignment::Center,
        Alignment::Right => ColumnAlignment::Right,
    }
}
