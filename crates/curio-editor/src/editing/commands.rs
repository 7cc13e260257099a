use curio_markdown::annotate::kinds::{Hashtag, Mention};

use super::buffer::EditorBuffer;

/// The toolbar's formatting actions. Each operates on the buffer's current
/// selection and leaves the selection where the user expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    Link,
    Heading,
    BulletList,
    NumberedList,
    Quote,
    CodeFence,
    Divider,
    HashtagStub,
    MentionStub,
    Indent,
}

/// What a keyboard chord resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Command(Cmd),
    Undo,
    Redo,
}

/// What Tab inserts instead of moving focus.
pub const TAB_INDENT: &str = "  ";

/// Maps the conventional modifier chords (Ctrl on desktop, Cmd on mac) to
/// actions. Returns `None` for chords the editor does not own.
pub fn resolve_shortcut(key: char, modifier: bool, shift: bool) -> Option<EditorAction> {
    if !modifier {
        return None;
    }
    match key.to_ascii_lowercase() {
        'b' => Some(EditorAction::Command(Cmd::Bold)),
        'i' => Some(EditorAction::Command(Cmd::Italic)),
        'e' => Some(EditorAction::Command(Cmd::InlineCode)),
        'k' => Some(EditorAction::Command(Cmd::Link)),
        'z' if shift => Some(EditorAction::Redo),
        'z' => Some(EditorAction::Undo),
        'y' => Some(EditorAction::Redo),
        _ => None,
    }
}

/// Applies a formatting command to the buffer.
pub fn apply(buf: &mut EditorBuffer, cmd: Cmd) {
    match cmd {
        Cmd::Bold => wrap(buf, "**", "**", "bold text"),
        Cmd::Italic => wrap(buf, "*", "*", "italic text"),
        Cmd::Strikethrough => wrap(buf, "~~", "~~", "strikethrough"),
        Cmd::InlineCode => wrap(buf, "`", "`", "code"),
        Cmd::Link => wrap(buf, "[", "](url)", "link text"),
        Cmd::Heading => cycle_heading(buf),
        Cmd::BulletList => prefix_line(buf, "- "),
        Cmd::NumberedList => prefix_line(buf, "1. "),
        Cmd::Quote => prefix_line(buf, "> "),
        Cmd::CodeFence => insert_at_cursor(buf, "\n```\n\n```\n", 5),
        Cmd::Divider => insert_at_cursor(buf, "\n---\n", 5),
        Cmd::HashtagStub => insert_at_cursor(buf, &Hashtag::MARKER.to_string(), 1),
        Cmd::MentionStub => insert_at_cursor(buf, &Mention::MARKER.to_string(), 1),
        Cmd::Indent => insert_at_cursor(buf, TAB_INDENT, TAB_INDENT.len()),
    }
}

/// Wraps the selection in `before`/`after`, keeping the wrapped text
/// selected. With nothing selected, inserts the markers around
/// `placeholder` and selects just the placeholder so the user can overtype
/// it.
fn wrap(buf: &mut EditorBuffer, before: &str, after: &str, placeholder: &str) {
    let sel = buf.selection();
    let inner = if buf.has_selection() {
        buf.selected_text()
    } else {
        placeholder.to_string()
    };
    let text = format!("{before}{inner}{after}");
    buf.replace(sel.clone(), &text);
    let inner_start = sel.start + before.len();
    buf.set_selection(inner_start..inner_start + inner.len());
}

/// Heading cycles 0→1→…→6→0: each invocation adds one `#` to the current
/// line, and at level 6 the markers strip back to plain text.
fn cycle_heading(buf: &mut EditorBuffer) {
    let cursor = buf.selection().start;
    let line_start = buf.line_start(cursor);
    let line = buf.line_text(line_start);

    let hashes = line.chars().take_while(|&c| c == Hashtag::MARKER).count();
    let marker_space = hashes > 0 && line[hashes..].starts_with(' ');
    let old_prefix_len = if hashes > 0 {
        hashes + usize::from(marker_space)
    } else {
        0
    };

    let new_prefix = if hashes >= 6 {
        String::new()
    } else {
        format!("{} ", Hashtag::MARKER.to_string().repeat(hashes + 1))
    };

    let within = cursor.saturating_sub(line_start).saturating_sub(old_prefix_len);
    buf.replace(line_start..line_start + old_prefix_len, &new_prefix);
    buf.set_cursor(line_start + new_prefix.len() + within);
}

/// Prepends a list/quote marker at the start of the current line, shifting
/// the selection along with the text it sat on.
fn prefix_line(buf: &mut EditorBuffer, marker: &str) {
    let sel = buf.selection();
    let line_start = buf.line_start(sel.start);
    buf.insert(line_start, marker);
    let shift = marker.len();
    buf.set_selection(sel.start + shift..sel.end + shift);
}

/// Simple insertions always land at the caret, selection or not, and never
/// wrap. `cursor_after` is where the caret ends up inside the inserted
/// text.
fn insert_at_cursor(buf: &mut EditorBuffer, text: &str, cursor_after: usize) {
    let at = buf.cursor();
    buf.insert(at, text);
    buf.set_cursor(at + cursor_after);
}
