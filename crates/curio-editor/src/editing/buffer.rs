use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

/// The plain-text content under edit, plus the current selection.
///
/// The buffer is the single source of truth for the draft; it is mutated
/// only through the formatting commands and the direct-typing entry points
/// below. Selection endpoints are byte offsets with `start <= end`; a
/// collapsed selection is the caret. Out-of-range inputs are clamped, never
/// rejected.
pub struct EditorBuffer {
    buffer: Rope,
    selection: Range<usize>,
    version: u64,
}

impl EditorBuffer {
    /// Creates a buffer with the cursor at the end of `text`.
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len,
            version: 0,
        }
    }

    /// Creates a buffer from raw bytes, validating UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Edit counter; bumps on every mutation (change detection for hosts).
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// The caret position (the selection's end).
    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    pub fn has_selection(&self) -> bool {
        self.selection.start != self.selection.end
    }

    /// Sets the selection, clamped into the buffer.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = self.clamp(selection);
    }

    /// Collapses the selection to a caret at `offset`.
    pub fn set_cursor(&mut self, offset: usize) {
        self.set_selection(offset..offset);
    }

    pub fn selected_text(&self) -> String {
        self.slice(self.selection.clone())
    }

    /// Slices the buffer, silently clamping an out-of-range request.
    pub fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        self.buffer.slice_to_cow(range).into_owned()
    }

    /// Inserts `text` at `at`, leaving the selection where the caller put
    /// it (commands set it explicitly afterwards).
    pub fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.len());
        self.apply_edit(at..at, text);
    }

    /// Replaces `range` with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp(range);
        self.apply_edit(range, text);
    }

    /// Deletes `range`.
    pub fn delete(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        self.apply_edit(range, "");
    }

    /// Replaces the entire content (undo/redo restore path). The selection
    /// moves to the end of the new text.
    pub fn set_text(&mut self, text: &str) {
        let len = self.len();
        self.apply_edit(0..len, text);
        let end = self.len();
        self.selection = end..end;
    }

    /// Start of the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let before = self.buffer.slice_to_cow(0..offset);
        match before.rfind('\n') {
            Some(newline_pos) => newline_pos + 1,
            None => 0,
        }
    }

    /// Zero-based index of the line containing `offset`.
    pub fn line_index_at(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let before = self.buffer.slice_to_cow(0..offset);
        before.matches('\n').count()
    }

    /// The text of the line starting at `line_start`, newline excluded.
    pub fn line_text(&self, line_start: usize) -> String {
        let line_start = line_start.min(self.len());
        let rest = self.buffer.slice_to_cow(line_start..self.len());
        match rest.find('\n') {
            Some(newline_pos) => rest[..newline_pos].to_string(),
            None => rest.into_owned(),
        }
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        start..end
    }

    fn apply_edit(&mut self, range: Range<usize>, text: &str) {
        if range.is_empty() && text.is_empty() {
            return;
        }
        let delta = self.compile_replace(range, text);
        self.buffer = delta.apply(&self.buffer);
        let len = self.len();
        self.selection = self.selection.start.min(len)..self.selection.end.min(len);
        self.version += 1;
    }

    fn compile_replace(&self, range: Range<usize>, text: &str) -> Delta<RopeInfo> {
        let mut builder = Builder::new(self.len());
        if text.is_empty() {
            builder.delete(range);
        } else {
            builder.replace(range, Rope::from(text));
        }
        builder.build()
    }
}
