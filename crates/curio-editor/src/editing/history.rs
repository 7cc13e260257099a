use std::time::{Duration, Instant};

use super::debounce::Debounce;

/// Entries kept on the undo stack; once full, the oldest is evicted.
pub const MAX_ENTRIES: usize = 100;

/// Input inactivity required before a pending snapshot is committed.
pub const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Bounded linear undo/redo over full-buffer snapshots.
///
/// Typing does not checkpoint per keystroke: [`record`](History::record)
/// arms a quiet-period debounce and [`poll`](History::poll) commits the
/// pending snapshot once input has paused, so one burst of typing becomes
/// one undo step. Committing while the cursor is mid-stack discards the
/// redo tail (linear history, no branching). Undo/redo at the boundary
/// silently decline.
pub struct History {
    entries: Vec<String>,
    index: usize,
    pending: Option<String>,
    debounce: Debounce,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
            pending: None,
            debounce: Debounce::new(QUIET_PERIOD),
        }
    }

    /// Notes the buffer content after an input event and (re)starts the
    /// quiet period.
    pub fn record(&mut self, text: &str, now: Instant) {
        self.pending = Some(text.to_string());
        self.debounce.arm(now);
    }

    /// Commits the pending snapshot if the quiet period has elapsed.
    /// Returns whether a commit happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.debounce.fire(now) {
            return false;
        }
        match self.pending.take() {
            Some(text) => self.commit(text),
            None => false,
        }
    }

    /// Commits any pending snapshot immediately (the path taken right
    /// before an undo, so the latest keystrokes are not lost).
    pub fn flush(&mut self) -> bool {
        self.debounce.cancel();
        match self.pending.take() {
            Some(text) => self.commit(text),
            None => false,
        }
    }

    fn commit(&mut self, text: String) -> bool {
        if self.entries[self.index] == text {
            return false;
        }
        // A new edit after undo truncates the discarded future.
        self.entries.truncate(self.index + 1);
        self.entries.push(text);
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
        true
    }

    /// Steps back one snapshot; `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Steps forward one snapshot; `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        // There is always the initial entry.
        false
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }
}
