use std::ops::Range;
use std::time::{Duration, Instant};

use curio_markdown::annotate::kinds::Mention;
use curio_markdown::{MentionCandidate, UserDirectory};

use crate::editing::debounce::Debounce;

/// Grace period between losing focus and closing the dropdown, long enough
/// for a click on a suggestion to land first.
pub const BLUR_GRACE: Duration = Duration::from_millis(150);

/// The visible dropdown: where the trigger sits, what the user typed after
/// it, and which candidates match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMention {
    /// Byte offset of the `@` in the buffer.
    pub trigger_start: usize,
    /// Everything typed between the trigger and the caret.
    pub term: String,
    /// Filtered suggestions, at most
    /// [`MAX_SUGGESTIONS`](curio_markdown::MAX_SUGGESTIONS).
    pub candidates: Vec<MentionCandidate>,
    /// Index of the keyboard-highlighted candidate.
    pub highlighted: usize,
}

/// The edit a committed selection asks the host to apply: replace `range`
/// with `text` and put the caret at `cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionCommit {
    pub range: Range<usize>,
    pub text: String,
    pub cursor: usize,
}

/// The Hidden/Active state machine over (buffer text, caret).
#[derive(Debug, Clone)]
pub struct MentionTracker {
    active: Option<ActiveMention>,
    blur_close: Debounce,
}

impl Default for MentionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MentionTracker {
    pub fn new() -> Self {
        Self {
            active: None,
            blur_close: Debounce::new(BLUR_GRACE),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveMention> {
        self.active.as_ref()
    }

    /// Re-evaluates the trigger from the current buffer and caret. Run on
    /// every keystroke and cursor move; it both opens and closes the
    /// dropdown, and supersedes a pending blur-close.
    pub fn refresh(&mut self, text: &str, cursor: usize, directory: &UserDirectory) {
        self.blur_close.cancel();
        let Some((trigger_start, term)) = find_trigger(text, cursor) else {
            self.active = None;
            return;
        };

        let candidates: Vec<MentionCandidate> =
            directory.search(&term).into_iter().cloned().collect();

        // Keep the highlight only while it still points at the same list.
        let highlighted = match &self.active {
            Some(prev) if same_usernames(&prev.candidates, &candidates) => prev.highlighted,
            _ => 0,
        };

        self.active = Some(ActiveMention {
            trigger_start,
            term,
            candidates,
            highlighted,
        });
    }

    /// Escape, commit-elsewhere, unmount: close immediately.
    pub fn dismiss(&mut self) {
        self.active = None;
        self.blur_close.cancel();
    }

    /// A non-empty selection closes the dropdown.
    pub fn on_selection_changed(&mut self, selection: &Range<usize>) {
        if selection.start != selection.end {
            self.dismiss();
        }
    }

    /// Scrolling anywhere outside the dropdown's own bounds closes it.
    pub fn on_scroll_outside(&mut self) {
        self.dismiss();
    }

    pub fn on_resize(&mut self) {
        self.dismiss();
    }

    /// Losing focus arms the grace period instead of closing outright.
    pub fn on_blur(&mut self, now: Instant) {
        if self.active.is_some() {
            self.blur_close.arm(now);
        }
    }

    /// Focus regained before the grace period elapsed.
    pub fn on_focus(&mut self) {
        self.blur_close.cancel();
    }

    /// Closes the dropdown if the blur grace period has elapsed. Harmless
    /// to call after the tracker already moved on.
    pub fn poll_blur(&mut self, now: Instant) -> bool {
        if self.blur_close.fire(now) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Arrow-down: cycle the highlight, wrapping at the bottom.
    pub fn highlight_next(&mut self) {
        if let Some(active) = &mut self.active {
            let n = active.candidates.len();
            if n > 0 {
                active.highlighted = (active.highlighted + 1) % n;
            }
        }
    }

    /// Arrow-up: cycle the highlight, wrapping at the top.
    pub fn highlight_prev(&mut self) {
        if let Some(active) = &mut self.active {
            let n = active.candidates.len();
            if n > 0 {
                active.highlighted = (active.highlighted + n - 1) % n;
            }
        }
    }

    /// Commits the highlighted candidate: replace from the `@` through the
    /// caret with `@username ` and put the caret after the space. `None`
    /// when hidden or nothing matches.
    pub fn commit(&mut self) -> Option<MentionCommit> {
        let commit = {
            let active = self.active.as_ref()?;
            let candidate = active.candidates.get(active.highlighted)?;
            let start = active.trigger_start;
            let end = start + Mention::MARKER.len_utf8() + active.term.len();
            let text = format!("{}{} ", Mention::MARKER, candidate.username);
            MentionCommit {
                range: start..end,
                cursor: start + text.len(),
                text,
            }
        };
        self.dismiss();
        Some(commit)
    }
}

/// Scans back from the caret for an open `@` trigger: no whitespace between
/// trigger and caret, and the trigger itself at the start of the text or
/// right after whitespace.
fn find_trigger(text: &str, cursor: usize) -> Option<(usize, String)> {
    let prefix = text.get(..cursor)?;
    for (idx, ch) in prefix.char_indices().rev() {
        if ch == Mention::MARKER {
            let at_boundary =
                idx == 0 || prefix[..idx].chars().next_back().is_some_and(char::is_whitespace);
            if !at_boundary {
                return None;
            }
            let term = prefix[idx + Mention::MARKER.len_utf8()..].to_string();
            return Some((idx, term));
        }
        if ch.is_whitespace() {
            return None;
        }
    }
    None
}

fn same_usernames(a: &[MentionCandidate], b: &[MentionCandidate]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x.username == y.username)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn directory_of(usernames: &[&str]) -> UserDirectory {
        UserDirectory::from_candidates(
            usernames
                .iter()
                .map(|u| MentionCandidate {
                    uid: format!("uid-{u}"),
                    username: (*u).to_string(),
                    display_name: None,
                })
                .collect(),
        )
    }

    #[test]
    fn trigger_at_start_opens() {
        let mut tracker = MentionTracker::new();
        tracker.refresh("@al", 3, &directory_of(&["alice", "bob"]));
        let active = tracker.active().expect("dropdown should be visible");
        assert_eq!(active.trigger_start, 0);
        assert_eq!(active.term, "al");
        assert_eq!(active.candidates.len(), 1);
        assert_eq!(active.candidates[0].username, "alice");
    }

    #[test]
    fn trigger_after_whitespace_opens() {
        let mut tracker = MentionTracker::new();
        tracker.refresh("hey @", 5, &directory_of(&["alice", "bob"]));
        assert!(tracker.is_visible());
        assert_eq!(tracker.active().unwrap().term, "");
        assert_eq!(tracker.active().unwrap().candidates.len(), 2);
    }

    #[test]
    fn mid_word_at_does_not_open() {
        let mut tracker = MentionTracker::new();
        tracker.refresh("foo@bar", 7, &directory_of(&["bar"]));
        assert!(!tracker.is_visible());
    }

    #[test]
    fn whitespace_after_trigger_closes() {
        let dir = directory_of(&["alice"]);
        let mut tracker = MentionTracker::new();
        tracker.refresh("@al", 3, &dir);
        assert!(tracker.is_visible());
        tracker.refresh("@al ", 4, &dir);
        assert!(!tracker.is_visible());
    }

    #[test]
    fn caret_leaving_the_span_closes() {
        let dir = directory_of(&["alice"]);
        let mut tracker = MentionTracker::new();
        tracker.refresh("hi @al there", 6, &dir);
        assert!(tracker.is_visible());
        // Caret moved back before the trigger.
        tracker.refresh("hi @al there", 2, &dir);
        assert!(!tracker.is_visible());
    }

    #[test]
    fn nonempty_selection_closes() {
        let mut tracker = MentionTracker::new();
        tracker.refresh("@al", 3, &directory_of(&["alice"]));
        tracker.on_selection_changed(&(0..2));
        assert!(!tracker.is_visible());
    }

    #[test]
    fn escape_scroll_and_resize_close() {
        let dir = directory_of(&["alice"]);
        for close in [
            MentionTracker::dismiss,
            MentionTracker::on_scroll_outside,
            MentionTracker::on_resize,
        ] {
            let mut tracker = MentionTracker::new();
            tracker.refresh("@a", 2, &dir);
            assert!(tracker.is_visible());
            close(&mut tracker);
            assert!(!tracker.is_visible());
        }
    }

    #[test]
    fn blur_closes_after_grace_period() {
        let start = Instant::now();
        let mut tracker = MentionTracker::new();
        tracker.refresh("@a", 2, &directory_of(&["alice"]));
        tracker.on_blur(start);
        assert!(tracker.is_visible());
        assert!(!tracker.poll_blur(start + Duration::from_millis(100)));
        assert!(tracker.poll_blur(start + BLUR_GRACE));
        assert!(!tracker.is_visible());
    }

    #[test]
    fn dropdown_click_can_land_inside_grace_period() {
        let start = Instant::now();
        let mut tracker = MentionTracker::new();
        tracker.refresh("@a", 2, &directory_of(&["alice"]));
        tracker.on_blur(start);
        // The click commits before the deadline; the stale close must not
        // act afterwards.
        let commit = tracker.commit().expect("commit before grace expiry");
        assert_eq!(commit.text, "@alice ");
        assert!(!tracker.poll_blur(start + Duration::from_secs(1)));
    }

    #[test]
    fn highlight_wraps_both_ways() {
        let mut tracker = MentionTracker::new();
        tracker.refresh("@", 1, &directory_of(&["a", "b", "c"]));
        assert_eq!(tracker.active().unwrap().highlighted, 0);
        // Wrap at the top going up.
        tracker.highlight_prev();
        assert_eq!(tracker.active().unwrap().highlighted, 2);
        // Wrap at the bottom going down.
        tracker.highlight_next();
        assert_eq!(tracker.active().unwrap().highlighted, 0);
        tracker.highlight_next();
        assert_eq!(tracker.active().unwrap().highlighted, 1);
    }

    #[test]
    fn highlight_resets_when_candidates_change() {
        let dir = directory_of(&["alice", "alina", "bob"]);
        let mut tracker = MentionTracker::new();
        tracker.refresh("@a", 2, &dir);
        tracker.highlight_next();
        assert_eq!(tracker.active().unwrap().highlighted, 1);
        // Same list after typing more: highlight survives.
        tracker.refresh("@al", 3, &dir);
        assert_eq!(tracker.active().unwrap().highlighted, 1);
        // Narrowed list: highlight resets.
        tracker.refresh("@alic", 5, &dir);
        assert_eq!(tracker.active().unwrap().highlighted, 0);
    }

    #[test]
    fn commit_replaces_trigger_through_caret() {
        let dir = directory_of(&["alice"]);
        let mut tracker = MentionTracker::new();
        tracker.refresh("hey @al", 7, &dir);
        let commit = tracker.commit().expect("a candidate is highlighted");
        assert_eq!(commit.range, 4..7);
        assert_eq!(commit.text, "@alice ");
        assert_eq!(commit.cursor, 4 + "@alice ".len());
        assert!(!tracker.is_visible());
    }

    #[test]
    fn commit_with_no_matches_declines() {
        let mut tracker = MentionTracker::new();
        tracker.refresh("@zzz", 4, &directory_of(&["alice"]));
        assert!(tracker.is_visible());
        assert_eq!(tracker.commit(), None);
    }

    #[test]
    fn case_insensitive_filtering() {
        let mut tracker = MentionTracker::new();
        tracker.refresh("@AL", 3, &directory_of(&["alice"]));
        assert_eq!(tracker.active().unwrap().candidates[0].username, "alice");
    }
}
