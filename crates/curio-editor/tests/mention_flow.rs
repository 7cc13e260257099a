use std::time::Instant;

use curio_editor::{
    DropdownSize, EditorBuffer, MentionTracker, SurfaceMetrics, ViewportSize, caret_anchor,
    clamp_to_viewport,
};
use curio_markdown::{Block, Inline, MentionCandidate, Segment, UserDirectory, render_markdown};
use pretty_assertions::assert_eq;

fn directory() -> UserDirectory {
    UserDirectory::from_candidates(vec![
        MentionCandidate {
            uid: "u1".to_string(),
            username: "alice".to_string(),
            display_name: Some("Alice A.".to_string()),
        },
        MentionCandidate {
            uid: "u2".to_string(),
            username: "alan".to_string(),
            display_name: None,
        },
        MentionCandidate {
            uid: "u3".to_string(),
            username: "bob".to_string(),
            display_name: None,
        },
    ])
}

/// Typing an answer, completing a mention from the dropdown, and rendering
/// the result: the committed mention comes out valid and clickable.
#[test]
fn type_complete_and_render_a_mention() {
    let dir = directory();
    let mut buf = EditorBuffer::new("Thanks ");
    let mut tracker = MentionTracker::new();

    // User types "@al"; the tracker sees each keystroke.
    for typed in ["@", "a", "l"] {
        let at = buf.cursor();
        buf.insert(at, typed);
        buf.set_cursor(at + typed.len());
        tracker.refresh(&buf.text(), buf.cursor(), &dir);
    }
    let active = tracker.active().expect("dropdown open");
    assert_eq!(active.term, "al");
    assert_eq!(active.candidates.len(), 2);

    // Arrow down to "alan", back up to "alice", commit.
    tracker.highlight_next();
    tracker.highlight_prev();
    let commit = tracker.commit().expect("candidate selected");
    buf.replace(commit.range.clone(), &commit.text);
    buf.set_cursor(commit.cursor);

    assert_eq!(buf.text(), "Thanks @alice ");
    assert_eq!(buf.cursor(), "Thanks @alice ".len());
    assert!(!tracker.is_visible());

    // The committed draft renders with a valid, clickable mention.
    let blocks = render_markdown(&buf.text(), &dir);
    let Block::Paragraph { content } = &blocks[0] else {
        panic!("expected paragraph");
    };
    let Inline::Segments { segments } = &content[0] else {
        panic!("expected segments");
    };
    assert_eq!(
        segments[1],
        Segment::Mention {
            username: "alice".to_string(),
            is_valid: true
        }
    );
}

/// The dropdown tracks the trigger's screen position and stays inside the
/// viewport.
#[test]
fn dropdown_stays_inside_the_viewport() {
    let dir = directory();
    let mut tracker = MentionTracker::new();
    let text = "question text\nand a reply to @";
    tracker.refresh(text, text.len(), &dir);
    let active = tracker.active().expect("dropdown open");

    let metrics = SurfaceMetrics {
        left: 300.0,
        top: 200.0,
        padding: 12.0,
        line_height: 22.0,
        font_size: 15.0,
        scroll_x: 0.0,
        scroll_y: 0.0,
    };
    let viewport = ViewportSize {
        width: 500.0,
        height: 700.0,
    };
    let dropdown = DropdownSize {
        width: 240.0,
        height: 180.0,
    };

    let anchor = caret_anchor(text, active.trigger_start, &metrics);
    let clamped = clamp_to_viewport(anchor, dropdown, viewport, &metrics);

    assert!(clamped.x <= viewport.width - dropdown.width - 10.0);
    assert!(clamped.x >= 10.0);
    assert!(clamped.y + dropdown.height <= viewport.height);
}

/// Blur then refocus within the grace period keeps the dropdown up; blur
/// left alone closes it.
#[test]
fn blur_grace_period_is_cancellable() {
    let start = Instant::now();
    let dir = directory();

    let mut tracker = MentionTracker::new();
    tracker.refresh("@b", 2, &dir);
    tracker.on_blur(start);
    tracker.on_focus();
    assert!(!tracker.poll_blur(start + std::time::Duration::from_secs(1)));
    assert!(tracker.is_visible());
}
