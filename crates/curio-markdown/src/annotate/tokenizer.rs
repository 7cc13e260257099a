use std::sync::OnceLock;

use regex::Regex;

use crate::directory::UserDirectory;

use super::{
    kinds::{Hashtag, Mention},
    types::Segment,
};

/// Scans `text` left to right and emits hashtag/mention/plain segments.
///
/// # Arguments
/// - `text`: the raw UTF-8 text to classify (an answer body, a table cell,
///   any text leaf of a markdown document)
/// - `directory`: the known mentionable users; mention validity is a
///   case-insensitive lookup against it
///
/// # Boundary rule
/// A token must sit at the start of the string or directly after whitespace.
/// The boundary whitespace itself lands in the preceding text segment, so
/// the segments concatenate back to `text` exactly.
///
/// # Returns
/// Segments in left-to-right order with no gaps. Empty input yields an empty
/// vec, not a one-element vec with empty content.
pub fn tokenize(text: &str, directory: &UserDirectory) -> Vec<Segment> {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    let token_regex = TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"(^|\s)([#@])([0-9A-Za-z_]+)").expect("Invalid token regex")
    });

    let mut segments = Vec::new();
    let mut last = 0;

    for caps in token_regex.captures_iter(text) {
        let (Some(whole), Some(marker), Some(word)) = (caps.get(0), caps.get(2), caps.get(3))
        else {
            continue;
        };

        // Everything up to the marker, boundary whitespace included, is
        // plain text.
        if marker.start() > last {
            segments.push(Segment::Text {
                content: text[last..marker.start()].to_string(),
            });
        }

        let captured = word.as_str().to_string();
        if marker.as_str().starts_with(Hashtag::MARKER) {
            segments.push(Segment::Hashtag { tag: captured });
        } else {
            debug_assert!(marker.as_str().starts_with(Mention::MARKER));
            let is_valid = directory.contains(&captured);
            segments.push(Segment::Mention {
                username: captured,
                is_valid,
            });
        }

        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Text {
            content: text[last..].to_string(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::annotate::types::source_of;
    use crate::directory::MentionCandidate;

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
    fn plain_text_is_one_segment() {
        let segments = tokenize("no tokens here", &UserDirectory::default());
        assert_eq!(
            segments,
            vec![Segment::Text {
                content: "no tokens here".to_string()
            }]
        );
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert_eq!(tokenize("", &UserDirectory::default()), vec![]);
    }

    #[test]
    fn hashtag_is_always_valid() {
        let segments = tokenize("hello #world", &UserDirectory::default());
        assert_eq!(
            segments,
            vec![
                Segment::Text {
                    content: "hello ".to_string()
                },
                Segment::Hashtag {
                    tag: "world".to_string()
                },
            ]
        );
    }

    #[test]
    fn mention_validity_follows_directory() {
        let dir = directory_of(&["alice"]);

        let known = tokenize("ping @alice", &dir);
        assert_eq!(
            known[1],
            Segment::Mention {
                username: "alice".to_string(),
                is_valid: true
            }
        );

        let unknown = tokenize("ping @bob", &dir);
        assert_eq!(
            unknown[1],
            Segment::Mention {
                username: "bob".to_string(),
                is_valid: false
            }
        );
    }

    #[test]
    fn mention_lookup_ignores_case() {
        let dir = directory_of(&["Alice"]);
        let segments = tokenize("@aLiCe", &dir);
        assert_eq!(
            segments,
            vec![Segment::Mention {
                username: "aLiCe".to_string(),
                is_valid: true
            }]
        );
    }

    #[test]
    fn mid_word_marker_stays_text() {
        let segments = tokenize("x@y", &directory_of(&["y"]));
        assert_eq!(
            segments,
            vec![Segment::Text {
                content: "x@y".to_string()
            }]
        );
    }

    #[test]
    fn lone_trailing_marker_stays_text() {
        let segments = tokenize("dangling #", &UserDirectory::default());
        assert_eq!(
            segments,
            vec![Segment::Text {
                content: "dangling #".to_string()
            }]
        );
    }

    #[test]
    fn token_at_start_has_no_leading_text_segment() {
        let segments = tokenize("#lead rest", &UserDirectory::default());
        assert_eq!(
            segments,
            vec![
                Segment::Hashtag {
                    tag: "lead".to_string()
                },
                Segment::Text {
                    content: " rest".to_string()
                },
            ]
        );
    }

    #[test]
    fn adjacent_tokens_keep_separating_whitespace_as_text() {
        let segments = tokenize("#a #b", &UserDirectory::default());
        assert_eq!(
            segments,
            vec![
                Segment::Hashtag {
                    tag: "a".to_string()
                },
                Segment::Text {
                    content: " ".to_string()
                },
                Segment::Hashtag {
                    tag: "b".to_string()
                },
            ]
        );
    }

    #[test]
    fn newline_is_a_valid_boundary() {
        let segments = tokenize("line one\n#tag", &UserDirectory::default());
        assert_eq!(
            segments,
            vec![
                Segment::Text {
                    content: "line one\n".to_string()
                },
                Segment::Hashtag {
                    tag: "tag".to_string()
                },
            ]
        );
    }

    #[test]
    fn marker_run_without_boundary_stays_text() {
        // "#a#b": the second "#" sits after a word character
        let segments = tokenize("#a#b", &UserDirectory::default());
        assert_eq!(
            segments,
            vec![
                Segment::Hashtag {
                    tag: "a".to_string()
                },
                Segment::Text {
                    content: "#b".to_string()
                },
            ]
        );
    }

    #[rstest]
    #[case("")]
    #[case("plain text only")]
    #[case("hello #world")]
    #[case("ping @alice and @bob")]
    #[case("x@y is not a mention")]
    #[case("#a #b\n@c dangling @")]
    #[case("mixed #tag text @user trailing")]
    fn round_trip_restores_source(#[case] input: &str) {
        let dir = directory_of(&["alice"]);
        let segments = tokenize(input, &dir);
        assert_eq!(source_of(&segments), input);
    }
}
