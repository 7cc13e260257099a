//! # User Directory
//!
//! The mentionable-user records the host page fetches from the document
//! store. The core only reads them: the tokenizer asks whether a username
//! exists, the mention dropdown asks for suggestions matching a search term.
//!
//! Username lookup ignores case everywhere (validity checks and suggestion
//! filtering alike); the directory case-folds once at construction. A stale
//! or empty directory only degrades mention validity; tokenization and
//! rendering keep working.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of candidates the mention dropdown shows.
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to decode mention candidate list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One mentionable user, as stored by the external platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionCandidate {
    pub uid: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Case-insensitive index over [`MentionCandidate`]s.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    candidates: Vec<MentionCandidate>,
    by_folded: HashMap<String, usize>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from already-decoded candidates. When two usernames
    /// collide case-insensitively the first one wins; the host is assumed to
    /// enforce uniqueness at registration time.
    pub fn from_candidates(candidates: Vec<MentionCandidate>) -> Self {
        let mut by_folded = HashMap::with_capacity(candidates.len());
        for (idx, candidate) in candidates.iter().enumerate() {
            by_folded
                .entry(candidate.username.to_lowercase())
                .or_insert(idx);
        }
        Self {
            candidates,
            by_folded,
        }
    }

    /// Decodes the raw JSON payload of the candidate list (as the host
    /// receives it from the document store) and builds the index.
    pub fn from_json(payload: &str) -> Result<Self, DirectoryError> {
        let candidates: Vec<MentionCandidate> = serde_json::from_str(payload)?;
        Ok(Self::from_candidates(candidates))
    }

    /// Whether `username` belongs to a known user, ignoring case.
    pub fn contains(&self, username: &str) -> bool {
        self.by_folded.contains_key(&username.to_lowercase())
    }

    /// Looks up a candidate by username, ignoring case.
    pub fn get(&self, username: &str) -> Option<&MentionCandidate> {
        self.by_folded
            .get(&username.to_lowercase())
            .map(|&idx| &self.candidates[idx])
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[MentionCandidate] {
        &self.candidates
    }

    /// Dropdown suggestions for a search term: case-insensitive substring
    /// match on username, at most [`MAX_SUGGESTIONS`] results in directory
    /// order. An empty term matches everyone (the dropdown right after the
    /// trigger shows the first few users).
    pub fn search(&self, term: &str) -> Vec<&MentionCandidate> {
        let folded = term.to_lowercase();
        self.candidates
            .iter()
            .filter(|c| c.username.to_lowercase().contains(&folded))
            .take(MAX_SUGGESTIONS)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn candidate(uid: &str, username: &str) -> MentionCandidate {
        MentionCandidate {
            uid: uid.to_string(),
            username: username.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn contains_ignores_case() {
        let dir = UserDirectory::from_candidates(vec![candidate("1", "Alice")]);
        assert!(dir.contains("alice"));
        assert!(dir.contains("ALICE"));
        assert!(!dir.contains("bob"));
    }

    #[test]
    fn get_returns_original_spelling() {
        let dir = UserDirectory::from_candidates(vec![candidate("1", "Alice")]);
        assert_eq!(dir.get("alice").map(|c| c.username.as_str()), Some("Alice"));
    }

    #[test]
    fn case_fold_collision_keeps_first() {
        let dir =
            UserDirectory::from_candidates(vec![candidate("1", "Alice"), candidate("2", "alice")]);
        assert_eq!(dir.get("ALICE").map(|c| c.uid.as_str()), Some("1"));
    }

    #[test]
    fn search_is_substring_and_capped() {
        let dir = UserDirectory::from_candidates(vec![
            candidate("1", "alice"),
            candidate("2", "malice"),
            candidate("3", "ALI"),
            candidate("4", "bob_ali"),
            candidate("5", "aliya"),
            candidate("6", "alison"),
            candidate("7", "unrelated"),
        ]);
        let hits = dir.search("ali");
        assert_eq!(hits.len(), MAX_SUGGESTIONS);
        assert_eq!(hits[0].username, "alice");
        assert_eq!(hits[1].username, "malice");
    }

    #[test]
    fn empty_term_matches_everyone() {
        let dir = UserDirectory::from_candidates(vec![candidate("1", "a"), candidate("2", "b")]);
        assert_eq!(dir.search("").len(), 2);
    }

    #[test]
    fn from_json_decodes_store_payload() {
        let payload = r#"[
            {"uid": "u1", "username": "alice", "displayName": "Alice A."},
            {"uid": "u2", "username": "bob"}
        ]"#;
        let dir = UserDirectory::from_json(payload).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(
            dir.get("alice").and_then(|c| c.display_name.as_deref()),
            Some("Alice A.")
        );
        assert_eq!(dir.get("bob").and_then(|c| c.display_name.as_deref()), None);
    }

    #[test]
    fn from_json_surfaces_decode_errors() {
        let err = UserDirectory::from_json("not json").unwrap_err();
        assert!(matches!(err, DirectoryError::Decode(_)));
    }
}
