//! Raw-HTML sanitization.
//!
//! Markdown may carry raw HTML blocks and inline HTML spans. Neither is ever
//! re-emitted as markup: anything containing a script or style tag is
//! scrubbed away entirely, and the rest is entity-escaped and re-enters the
//! tree as inert text. Escaping makes the literal markup harmless even for
//! hosts that inject tree text straight into the page.

use std::sync::OnceLock;

use regex::Regex;

fn contains_dangerous_tag(raw: &str) -> bool {
    static DANGEROUS: OnceLock<Regex> = OnceLock::new();
    let dangerous = DANGEROUS.get_or_init(|| {
        Regex::new(r"(?i)<\s*/?\s*(script|style)\b").expect("Invalid sanitizer regex")
    });
    dangerous.is_match(raw)
}

/// Neutralizes one chunk of raw HTML.
///
/// Returns `None` when the chunk must be dropped (script/style payloads, or
/// nothing left but whitespace), otherwise the entity-escaped text to render
/// in its place.
pub fn sanitize_html(raw: &str) -> Option<String> {
    if contains_dangerous_tag(raw) {
        return None;
    }
    if raw.trim().is_empty() {
        return None;
    }
    Some(html_escape::encode_text(raw).into_owned())
}
