//! Follow-up question extraction from the tail of a completion.

use regex::Regex;
use std::sync::LazyLock;

/// Upper bound on follow-up prompts offered to the visitor.
pub const MAX_SUGGESTED_QUESTIONS: usize = 4;

const SECTION_HEADERS: [&str; 3] = [
    "suggested questions",
    "follow-up questions",
    "you might also ask",
];

/// Header through the first blank line (or end of text).
fn section_pattern(header: &str) -> Regex {
    Regex::new(&format!(
        r"(?i){}[^\n]*\n(?s:(.*?))(?:\n[ \t\r]*\n|\z)",
        regex::escape(header)
    ))
    .expect("valid regex")
}

static SECTION_RES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| SECTION_HEADERS.iter().map(|h| section_pattern(h)).collect());

/// A line holding nothing but a header (plus bold/colon decoration), through
/// the first blank line. Sentences that merely mention a header phrase stay.
static SECTION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let headers: Vec<String> = SECTION_HEADERS.iter().map(|h| regex::escape(h)).collect();
    Regex::new(&format!(
        r"(?im)^[^\w\n]*(?:{})[^\w\n]*$(?s:.*?)(?:\n[ \t\r]*\n|\z)",
        headers.join("|")
    ))
    .expect("valid regex")
});

static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("valid regex"));

/// Bounded list of follow-up prompts found under a known section header.
///
/// Headers are tried in order; the first one that yields at least one item
/// wins. No section is not an error, just an empty list.
pub fn extract_suggested_questions(text: &str) -> Vec<String> {
    for re in SECTION_RES.iter() {
        let Some(block) = re.captures(text).and_then(|caps| caps.get(1)) else {
            continue;
        };

        let questions = bullet_lines(block.as_str(), MAX_SUGGESTED_QUESTIONS);
        if !questions.is_empty() {
            return questions;
        }
    }

    Vec::new()
}

/// Split a block into trimmed, de-bulleted, non-empty lines, keeping at most `limit`.
pub(crate) fn bullet_lines(block: &str, limit: usize) -> Vec<String> {
    block
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim().trim_start_matches(['-', '*', '•']).trim_start();
    match NUMBERED_RE.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

/// Remove the suggested-questions section from display text.
pub(crate) fn strip_suggested_questions(text: &str) -> String {
    SECTION_LINE_RE.replace_all(text, "").into_owned()
}
