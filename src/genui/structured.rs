//! Extraction of an explicit JSON payload embedded in completion text.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid regex"));

// Greedy on purpose: spans from the first `{` to the last `}`.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Pull the structured payload out of a completion, if there is one.
///
/// A fenced ```` ```json ```` block is preferred; without one, the widest
/// `{...}` span is tried. Malformed JSON is logged and yields `None` so
/// generators fall back to the text.
pub fn extract_structured_data(text: &str) -> Option<Value> {
    let candidate = match JSON_FENCE_RE.captures(text) {
        Some(caps) => caps.get(1)?.as_str(),
        None => JSON_OBJECT_RE.find(text)?.as_str(),
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse structured data from response: {}", e);
            None
        }
    }
}

/// Remove the fenced JSON block, if any, from display text.
pub(crate) fn strip_json_block(text: &str) -> String {
    JSON_FENCE_RE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_fenced_json_block() {
        let text = "```json\n{\"cards\":[{\"id\":\"1\",\"title\":\"A\",\"description\":\"d\"}]}\n```";
        let data = extract_structured_data(text).unwrap();
        assert_eq!(data["cards"][0]["title"], "A");
    }

    #[test]
    fn test_fenced_block_wins_over_bare_object() {
        let text = "Intro {\"title\": \"bare\"}\n```json\n{\"title\": \"fenced\"}\n```";
        let data = extract_structured_data(text).unwrap();
        assert_eq!(data, json!({"title": "fenced"}));
    }

    #[test]
    fn test_extracts_bare_object() {
        let text = "Here you go: {\"title\": \"Services\", \"description\": \"What I do\"} enjoy";
        let data = extract_structured_data(text).unwrap();
        assert_eq!(data["description"], "What I do");
    }

    #[test]
    fn test_not_json_returns_none() {
        assert!(extract_structured_data("not json at all").is_none());
    }

    #[test]
    fn test_malformed_json_returns_none() {
        assert!(extract_structured_data("```json\n{\"title\": \n```").is_none());
        assert!(extract_structured_data("use {braces} loosely").is_none());
    }

    #[test]
    fn test_greedy_match_spans_separate_objects() {
        // Two objects side by side form one invalid span.
        assert!(extract_structured_data("{\"a\": 1} and {\"b\": 2}").is_none());
    }

    #[test]
    fn test_strip_json_block() {
        let stripped = strip_json_block("Before\n```json\n{\"a\": 1}\n```\nAfter");
        assert_eq!(stripped, "Before\n\nAfter");
    }
}
