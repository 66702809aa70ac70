//! Layout classification for raw completion text.
//!
//! Explicit marker tokens always win. Without a marker, keyword heuristics are
//! tried in a fixed priority order (contact, cards, carousel, accordion) and
//! the first hit decides. Existing prompts depend on this order, so overlaps
//! such as "portfolio" plus "gallery" resolve to whichever rule comes first.

use super::types::ContentType;

/// Marker tokens, matched case-insensitively anywhere in the text.
pub const MARKERS: [(&str, ContentType); 5] = [
    ("[CARDS]", ContentType::Cards),
    ("[CAROUSEL]", ContentType::Carousel),
    ("[ACCORDION]", ContentType::Accordion),
    ("[TABS]", ContentType::Tabs),
    ("[CONTACT]", ContentType::Contact),
];

const CONTACT_KEYWORDS: [&str; 4] = ["contact", "email", "reach me", "get in touch"];
const CARDS_KEYWORDS: [&str; 4] = ["services", "products", "offerings", "portfolio"];
const CAROUSEL_KEYWORDS: [&str; 5] = ["gallery", "showcase", "images", "videos", "media"];
const ACCORDION_KEYWORDS: [&str; 3] = ["frequently asked", "questions", "faq"];

/// More than this many `?` characters reads as a list of questions.
const ACCORDION_QUESTION_MARKS: usize = 2;

/// Pick the layout for a completion. Total; defaults to [`ContentType::Text`].
pub fn classify(text: &str) -> ContentType {
    let lower = text.to_lowercase();

    if let Some(content_type) = marker_type(&lower) {
        tracing::debug!("Classified response as {} via marker", content_type);
        return content_type;
    }

    let content_type = if contains_any(&lower, &CONTACT_KEYWORDS) {
        ContentType::Contact
    } else if contains_any(&lower, &CARDS_KEYWORDS) {
        ContentType::Cards
    } else if contains_any(&lower, &CAROUSEL_KEYWORDS) {
        ContentType::Carousel
    } else if contains_any(&lower, &ACCORDION_KEYWORDS)
        || lower.matches('?').count() > ACCORDION_QUESTION_MARKS
    {
        ContentType::Accordion
    } else {
        ContentType::Text
    };

    tracing::debug!("Classified response as {} via keywords", content_type);
    content_type
}

/// First marker (in declaration order) present in already-lowercased text.
fn marker_type(lower: &str) -> Option<ContentType> {
    MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(&marker.to_lowercase()))
        .map(|(_, content_type)| *content_type)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_selects_type() {
        assert_eq!(classify("Check out my [CARDS] work"), ContentType::Cards);
        assert_eq!(classify("[carousel] recent shoots"), ContentType::Carousel);
        assert_eq!(classify("[Tabs]\n## One\n## Two"), ContentType::Tabs);
    }

    #[test]
    fn test_marker_beats_conflicting_keywords() {
        // "email" would otherwise pick contact
        assert_eq!(
            classify("[ACCORDION] email me about my services gallery"),
            ContentType::Accordion
        );
        assert_eq!(
            classify("FAQ? why? when? how? [CONTACT]"),
            ContentType::Contact
        );
        for (marker, expected) in MARKERS {
            let text = format!("contact services gallery faq??? {}", marker);
            assert_eq!(classify(&text), expected, "marker {}", marker);
        }
    }

    #[test]
    fn test_keyword_priority_order() {
        assert_eq!(
            classify("Get in touch to see my portfolio"),
            ContentType::Contact
        );
        assert_eq!(
            classify("My portfolio and gallery are linked below"),
            ContentType::Cards
        );
        assert_eq!(
            classify("Browse the gallery of common questions"),
            ContentType::Carousel
        );
    }

    #[test]
    fn test_accordion_by_keyword_or_question_marks() {
        assert_eq!(
            classify("Here are some frequently asked questions: why? when? how?"),
            ContentType::Accordion
        );
        assert_eq!(classify("Why? When? How?"), ContentType::Accordion);
        assert_eq!(classify("Why? When?"), ContentType::Text);
    }

    #[test]
    fn test_default_is_text() {
        assert_eq!(classify("plain text"), ContentType::Text);
        assert_eq!(classify(""), ContentType::Text);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(classify("EMAIL works best"), ContentType::Contact);
        assert_eq!(classify("Our Products"), ContentType::Cards);
    }
}
