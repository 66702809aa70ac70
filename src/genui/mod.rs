//! Generative UI pipeline
//!
//! Turns unstructured completion text into one typed, renderable
//! [`GenerativeContent`] value. Everything here is pure and synchronous.

pub mod classify;
pub mod generators;
pub mod questions;
pub mod structured;
pub mod types;

pub use classify::classify;
pub use questions::extract_suggested_questions;
pub use structured::extract_structured_data;
pub use types::{
    AccordionData, AccordionItem, Card, CardsData, CarouselData, CarouselItem, ContactData,
    ContactMethod, ContactMethodType, ContentData, ContentMetadata, ContentType,
    GenerativeContent, MediaType, Tab, TabsData, TextData,
};

use crate::models::UserContext;

/// Classify, extract and generate in one step.
///
/// Plain text short-circuits without a generator and only records the
/// structured payload; every other layout also carries the original text and
/// the user context in its metadata.
pub fn parse_ai_response(text: &str, user_context: Option<&UserContext>) -> GenerativeContent {
    let content_type = classify(text);
    let structured_data = extract_structured_data(text);
    let structured = structured_data.as_ref();

    let data = match content_type {
        ContentType::Text => {
            return GenerativeContent {
                data: ContentData::Text(TextData {
                    content: text.to_string(),
                }),
                metadata: Some(ContentMetadata {
                    structured_data,
                    ..Default::default()
                }),
            };
        }
        ContentType::Cards => ContentData::Cards(generators::generate_cards(text, structured)),
        ContentType::Carousel => {
            ContentData::Carousel(generators::generate_carousel(text, structured))
        }
        ContentType::Accordion => {
            ContentData::Accordion(generators::generate_accordion(text, structured))
        }
        ContentType::Tabs => ContentData::Tabs(generators::generate_tabs(text, structured)),
        ContentType::Contact => ContentData::Contact(generators::generate_contact(
            text,
            structured,
            user_context,
        )),
    };

    GenerativeContent {
        data,
        metadata: Some(ContentMetadata {
            original_content: Some(text.to_string()),
            structured_data,
            user_context: user_context.cloned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Profile, ProfileLink};
    use pretty_assertions::assert_eq;

    fn ctx() -> UserContext {
        UserContext::from_profile(
            Profile {
                display_name: "Jane".to_string(),
                bio: None,
                avatar_url: None,
            },
            vec![
                ProfileLink {
                    id: "1".to_string(),
                    title: "Site".to_string(),
                    url: "https://jane.dev".to_string(),
                    is_active: true,
                },
                ProfileLink {
                    id: "2".to_string(),
                    title: "X".to_string(),
                    url: "https://x.com/jane".to_string(),
                    is_active: true,
                },
            ],
        )
    }

    #[test]
    fn test_plain_text_short_circuits() {
        let content = parse_ai_response("plain text", None);
        assert_eq!(content.content_type(), ContentType::Text);
        assert_eq!(
            content.data,
            ContentData::Text(TextData {
                content: "plain text".to_string()
            })
        );
        let metadata = content.metadata.unwrap();
        assert!(metadata.original_content.is_none());
        assert!(metadata.structured_data.is_none());
    }

    #[test]
    fn test_structured_cards_response() {
        let text = "[CARDS] Here is what I offer\n```json\n{\"title\":\"Offer\",\"cards\":[{\"id\":\"1\",\"title\":\"A\",\"description\":\"d\"}]}\n```";
        let content = parse_ai_response(text, None);

        let ContentData::Cards(cards) = &content.data else {
            panic!("expected cards, got {:?}", content.content_type());
        };
        assert_eq!(cards.title.as_deref(), Some("Offer"));
        assert_eq!(cards.cards[0].title, "A");

        let metadata = content.metadata.as_ref().unwrap();
        assert_eq!(metadata.original_content.as_deref(), Some(text));
        assert_eq!(metadata.structured_data.as_ref().unwrap()["title"], "Offer");
    }

    #[test]
    fn test_contact_response_uses_user_context() {
        let user = ctx();
        let content = parse_ai_response("You can reach me here.", Some(&user));

        let ContentData::Contact(contact) = &content.data else {
            panic!("expected contact, got {:?}", content.content_type());
        };
        assert_eq!(contact.methods.len(), 2);
        assert!(contact.methods[0].preferred);
        assert_eq!(
            content.metadata.unwrap().user_context.as_ref(),
            Some(&user)
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let user = ctx();
        let text = "[TABS]\n## One\nFirst\n## Two\nSecond\n\nSuggested questions:\n- More?";
        assert_eq!(
            parse_ai_response(text, Some(&user)),
            parse_ai_response(text, Some(&user))
        );
    }

    #[test]
    fn test_serialized_shape() {
        let content = parse_ai_response("[ACCORDION] Do you ship?\nYes.", None);
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["type"], "accordion");
        assert_eq!(value["data"]["items"][0]["question"], "Do you ship?");
        assert_eq!(
            value["metadata"]["originalContent"],
            "[ACCORDION] Do you ship?\nYes."
        );
    }
}
