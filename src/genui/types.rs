//! Renderable content shapes produced from a completion.

use crate::models::UserContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of layouts a response can be rendered as.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Cards,
    Carousel,
    Accordion,
    Tabs,
    Contact,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Text,
        ContentType::Cards,
        ContentType::Carousel,
        ContentType::Accordion,
        ContentType::Tabs,
        ContentType::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Cards => "cards",
            ContentType::Carousel => "carousel",
            ContentType::Accordion => "accordion",
            ContentType::Tabs => "tabs",
            ContentType::Contact => "contact",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    Link,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarouselItem {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarouselData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<CarouselItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccordionItem {
    #[serde(default)]
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccordionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<AccordionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tab {
    #[serde(default)]
    pub id: String,
    pub label: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethodType {
    Email,
    Social,
    Website,
    Phone,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: ContactMethodType,
    pub label: String,
    pub value: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preferred: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub methods: Vec<ContactMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextData {
    pub content: String,
}

/// Type-specific payload. The serde tag keeps the `{type, data}` wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ContentData {
    Text(TextData),
    Cards(CardsData),
    Carousel(CarouselData),
    Accordion(AccordionData),
    Tabs(TabsData),
    Contact(ContactData),
}

impl ContentData {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentData::Text(_) => ContentType::Text,
            ContentData::Cards(_) => ContentType::Cards,
            ContentData::Carousel(_) => ContentType::Carousel,
            ContentData::Accordion(_) => ContentType::Accordion,
            ContentData::Tabs(_) => ContentType::Tabs,
            ContentData::Contact(_) => ContentType::Contact,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<UserContext>,
}

/// One fully typed, renderable search result. Never mutated once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerativeContent {
    #[serde(flatten)]
    pub data: ContentData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentMetadata>,
}

impl GenerativeContent {
    pub fn content_type(&self) -> ContentType {
        self.data.content_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_serializes_with_type_and_data() {
        let content = GenerativeContent {
            data: ContentData::Text(TextData {
                content: "hello".to_string(),
            }),
            metadata: None,
        };

        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value, json!({"type": "text", "data": {"content": "hello"}}));
    }

    #[test]
    fn test_contact_method_omits_false_preferred() {
        let method = ContactMethod {
            id: "link-1".to_string(),
            method_type: ContactMethodType::Website,
            label: "Site".to_string(),
            value: "https://jane.dev".to_string(),
            url: "https://jane.dev".to_string(),
            preferred: false,
        };

        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["type"], "website");
        assert!(value.get("preferred").is_none());
    }

    #[test]
    fn test_carousel_item_defaults_media_type() {
        let item: CarouselItem =
            serde_json::from_value(json!({"title": "Shot", "image": "/a.png"})).unwrap();
        assert_eq!(item.media_type, MediaType::Image);
        assert_eq!(item.id, "");
    }

    #[test]
    fn test_content_type_display_matches_wire_name() {
        for content_type in ContentType::ALL {
            let wire = serde_json::to_value(content_type).unwrap();
            assert_eq!(wire, content_type.to_string());
        }
    }
}
