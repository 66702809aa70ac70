//! One generator per layout.
//!
//! Each generator takes the raw completion plus the optional structured
//! payload and always produces a complete value. When the payload lacks the
//! matching array (or it does not decode into the item shape) the content is
//! synthesized from the cleaned text instead.

use super::questions::strip_suggested_questions;
use super::structured::strip_json_block;
use super::types::{
    AccordionData, AccordionItem, Card, CardsData, CarouselData, CarouselItem, ContactData,
    ContactMethod, ContactMethodType, MediaType, Tab, TabsData,
};
use crate::models::UserContext;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

/// Image shown for carousel items synthesized without media.
pub const FALLBACK_IMAGE: &str = "/placeholder.svg";

const FALLBACK_QUESTION: &str = "What would you like to know?";
const FALLBACK_TAB_LABEL: &str = "Overview";
const MAX_CONTACT_LINKS: usize = 2;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?:cards|carousel|accordion|tabs|contact)\]").expect("valid regex")
});

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s+(.+?)\s*#*$").expect("valid regex"));

pub fn generate_cards(text: &str, structured: Option<&Value>) -> CardsData {
    let cards = structured_items::<Card>(structured, "cards")
        .map(|mut cards| {
            fill_ids(&mut cards, |c| &mut c.id);
            cards
        })
        .unwrap_or_else(|| {
            let cleaned = clean_text(text);
            let (title, rest) = headline(&cleaned, "Response");
            vec![Card {
                id: "1".to_string(),
                title,
                description: rest.unwrap_or(cleaned),
                url: None,
                badge: None,
                image: None,
            }]
        });

    CardsData {
        title: string_field(structured, "title"),
        description: string_field(structured, "description"),
        cards,
    }
}

pub fn generate_carousel(text: &str, structured: Option<&Value>) -> CarouselData {
    let items = structured_items::<CarouselItem>(structured, "items")
        .map(|mut items| {
            fill_ids(&mut items, |i| &mut i.id);
            items
        })
        .unwrap_or_else(|| {
            let (title, rest) = headline(&clean_text(text), "Highlights");
            vec![CarouselItem {
                id: "1".to_string(),
                title,
                description: rest,
                image: FALLBACK_IMAGE.to_string(),
                media_type: MediaType::Image,
            }]
        });

    CarouselData {
        title: string_field(structured, "title"),
        description: string_field(structured, "description"),
        items,
    }
}

pub fn generate_accordion(text: &str, structured: Option<&Value>) -> AccordionData {
    let items = structured_items::<AccordionItem>(structured, "items")
        .map(|mut items| {
            fill_ids(&mut items, |i| &mut i.id);
            items
        })
        .unwrap_or_else(|| accordion_from_text(&clean_text(text)));

    AccordionData {
        title: string_field(structured, "title"),
        description: string_field(structured, "description"),
        items,
    }
}

pub fn generate_tabs(text: &str, structured: Option<&Value>) -> TabsData {
    let tabs = structured_items::<Tab>(structured, "tabs")
        .map(|mut tabs| {
            fill_ids(&mut tabs, |t| &mut t.id);
            tabs
        })
        .unwrap_or_else(|| tabs_from_text(&clean_text(text)));

    TabsData {
        title: string_field(structured, "title"),
        description: string_field(structured, "description"),
        tabs,
    }
}

/// Contact methods always come from the profile: social links first (the
/// first one preferred), then up to two regular links. No profile, no methods.
pub fn generate_contact(
    text: &str,
    structured: Option<&Value>,
    user_context: Option<&UserContext>,
) -> ContactData {
    let methods = user_context.map(contact_methods).unwrap_or_default();

    let description = string_field(structured, "description").or_else(|| {
        let cleaned = clean_text(text);
        first_line(&cleaned).map(str::to_string)
    });

    ContactData {
        title: string_field(structured, "title"),
        description,
        methods,
    }
}

fn contact_methods(ctx: &UserContext) -> Vec<ContactMethod> {
    let social = ctx.social_links.iter().enumerate().map(|(i, social)| {
        let value = social
            .username
            .as_ref()
            .map(|u| format!("@{}", u))
            .unwrap_or_else(|| social.url.clone());
        ContactMethod {
            id: format!("social-{}", i + 1),
            method_type: ContactMethodType::Social,
            label: social.platform.label().to_string(),
            value,
            url: social.url.clone(),
            preferred: i == 0,
        }
    });

    let links = ctx.links.iter().take(MAX_CONTACT_LINKS).map(|link| {
        let (method_type, value) = if let Some(address) = link.url.strip_prefix("mailto:") {
            (ContactMethodType::Email, address.to_string())
        } else if let Some(number) = link.url.strip_prefix("tel:") {
            (ContactMethodType::Phone, number.to_string())
        } else {
            (ContactMethodType::Website, link.url.clone())
        };
        ContactMethod {
            id: format!("link-{}", link.id),
            method_type,
            label: link.title.clone(),
            value,
            url: link.url.clone(),
            preferred: false,
        }
    });

    social.chain(links).collect()
}

/// Naive Q/A pairing: a line containing `?` is a question, the next line its
/// answer. Without any question the whole text answers a generic one.
fn accordion_from_text(cleaned: &str) -> Vec<AccordionItem> {
    let lines: Vec<&str> = cleaned
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut items = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].contains('?') {
            let answer = lines.get(i + 1).copied().unwrap_or_default();
            items.push(AccordionItem {
                id: (items.len() + 1).to_string(),
                question: lines[i].to_string(),
                answer: answer.to_string(),
            });
            i += 2;
        } else {
            i += 1;
        }
    }

    if items.is_empty() {
        items.push(AccordionItem {
            id: "1".to_string(),
            question: FALLBACK_QUESTION.to_string(),
            answer: cleaned.to_string(),
        });
    }
    items
}

/// Split on Markdown headings; text before the first heading becomes an
/// overview tab. No headings gives a single overview tab.
fn tabs_from_text(cleaned: &str) -> Vec<Tab> {
    let mut sections: Vec<(String, Vec<&str>)> = vec![(FALLBACK_TAB_LABEL.to_string(), Vec::new())];

    for line in cleaned.lines() {
        match HEADING_RE.captures(line.trim()) {
            Some(caps) => sections.push((caps[1].to_string(), Vec::new())),
            None => {
                if let Some((_, body)) = sections.last_mut() {
                    body.push(line);
                }
            }
        }
    }

    let has_headings = sections.len() > 1;
    sections
        .into_iter()
        .map(|(label, body)| (label, body.join("\n").trim().to_string()))
        .enumerate()
        .filter(|(i, (_, content))| !(has_headings && *i == 0 && content.is_empty()))
        .enumerate()
        .map(|(n, (_, (label, content)))| Tab {
            id: (n + 1).to_string(),
            label,
            content,
        })
        .collect()
}

/// Display text with markers, the JSON block and the follow-up section removed.
pub(crate) fn clean_text(text: &str) -> String {
    let without_markers = MARKER_RE.replace_all(text, "");
    let without_json = strip_json_block(&without_markers);
    strip_suggested_questions(&without_json).trim().to_string()
}

fn first_line(text: &str) -> Option<&str> {
    text.lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty())
}

/// First line as a title plus whatever follows it, if anything.
fn headline(cleaned: &str, default_title: &str) -> (String, Option<String>) {
    let Some(title) = first_line(cleaned) else {
        return (default_title.to_string(), None);
    };

    let rest = cleaned
        .lines()
        .skip_while(|l| l.trim().trim_start_matches('#').trim() != title)
        .skip(1)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    (title.to_string(), (!rest.is_empty()).then_some(rest))
}

fn string_field(structured: Option<&Value>, key: &str) -> Option<String> {
    structured?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Decode `structured[key]` as a non-empty array of `T`.
fn structured_items<T: DeserializeOwned>(structured: Option<&Value>, key: &str) -> Option<Vec<T>> {
    let value = structured?.get(key)?;
    if !value.is_array() {
        return None;
    }

    match serde_json::from_value::<Vec<T>>(value.clone()) {
        Ok(items) if !items.is_empty() => Some(items),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Ignoring structured '{}' that does not fit: {}", key, e);
            None
        }
    }
}

fn fill_ids<T>(items: &mut [T], id_of: impl Fn(&mut T) -> &mut String) {
    for (i, item) in items.iter_mut().enumerate() {
        let id = id_of(item);
        if id.trim().is_empty() {
            *id = (i + 1).to_string();
        }
    }
}
