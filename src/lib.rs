//! "Ask anything" search for link-in-bio profiles
//!
//! Sends a visitor's question to a language model together with the profile,
//! then turns the free-text completion into one typed, renderable layout
//! (cards, carousel, accordion, tabs, contact or plain text) plus a short list
//! of follow-up questions.

pub mod ai;
pub mod error;
pub mod genui;
pub mod models;
pub mod prompts;
pub mod search;

pub use error::{Error, Result};
pub use genui::{parse_ai_response, GenerativeContent};
