//! Completion provider integration
//!
//! The pipeline treats the language model as an opaque
//! `complete(system, user, options)` call. OpenAI and Gemini implement it over
//! HTTP; [`MockCompletionClient`] scripts it for tests.

pub mod gemini;
mod http;
pub mod mock;
pub mod openai;

pub use gemini::GeminiCompletionClient;
pub use mock::{MockCompletionClient, MockReply};
pub use openai::OpenAiCompletionClient;

use crate::models::{AiProvider, Config};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<Completion>;
}

/// Build the configured provider, or `None` when its credential is missing.
pub fn build_completion_service(config: &Config) -> Option<Arc<dyn CompletionService>> {
    let Some(api_key) = config.api_key.clone() else {
        tracing::warn!(
            "No API key configured for {:?}; AI search will be unavailable",
            config.provider
        );
        return None;
    };

    // Per-request timeouts are enforced by the caller.
    let http_client = reqwest::Client::new();

    let service: Arc<dyn CompletionService> = match config.provider {
        AiProvider::OpenAi => {
            info!("Completion provider: OpenAI (model: {})", config.model);
            Arc::new(OpenAiCompletionClient::new_with_client(
                api_key,
                config.model.clone(),
                http_client,
            ))
        }
        AiProvider::Gemini => {
            info!("Completion provider: Gemini (model: {})", config.model);
            Arc::new(GeminiCompletionClient::new_with_client(
                api_key,
                config.model.clone(),
                http_client,
            ))
        }
    };
    Some(service)
}
