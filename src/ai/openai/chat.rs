use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::{Completion, CompletionOptions, CompletionService};
use crate::{Error, Result};
use async_trait::async_trait;

pub struct OpenAiCompletionClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            model,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<Completion> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::new("system", system_prompt),
                ChatMessage::new("user", user_prompt),
            ],
            temperature: options.temperature,
            max_completion_tokens: options.max_tokens,
        };

        let response = self.http.chat_completion(&request).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))?;

        Ok(Completion {
            text,
            usage: response.usage.unwrap_or_default().into(),
        })
    }
}
