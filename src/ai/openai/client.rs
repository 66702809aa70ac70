//! REST wrapper over OpenAI's chat completions endpoint.

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::ai::http::decode_response;
use crate::Result;
use reqwest::Client;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const PROVIDER: &str = "OpenAI";

pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            endpoint: format!("{}{}", DEFAULT_BASE_URL, CHAT_COMPLETIONS_PATH),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.endpoint = format!("{}{}", base_url, CHAT_COMPLETIONS_PATH);
        self
    }

    /// One chat completion round trip. Refused credentials come back as
    /// [`crate::Error::ProviderUnavailable`].
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to {}: {}", PROVIDER, e);
                e
            })?;

        decode_response(PROVIDER, response).await
    }
}
