//! REST wrapper over Gemini's `generateContent` endpoint.

use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::ai::http::decode_response;
use crate::Result;
use reqwest::Client;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PROVIDER: &str = "Gemini";

pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

fn generate_content_url(base_url: &str, model: &str) -> String {
    format!("{}/v1beta/models/{}:generateContent", base_url, model)
}

impl GeminiHttpClient {
    /// `model` is the bare model ID (for example `gemini-2.0-flash`); a
    /// `models/` prefix is stripped.
    pub fn new_with_client(api_key: String, model: String, client: Client) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();
        let endpoint = generate_content_url(DEFAULT_BASE_URL, &model);

        Self {
            client,
            api_key,
            model,
            endpoint,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.endpoint = generate_content_url(&base_url, &self.model);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One `generateContent` round trip. Refused credentials come back as
    /// [`crate::Error::ProviderUnavailable`].
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
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
