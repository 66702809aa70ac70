use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::ai::{Completion, CompletionOptions, CompletionService};
use crate::{Error, Result};
use async_trait::async_trait;

pub struct GeminiCompletionClient {
    http: GeminiHttpClient,
}

impl GeminiCompletionClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    /// Concatenated text parts of the first candidate.
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let candidate = response.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[async_trait]
impl CompletionService for GeminiCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<Completion> {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::text(None, system_prompt)),
            contents: vec![Content::text(Some("user"), user_prompt)],
            generation_config: Some(GenerationConfig {
                temperature: Some(options.temperature),
                max_output_tokens: Some(options.max_tokens),
            }),
        };

        tracing::debug!("Sending completion request to Gemini ({})", self.http.model());
        let response = self.http.generate_content(&request).await?;

        let text = Self::extract_text(&response)
            .ok_or_else(|| Error::AiProvider("No text in Gemini response".to_string()))?;

        Ok(Completion {
            text,
            usage: response.usage_metadata.unwrap_or_default().into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.0-flash";
    const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/.+:generateContent$";

    fn make_client(server: &MockServer, api_key: &str, model: &str) -> GeminiCompletionClient {
        GeminiCompletionClient::new(api_key.to_string(), model.to_string())
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_complete_joins_text_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH_REGEX))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "[TABS] " }, { "text": "Work and play" }]
                    }
                }],
                "usageMetadata": {
                    "promptTokenCount": 10,
                    "candidatesTokenCount": 5,
                    "totalTokenCount": 15
                }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);
        let completion = client
            .complete("system", "user", CompletionOptions::default())
            .await
            .unwrap();

        assert_eq!(completion.text, "[TABS] Work and play");
        assert_eq!(completion.usage.completion_tokens, 5);
    }

    #[tokio::test]
    async fn test_complete_sends_system_instruction_and_config() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH_REGEX))
            .and(body_string_contains("\"system_instruction\""))
            .and(body_string_contains("\"maxOutputTokens\":64"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "key", DEFAULT_MODEL);
        client
            .complete(
                "be brief",
                "hi",
                CompletionOptions {
                    temperature: 0.1,
                    max_tokens: 64,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejected_key_is_provider_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH_REGEX))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = make_client(&server, "bad-key", DEFAULT_MODEL);
        let err = client
            .complete("s", "u", CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProviderUnavailable(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_server_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH_REGEX))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
            .mount(&server)
            .await;

        let client = make_client(&server, "key", DEFAULT_MODEL);
        let err = client
            .complete("s", "u", CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)), "{:?}", err);
        assert!(err.to_string().contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH_REGEX))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = make_client(&server, "key", DEFAULT_MODEL);
        let err = client
            .complete("s", "u", CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_strips_models_prefix_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "key", "models/gemini-2.0-flash");
        client
            .complete("s", "u", CompletionOptions::default())
            .await
            .unwrap();
    }
}
