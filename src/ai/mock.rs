use super::{Completion, CompletionOptions, CompletionService, Usage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted provider reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(String),
    /// Reply with `text` after sleeping for the given duration.
    Delayed(Duration, String),
}

/// Recorded `(system_prompt, user_prompt)` pair.
pub type PromptRecord = (String, String);

#[derive(Clone)]
pub struct MockCompletionClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<PromptRecord>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn with_text_response(self, text: &str) -> Self {
        self.with_reply(MockReply::Text(text.to_string()))
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.with_reply(MockReply::Fail(message.to_string()))
    }

    pub fn with_delayed_response(self, delay: Duration, text: &str) -> Self {
        self.with_reply(MockReply::Delayed(delay, text.to_string()))
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_prompts(&self) -> Vec<PromptRecord> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _options: CompletionOptions,
    ) -> Result<Completion> {
        // Guards are scoped so nothing is held across the sleep below.
        let reply = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            self.prompts
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));

            let replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                MockReply::Text(format!("You asked: {}", user_prompt))
            } else {
                replies[(*count - 1) % replies.len()].clone()
            }
        };

        let text = match reply {
            MockReply::Text(text) => text,
            MockReply::Fail(message) => return Err(Error::AiProvider(message)),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                text
            }
        };

        let completion_tokens = text.split_whitespace().count() as u32;
        Ok(Completion {
            text,
            usage: Usage {
                prompt_tokens: 0,
                completion_tokens,
                total_tokens: completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_reply_echoes_prompt() {
        let client = MockCompletionClient::new();
        let completion = client
            .complete("system", "hello there", CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(completion.text, "You asked: hello there");
        assert_eq!(completion.usage.completion_tokens, 4);
    }

    #[tokio::test]
    async fn test_replies_cycle_and_record_prompts() {
        let client = MockCompletionClient::new()
            .with_text_response("first")
            .with_failure("boom");

        let options = CompletionOptions::default();
        assert_eq!(client.complete("s", "a", options).await.unwrap().text, "first");
        assert!(matches!(
            client.complete("s", "b", options).await.unwrap_err(),
            Error::AiProvider(_)
        ));
        assert_eq!(client.complete("s", "c", options).await.unwrap().text, "first");

        assert_eq!(client.get_call_count(), 3);
        let users: Vec<String> = client.get_prompts().into_iter().map(|(_, u)| u).collect();
        assert_eq!(users, vec!["a", "b", "c"]);
    }
}
