//! Visitor search: provider calls plus the UI-facing state machine.
//!
//! [`SearchService`] wraps the completion provider with the profile prompt
//! and a time budget. [`SearchOrchestrator`] owns the [`SearchState`] a
//! renderer observes and moves it through
//! `Idle -> Loading -> Success | Error -> Idle`.
//!
//! Every search takes a sequence number. A result is only applied if its
//! number is still the latest issued, so a slow earlier search can never
//! overwrite a newer one, and `clear()` discards anything in flight.

use crate::ai::{CompletionOptions, CompletionService, Usage};
use crate::genui::questions::{bullet_lines, MAX_SUGGESTED_QUESTIONS};
use crate::genui::{extract_suggested_questions, parse_ai_response, GenerativeContent};
use crate::models::{Config, UserContext};
use crate::{prompts, Error, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Shown when the provider fails or is not configured.
pub const ERROR_MESSAGE: &str =
    "Sorry, I couldn't find an answer right now. Please try again in a moment.";

/// Shown when the provider exceeds its time budget.
pub const TIMEOUT_MESSAGE: &str =
    "That took longer than expected. Please try again in a moment.";

/// Starter prompts used whenever the provider cannot supply its own.
pub const DEFAULT_SUGGESTED_QUESTIONS: [&str; 4] = [
    "What do you do?",
    "What services do you offer?",
    "How can I contact you?",
    "What are you working on right now?",
];

pub fn default_suggested_questions() -> Vec<String> {
    DEFAULT_SUGGESTED_QUESTIONS
        .iter()
        .map(|q| q.to_string())
        .collect()
}

/// One completed provider search, already parsed.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub content: GenerativeContent,
    pub suggested_questions: Vec<String>,
    pub usage: Usage,
}

/// Provider access for one profile.
pub struct SearchService {
    provider: Option<Arc<dyn CompletionService>>,
    user_context: UserContext,
    options: CompletionOptions,
    timeout: Duration,
}

impl SearchService {
    pub fn new(
        provider: Option<Arc<dyn CompletionService>>,
        user_context: UserContext,
        options: CompletionOptions,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            user_context,
            options,
            timeout,
        }
    }

    pub fn from_config(
        provider: Option<Arc<dyn CompletionService>>,
        user_context: UserContext,
        config: &Config,
    ) -> Self {
        Self::new(
            provider,
            user_context,
            CompletionOptions {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
            config.timeout,
        )
    }

    pub fn user_context(&self) -> &UserContext {
        &self.user_context
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<(String, Usage)> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            Error::ProviderUnavailable("no completion provider configured".to_string())
        })?;

        let completion = tokio::time::timeout(
            self.timeout,
            provider.complete(system_prompt, user_prompt, self.options),
        )
        .await
        .map_err(|_| Error::Timeout(self.timeout))??;

        Ok((completion.text, completion.usage))
    }

    /// Ask the provider about the profile and parse what comes back.
    pub async fn search_with_ai(&self, query: &str) -> Result<SearchOutcome> {
        let system_prompt = prompts::build_search_system_prompt(&self.user_context);
        let (text, usage) = self.complete(&system_prompt, query).await?;

        let content = parse_ai_response(&text, Some(&self.user_context));
        let suggested_questions = extract_suggested_questions(&text);
        debug!(
            "Search produced {} content with {} follow-ups ({} tokens)",
            content.content_type(),
            suggested_questions.len(),
            usage.total_tokens
        );

        Ok(SearchOutcome {
            content,
            suggested_questions,
            usage,
        })
    }

    /// Starter questions for the profile. Never fails: any provider problem or
    /// an empty reply yields [`DEFAULT_SUGGESTED_QUESTIONS`].
    pub async fn generate_suggested_questions(&self) -> Vec<String> {
        let user_prompt = prompts::build_suggestions_user_prompt(&self.user_context);

        match self.complete(prompts::SUGGESTIONS_SYSTEM, &user_prompt).await {
            Ok((text, _)) => {
                let questions: Vec<String> = bullet_lines(&text, usize::MAX)
                    .into_iter()
                    .filter(|q| q.ends_with('?'))
                    .take(MAX_SUGGESTED_QUESTIONS)
                    .collect();
                if questions.is_empty() {
                    debug!("Provider returned no usable starter questions");
                    default_suggested_questions()
                } else {
                    questions
                }
            }
            Err(e) => {
                warn!("Falling back to default suggested questions: {}", e);
                default_suggested_questions()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Success(GenerativeContent),
    Error(String),
}

/// Single source of truth for the search UI.
///
/// Serializes as the flat renderer view
/// `{query, isLoading, response, error, suggestedQuestions}`, with the three
/// status fields derived from `phase`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub phase: SearchPhase,
    pub suggested_questions: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchStateView<'a> {
    query: &'a str,
    is_loading: bool,
    response: Option<&'a GenerativeContent>,
    error: Option<&'a str>,
    suggested_questions: &'a [String],
}

impl Serialize for SearchState {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        SearchStateView {
            query: &self.query,
            is_loading: self.is_loading(),
            response: self.response(),
            error: self.error(),
            suggested_questions: &self.suggested_questions,
        }
        .serialize(serializer)
    }
}

impl SearchState {
    fn idle(suggested_questions: Vec<String>) -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::Idle,
            suggested_questions,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading)
    }

    pub fn response(&self) -> Option<&GenerativeContent> {
        match &self.phase {
            SearchPhase::Success(content) => Some(content),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SearchPhase::Error(message) => Some(message),
            _ => None,
        }
    }
}

pub struct SearchOrchestrator {
    service: SearchService,
    state: watch::Sender<SearchState>,
    initial_questions: Mutex<Vec<String>>,
    sequence: AtomicU64,
}

impl SearchOrchestrator {
    pub fn new(service: SearchService) -> Self {
        let (state, _) = watch::channel(SearchState::idle(default_suggested_questions()));
        Self {
            service,
            state,
            initial_questions: Mutex::new(default_suggested_questions()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Load the starter questions once. Only updates the visible list while
    /// no search has started yet.
    pub async fn mount(&self) {
        let questions = self.service.generate_suggested_questions().await;
        info!("Loaded {} starter questions", questions.len());

        *self.lock_initial_questions() = questions.clone();
        self.state.send_if_modified(|state| {
            if matches!(state.phase, SearchPhase::Idle) && state.query.is_empty() {
                state.suggested_questions = questions;
                true
            } else {
                false
            }
        });
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Run one search. Blank queries are ignored. Failures never escape: they
    /// become a static message plus the starter questions.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut seq = 0;
        self.state.send_modify(|state| {
            seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            state.query = query.to_string();
            state.phase = SearchPhase::Loading;
        });
        info!("Search #{} started: {}", seq, query);

        let outcome = self.service.search_with_ai(query).await;
        let initial = self.initial_questions();

        let applied = self.state.send_if_modified(|state| {
            if self.sequence.load(Ordering::SeqCst) != seq {
                return false;
            }
            match outcome {
                Ok(outcome) => {
                    state.suggested_questions = if outcome.suggested_questions.is_empty() {
                        initial
                    } else {
                        outcome.suggested_questions
                    };
                    state.phase = SearchPhase::Success(outcome.content);
                }
                Err(e) => {
                    warn!("Search #{} failed: {}", seq, e);
                    let message = match e {
                        Error::Timeout(_) => TIMEOUT_MESSAGE,
                        _ => ERROR_MESSAGE,
                    };
                    state.phase = SearchPhase::Error(message.to_string());
                    state.suggested_questions = initial;
                }
            }
            true
        });

        if !applied {
            debug!("Discarding stale result for search #{}", seq);
        }
    }

    pub async fn select_suggested_question(&self, question: &str) {
        self.search(question).await;
    }

    /// Re-run the current query, if there is one.
    pub async fn retry(&self) {
        let query = self.state.borrow().query.clone();
        self.search(&query).await;
    }

    /// Back to idle ("ask something else"). Anything in flight is discarded.
    pub fn clear(&self) {
        let initial = self.initial_questions();
        self.state.send_modify(|state| {
            self.sequence.fetch_add(1, Ordering::SeqCst);
            *state = SearchState::idle(initial);
        });
    }

    fn initial_questions(&self) -> Vec<String> {
        self.lock_initial_questions().clone()
    }

    fn lock_initial_questions(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // The list is only ever replaced whole, so a poisoned value is still usable.
        self.initial_questions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
