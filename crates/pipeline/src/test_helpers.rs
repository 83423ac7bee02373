//! Shared test doubles for pipeline tests.

use async_trait::async_trait;
use scribeloop_core::error::{ProviderError, SearchError};
use scribeloop_core::message::Message;
use scribeloop_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use scribeloop_core::search::{SearchProvider, SearchResult};
use std::sync::Mutex;

use crate::nodes::GenerationSettings;
use crate::prompts::CRITIC_PERSONA;

pub fn settings() -> GenerationSettings {
    GenerationSettings {
        model: "mock-model".into(),
        temperature: 0.7,
        max_tokens: None,
    }
}

/// A mock provider with one script for writer prompts and one for critic
/// prompts, told apart by the critic persona line.
///
/// When a script runs out its last entry repeats. An empty writer script
/// produces `"# Draft {n}"`; an empty critic script says "needs more sources".
pub struct ScriptedProvider {
    writer_script: Vec<String>,
    critic_script: Vec<String>,
    writer_fails_from: Option<usize>,
    critic_fails_from: Option<usize>,
    writer_calls: Mutex<usize>,
    critic_calls: Mutex<usize>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(writer: &[&str], critic: &[&str]) -> Self {
        Self {
            writer_script: writer.iter().map(|s| s.to_string()).collect(),
            critic_script: critic.iter().map(|s| s.to_string()).collect(),
            writer_fails_from: None,
            critic_fails_from: None,
            writer_calls: Mutex::new(0),
            critic_calls: Mutex::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Critic always answers `text`.
    pub fn critic_always(text: &str) -> Self {
        Self::new(&[], &[text])
    }

    pub fn fail_writer(self) -> Self {
        self.fail_writer_from(0)
    }

    /// Writer call number `n` (0-based) and every later one fail.
    pub fn fail_writer_from(mut self, n: usize) -> Self {
        self.writer_fails_from = Some(n);
        self
    }

    pub fn fail_critic(mut self) -> Self {
        self.critic_fails_from = Some(0);
        self
    }

    pub fn writer_calls(&self) -> usize {
        *self.writer_calls.lock().unwrap()
    }

    pub fn critic_calls(&self) -> usize {
        *self.critic_calls.lock().unwrap()
    }

    pub fn total_calls(&self) -> usize {
        self.writer_calls() + self.critic_calls()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

fn scripted(script: &[String], index: usize) -> Option<String> {
    script.get(index).or_else(|| script.last()).cloned()
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let prompt = request.messages[0].content.clone();
        self.prompts.lock().unwrap().push(prompt.clone());

        let text = if prompt.starts_with(CRITIC_PERSONA) {
            let mut count = self.critic_calls.lock().unwrap();
            let index = *count;
            *count += 1;
            if self.critic_fails_from.is_some_and(|n| index >= n) {
                return Err(ProviderError::Timeout("critic timed out".into()));
            }
            scripted(&self.critic_script, index).unwrap_or_else(|| "needs more sources".into())
        } else {
            let mut count = self.writer_calls.lock().unwrap();
            let index = *count;
            *count += 1;
            if self.writer_fails_from.is_some_and(|n| index >= n) {
                return Err(ProviderError::Network("connection refused".into()));
            }
            scripted(&self.writer_script, index).unwrap_or_else(|| format!("# Draft {}", index + 1))
        };

        Ok(make_text_response(&text))
    }
}

pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Search stub returning fixed results and recording queries.
pub struct StaticSearch {
    results: Vec<SearchResult>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// `n` distinct results.
    pub fn numbered(n: usize) -> Self {
        Self::new(
            (1..=n)
                .map(|i| {
                    SearchResult::new(
                        format!("Result {i}"),
                        format!("Snippet {i}"),
                        format!("https://example.com/{i}"),
                    )
                })
                .collect(),
        )
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    fn name(&self) -> &str {
        "static_mock"
    }

    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.results.clone())
    }
}

/// Search stub that always fails with the given error.
pub struct FailingSearch(pub SearchError);

#[async_trait]
impl SearchProvider for FailingSearch {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        Err(self.0.clone())
    }
}
