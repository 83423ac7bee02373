//! The three pipeline nodes.
//!
//! Each node takes an explicit input and returns an explicit output; none of
//! them touches the run state. The orchestrator records what they return.

pub mod critic;
pub mod researcher;
pub mod writer;

pub use critic::{Critic, Review};
pub use researcher::{ResearchNotes, Researcher};
pub use writer::{Draft, Writer, WriterInput};

use scribeloop_core::error::ProviderError;
use scribeloop_core::provider::{Provider, ProviderRequest};

/// Model parameters shared by the writer and the critic.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    /// Send `prompt` as a single user message and return the generated text.
    pub(crate) async fn generate(
        &self,
        provider: &dyn Provider,
        prompt: String,
    ) -> Result<String, ProviderError> {
        let request = ProviderRequest::prompt(&self.model, self.temperature, prompt)
            .with_max_tokens(self.max_tokens);
        let response = provider.complete(request).await?;
        Ok(response.message.content)
    }
}
