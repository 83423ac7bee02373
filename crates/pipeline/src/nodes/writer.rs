//! Writer node: drafts the markdown article.

use scribeloop_core::error::ProviderError;
use scribeloop_core::provider::Provider;
use std::sync::Arc;
use tracing::{debug, info};

use super::GenerationSettings;
use crate::prompts;

#[derive(Debug, Clone, Copy)]
pub struct WriterInput<'a> {
    pub topic: &'a str,
    pub research_data: &'a str,
    /// Latest critique; empty on the first pass.
    pub critique: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
}

pub struct Writer {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
}

impl Writer {
    pub fn new(provider: Arc<dyn Provider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub async fn write(&self, input: WriterInput<'_>) -> Result<Draft, ProviderError> {
        info!(
            model = %self.settings.model,
            revising = !input.critique.is_empty(),
            "Writer: drafting"
        );

        let prompt = prompts::writer_prompt(input.topic, input.research_data, input.critique);
        let text = self.settings.generate(self.provider.as_ref(), prompt).await?;

        debug!(chars = text.len(), "Writer: draft ready");
        Ok(Draft { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, settings};

    #[tokio::test]
    async fn returns_raw_model_text() {
        let provider = Arc::new(ScriptedProvider::new(&["# Solar Power\n\nBody"], &[]));
        let writer = Writer::new(provider.clone(), settings());

        let draft = writer
            .write(WriterInput {
                topic: "Solar Power",
                research_data: "notes",
                critique: "",
            })
            .await
            .unwrap();
        assert_eq!(draft.text, "# Solar Power\n\nBody");
        assert_eq!(provider.writer_calls(), 1);
    }

    #[tokio::test]
    async fn prompt_includes_previous_critique() {
        let provider = Arc::new(ScriptedProvider::new(&["draft"], &[]));
        let writer = Writer::new(provider.clone(), settings());

        writer
            .write(WriterInput {
                topic: "Solar Power",
                research_data: "notes",
                critique: "needs more sources",
            })
            .await
            .unwrap();

        let prompts = provider.prompts();
        assert!(prompts[0].contains("Previous Critique (if any): needs more sources"));
        assert!(prompts[0].contains("Research Data: notes"));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = Arc::new(ScriptedProvider::new(&[], &[]).fail_writer());
        let writer = Writer::new(provider, settings());

        let err = writer
            .write(WriterInput {
                topic: "t",
                research_data: "",
                critique: "",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
