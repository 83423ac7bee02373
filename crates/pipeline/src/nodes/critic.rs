//! Critic node: reviews a draft and judges it.

use scribeloop_core::ApprovalMode;
use scribeloop_core::error::ProviderError;
use scribeloop_core::provider::Provider;
use std::sync::Arc;
use tracing::info;

use super::GenerationSettings;
use crate::prompts;
use crate::verdict::Verdict;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub text: String,
    pub verdict: Verdict,
}

pub struct Critic {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
    approval_mode: ApprovalMode,
}

impl Critic {
    pub fn new(
        provider: Arc<dyn Provider>,
        settings: GenerationSettings,
        approval_mode: ApprovalMode,
    ) -> Self {
        Self {
            provider,
            settings,
            approval_mode,
        }
    }

    pub async fn review(&self, draft: &str) -> Result<Review, ProviderError> {
        let prompt = prompts::critic_prompt(draft, self.approval_mode);
        let text = self.settings.generate(self.provider.as_ref(), prompt).await?;
        let verdict = Verdict::from_critique(&text, self.approval_mode);

        info!(
            mode = self.approval_mode.as_str(),
            approved = verdict.is_approved(),
            "Critic: review done"
        );

        Ok(Review { text, verdict })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, settings};

    #[tokio::test]
    async fn approval_is_judged() {
        let provider = Arc::new(ScriptedProvider::new(&[], &["APPROVE, great work"]));
        let critic = Critic::new(provider.clone(), settings(), ApprovalMode::Structured);

        let review = critic.review("# Draft").await.unwrap();
        assert_eq!(review.verdict, Verdict::Approved);
        assert_eq!(review.text, "APPROVE, great work");
        assert!(provider.prompts()[0].contains("# Draft"));
    }

    #[tokio::test]
    async fn legacy_mode_rejects_negations() {
        let provider = Arc::new(ScriptedProvider::new(&[], &["This is not bad, APPROVE"]));
        let critic = Critic::new(provider, settings(), ApprovalMode::Legacy);

        let review = critic.review("# Draft").await.unwrap();
        assert_eq!(review.verdict, Verdict::NeedsRevision);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = Arc::new(ScriptedProvider::new(&[], &[]).fail_critic());
        let critic = Critic::new(provider, settings(), ApprovalMode::Structured);
        assert!(critic.review("d").await.is_err());
    }
}
