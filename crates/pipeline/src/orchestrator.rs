//! The orchestrator: owns a run's state and drives the
//! `Research → Write → Critique → {Write | Done}` machine.
//!
//! After every critique:
//! 1. an approving critique ends the run;
//! 2. otherwise, once `revision_count` reaches `max_revisions`, the run ends
//!    anyway with the latest draft;
//! 3. otherwise the writer gets another pass with the critique.
//!
//! A provider failure in the writer or critic abandons the run. Search
//! failures never do.

use chrono::Utc;
use scribeloop_config::AppConfig;
use scribeloop_core::error::{Error, PipelineError, ProviderError};
use scribeloop_core::event::{EventBus, PipelineEvent};
use scribeloop_core::provider::Provider;
use scribeloop_core::run::{ApprovalMode, RunState, Stage};
use scribeloop_core::search::SearchProvider;
use std::sync::Arc;
use tracing::{info, warn};

use crate::nodes::{Critic, GenerationSettings, Researcher, Writer, WriterInput};

/// Knobs for one pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub generation: GenerationSettings,
    pub max_revisions: u32,
    pub approval_mode: ApprovalMode,
    pub max_results: usize,
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            generation: GenerationSettings {
                model: config.provider.model.clone(),
                temperature: config.provider.temperature,
                max_tokens: config.provider.max_tokens,
            },
            max_revisions: config.pipeline.max_revisions,
            approval_mode: config.pipeline.approval_mode,
            max_results: config.search.max_results,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Where the machine goes after a critique.
pub fn next_stage(approved: bool, revision_count: u32, max_revisions: u32) -> Stage {
    if approved || revision_count >= max_revisions {
        Stage::Done
    } else {
        Stage::Write
    }
}

pub struct Pipeline {
    provider: Arc<dyn Provider>,
    search: Arc<dyn SearchProvider>,
    researcher: Researcher,
    writer: Writer,
    critic: Critic,
    settings: PipelineSettings,
    event_bus: Arc<EventBus>,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn Provider>,
        search: Arc<dyn SearchProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            researcher: Researcher::new(search.clone(), settings.max_results),
            writer: Writer::new(provider.clone(), settings.generation.clone()),
            critic: Critic::new(
                provider.clone(),
                settings.generation.clone(),
                settings.approval_mode,
            ),
            provider,
            search,
            settings,
            event_bus: Arc::new(EventBus::default()),
        }
    }

    /// Build the provider and search backend named in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let provider = scribeloop_providers::build_from_config(&config.provider)?;
        let search = scribeloop_search::build_from_config(&config.search)?;
        Ok(Self::new(provider, search, PipelineSettings::from_config(config)))
    }

    /// Publish progress on a shared bus instead of a private one.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn search(&self) -> &Arc<dyn SearchProvider> {
        &self.search
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the whole loop for `topic` and return the finished state.
    pub async fn run(&self, topic: &str) -> Result<RunState, PipelineError> {
        if topic.trim().is_empty() {
            return Err(PipelineError::EmptyTopic);
        }

        let mut state = RunState::new(topic);
        let run_id = state.run_id().to_string();
        let mut approved = false;

        info!(run_id = %run_id, topic, "Pipeline: run started");
        self.event_bus.publish(PipelineEvent::RunStarted {
            run_id: run_id.clone(),
            topic: topic.to_string(),
            timestamp: Utc::now(),
        });

        loop {
            match state.stage() {
                Stage::Research => {
                    self.enter(&run_id, Stage::Research, 0);
                    let notes = self.researcher.research(state.topic()).await;
                    if let Some(error_message) = notes.search_error {
                        self.event_bus.publish(PipelineEvent::SearchFailed {
                            run_id: run_id.clone(),
                            error_message,
                            timestamp: Utc::now(),
                        });
                    }
                    info!(run_id = %run_id, results = notes.result_count, "Pipeline: research done");
                    state.record_research(notes.text);
                    state.advance(Stage::Write);
                }
                Stage::Write => {
                    self.enter(&run_id, Stage::Write, state.draft_count() + 1);
                    let draft = self
                        .writer
                        .write(WriterInput {
                            topic: state.topic(),
                            research_data: state.research_data(),
                            critique: state.critique(),
                        })
                        .await
                        .map_err(|e| self.fail(&run_id, Stage::Write, e))?;
                    state.record_draft(draft.text);
                    state.advance(Stage::Critique);
                }
                Stage::Critique => {
                    self.enter(&run_id, Stage::Critique, state.revision_count() + 1);
                    let review = self
                        .critic
                        .review(state.draft())
                        .await
                        .map_err(|e| self.fail(&run_id, Stage::Critique, e))?;
                    approved = review.verdict.is_approved();
                    let revision_count = state.record_critique(review.text);

                    let next = next_stage(approved, revision_count, self.settings.max_revisions);
                    if next == Stage::Done && !approved {
                        warn!(
                            run_id = %run_id,
                            revision_count,
                            "Pipeline: max revisions reached without approval"
                        );
                        self.event_bus.publish(PipelineEvent::RevisionBudgetExhausted {
                            run_id: run_id.clone(),
                            revision_count,
                            timestamp: Utc::now(),
                        });
                    }
                    state.advance(next);
                }
                Stage::Done => break,
            }
        }

        info!(
            run_id = %run_id,
            revision_count = state.revision_count(),
            approved,
            "Pipeline: run finished"
        );
        self.event_bus.publish(PipelineEvent::RunFinished {
            run_id,
            revision_count: state.revision_count(),
            approved,
            timestamp: Utc::now(),
        });

        Ok(state)
    }

    fn enter(&self, run_id: &str, stage: Stage, pass: u32) {
        info!(run_id, stage = %stage, pass, "Pipeline: entering stage");
        self.event_bus.publish(PipelineEvent::StageEntered {
            run_id: run_id.to_string(),
            stage,
            pass,
            timestamp: Utc::now(),
        });
    }

    fn fail(&self, run_id: &str, stage: Stage, source: ProviderError) -> PipelineError {
        warn!(run_id, stage = %stage, error = %source, "Pipeline: generation failed");
        self.event_bus.publish(PipelineEvent::RunFailed {
            run_id: run_id.to_string(),
            stage,
            error_message: source.to_string(),
            timestamp: Utc::now(),
        });
        PipelineError::Generation { stage, source }
    }
}
