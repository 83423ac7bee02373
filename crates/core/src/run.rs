//! Run state — the record one pipeline invocation works on.
//!
//! A [`RunState`] is created when a run starts with only the topic set,
//! mutated in place by the orchestrator after each node returns, and handed
//! back to the caller when the run reaches [`Stage::Done`]. Nothing outlives
//! the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A state of the research → write → critique machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Research,
    Write,
    Critique,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Research => "research",
            Stage::Write => "write",
            Stage::Critique => "critique",
            Stage::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the orchestrator decides whether a critique approves the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    /// `APPROVE` anywhere in the text and no `not` anywhere (case-insensitive).
    Legacy,
    /// A `VERDICT:` line decides; text without one falls back to `Legacy`.
    #[default]
    Structured,
}

impl ApprovalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalMode::Legacy => "legacy",
            ApprovalMode::Structured => "structured",
        }
    }
}

/// One edge taken through the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    /// `revision_count` at the moment the edge was taken.
    pub revision_count: u32,
}

/// Shared record of a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    run_id: String,
    topic: String,
    research_data: String,
    draft: String,
    critique: String,
    /// Every critique of the run, oldest first.
    critiques: Vec<String>,
    revision_count: u32,
    draft_count: u32,
    stage: Stage,
    transitions: Vec<Transition>,
    started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
}

impl RunState {
    /// Start a run: only the topic is populated, the machine sits in `Research`.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            topic: topic.into(),
            research_data: String::new(),
            draft: String::new(),
            critique: String::new(),
            critiques: Vec::new(),
            revision_count: 0,
            draft_count: 0,
            stage: Stage::Research,
            transitions: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn research_data(&self) -> &str {
        &self.research_data
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// The latest critique; empty until the first critic pass.
    pub fn critique(&self) -> &str {
        &self.critique
    }

    pub fn critiques(&self) -> &[String] {
        &self.critiques
    }

    /// Number of critic passes made so far.
    pub fn revision_count(&self) -> u32 {
        self.revision_count
    }

    /// Number of drafts the writer produced so far.
    pub fn draft_count(&self) -> u32 {
        self.draft_count
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Store the researcher's notes and reset the revision counter.
    pub fn record_research(&mut self, notes: impl Into<String>) {
        self.research_data = notes.into();
        self.revision_count = 0;
    }

    /// Replace the current draft.
    pub fn record_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
        self.draft_count += 1;
    }

    /// Store a critique and count the critic pass. Returns the new count.
    pub fn record_critique(&mut self, critique: impl Into<String>) -> u32 {
        debug_assert!(self.draft_count > 0, "critique recorded before any draft");
        let critique = critique.into();
        self.critiques.push(critique.clone());
        self.critique = critique;
        self.revision_count += 1;
        self.revision_count
    }

    /// Move the machine to `to`, remembering the edge.
    pub fn advance(&mut self, to: Stage) {
        self.transitions.push(Transition {
            from: self.stage,
            to,
            revision_count: self.revision_count,
        });
        self.stage = to;
        if to == Stage::Done {
            self.finished_at = Some(Utc::now());
        }
    }

    /// `revision_count` after each critic pass, in order.
    pub fn revision_progression(&self) -> Vec<u32> {
        self.transitions
            .iter()
            .filter(|t| t.from == Stage::Critique)
            .map(|t| t.revision_count)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_only_has_topic() {
        let state = RunState::new("Solar Power");
        assert_eq!(state.topic(), "Solar Power");
        assert!(state.research_data().is_empty());
        assert!(state.draft().is_empty());
        assert!(state.critique().is_empty());
        assert_eq!(state.revision_count(), 0);
        assert_eq!(state.stage(), Stage::Research);
        assert!(state.finished_at().is_none());
    }

    #[test]
    fn critique_increments_revision_count() {
        let mut state = RunState::new("t");
        state.record_research("notes");
        state.record_draft("# Draft");
        assert_eq!(state.record_critique("needs work"), 1);
        state.record_draft("# Draft 2");
        assert_eq!(state.record_critique("APPROVE"), 2);
        assert_eq!(state.critique(), "APPROVE");
        assert_eq!(state.critiques(), &["needs work".to_string(), "APPROVE".to_string()]);
        assert_eq!(state.draft_count(), 2);
    }

    #[test]
    fn research_resets_counter() {
        let mut state = RunState::new("t");
        state.record_draft("d");
        state.record_critique("c");
        state.record_research("fresh notes");
        assert_eq!(state.revision_count(), 0);
    }

    #[test]
    fn advance_records_transitions_and_finish_time() {
        let mut state = RunState::new("t");
        state.advance(Stage::Write);
        state.record_draft("d");
        state.advance(Stage::Critique);
        state.record_critique("APPROVE");
        state.advance(Stage::Done);

        assert!(state.is_done());
        assert!(state.finished_at().is_some());
        assert_eq!(state.transitions().len(), 3);
        assert_eq!(state.transitions()[2].from, Stage::Critique);
        assert_eq!(state.revision_progression(), vec![1]);
    }

    #[test]
    fn stage_display_is_lowercase() {
        assert_eq!(Stage::Critique.to_string(), "critique");
        let json = serde_json::to_string(&Stage::Done).unwrap();
        assert_eq!(json, "\"done\"");
    }

    #[test]
    fn run_state_serializes_fields_for_display() {
        let mut state = RunState::new("Solar Power");
        state.record_research("notes");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["topic"], "Solar Power");
        assert_eq!(json["research_data"], "notes");
        assert_eq!(json["revision_count"], 0);
        assert_eq!(json["stage"], "research");
        assert!(json.get("finished_at").is_none());
    }
}
