//! Pipeline progress events.
//!
//! The orchestrator publishes an event at every stage boundary. Front ends
//! subscribe to show progress notices; nobody is required to listen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::run::Stage;

/// Everything the pipeline reports while a run is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// A run accepted its topic
    RunStarted {
        run_id: String,
        topic: String,
        timestamp: DateTime<Utc>,
    },

    /// The machine entered a node stage
    StageEntered {
        run_id: String,
        stage: Stage,
        /// 1-based writer/critic pass; 0 for research
        pass: u32,
        timestamp: DateTime<Utc>,
    },

    /// The search backend failed and placeholder notes were used
    SearchFailed {
        run_id: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The critic never approved and the revision cap stopped the loop
    RevisionBudgetExhausted {
        run_id: String,
        revision_count: u32,
        timestamp: DateTime<Utc>,
    },

    /// The run reached `Done`
    RunFinished {
        run_id: String,
        revision_count: u32,
        approved: bool,
        timestamp: DateTime<Utc>,
    },

    /// A generation call failed and the run was abandoned
    RunFailed {
        run_id: String,
        stage: Stage,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for pipeline events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<PipelineEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: PipelineEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<PipelineEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
