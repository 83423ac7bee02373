//! The research → write → critique loop.
//!
//! ```text
//!  topic
//!    │
//!    ▼
//! ┌────────────┐   ┌────────┐   ┌────────┐  approved / cap reached
//! │ Researcher │──▶│ Writer │──▶│ Critic │──────────────────────────▶ Done
//! └────────────┘   └────────┘   └────────┘
//!                      ▲             │ needs revision
//!                      └─────────────┘
//! ```
//!
//! [`Pipeline`] owns the state machine; the nodes in [`nodes`] only turn
//! typed inputs into typed outputs.

pub mod nodes;
pub mod orchestrator;
pub mod prompts;
pub mod verdict;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use nodes::{Critic, Draft, GenerationSettings, ResearchNotes, Researcher, Review, Writer, WriterInput};
pub use orchestrator::{Pipeline, PipelineSettings, next_stage};
pub use verdict::Verdict;
