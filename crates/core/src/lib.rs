//! # Scribeloop Core
//!
//! Domain types, traits, and error definitions for the Scribeloop
//! research → write → critique pipeline. This crate has **no HTTP or
//! framework dependencies**: it defines the domain model that the provider,
//! search, pipeline and gateway crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here:
//! - [`Provider`] — text completion (Ollama, OpenAI-compatible endpoints)
//! - [`SearchProvider`] — ranked web search snippets
//!
//! Implementations live in their own crates, so the pipeline can be driven
//! by scripted stubs in tests and by real HTTP clients in production.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod run;
pub mod search;

// Re-export key types at crate root for ergonomics
pub use error::{Error, PipelineError, ProviderError, Result, SearchError};
pub use event::{EventBus, PipelineEvent};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderHealth, ProviderRequest, ProviderResponse, Usage};
pub use run::{ApprovalMode, RunState, Stage, Transition};
pub use search::{SearchProvider, SearchResult};
