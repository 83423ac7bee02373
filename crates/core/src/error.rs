//! Error types for the Scribeloop domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] wraps them all.

use thiserror::Error;

use crate::run::Stage;

/// The top-level error type for all Scribeloop operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Search errors ---
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    // --- Pipeline errors ---
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the text-completion provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Failures of the search provider.
///
/// These never abort a run: the researcher turns them into placeholder notes.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("search backend returned status {status_code}: {message}")]
    Http { status_code: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("could not decode search response: {0}")]
    Decode(String),

    #[error("search backend not configured: {0}")]
    NotConfigured(String),
}

/// Run-level failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("{stage} failed: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: ProviderError,
    },
}

impl PipelineError {
    /// Short machine-readable kind, used by the HTTP surface.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::EmptyTopic => "validation",
            PipelineError::Generation { .. } => "generation",
        }
    }
}
