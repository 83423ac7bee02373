//! Search provider trait — ranked web snippets for the researcher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub body: String,
    pub href: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, body: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            href: href.into(),
        }
    }
}

/// A web search backend.
///
/// Implementations return at most `max_results` records, best match first.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Backend name (e.g., "duckduckgo", "searxng", "offline").
    fn name(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError>;
}
