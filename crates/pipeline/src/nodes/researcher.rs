//! Researcher node: one web search, serialized into research notes.

use scribeloop_core::search::{SearchProvider, SearchResult};
use std::sync::Arc;
use tracing::{info, warn};

use crate::prompts;

/// What the researcher hands to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchNotes {
    /// The query that was sent to the search backend.
    pub query: String,
    /// Formatted results, or a placeholder when there were none.
    pub text: String,
    pub result_count: usize,
    /// Set when the search failed and `text` is the failure placeholder.
    pub search_error: Option<String>,
}

pub struct Researcher {
    search: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl Researcher {
    pub fn new(search: Arc<dyn SearchProvider>, max_results: usize) -> Self {
        Self { search, max_results }
    }

    /// Search for `topic`. Never fails: search errors become placeholder notes.
    pub async fn research(&self, topic: &str) -> ResearchNotes {
        let query = prompts::research_query(topic);
        info!(backend = self.search.name(), %query, "Researcher: searching");

        match self.search.search(&query, self.max_results).await {
            Ok(results) if results.is_empty() => {
                warn!(%query, "Researcher: no search results");
                ResearchNotes {
                    text: format!("No search results found for: {query}"),
                    query,
                    result_count: 0,
                    search_error: None,
                }
            }
            Ok(mut results) => {
                results.truncate(self.max_results);
                ResearchNotes {
                    text: format_results(&results),
                    query,
                    result_count: results.len(),
                    search_error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Researcher: search failed, continuing with placeholder");
                ResearchNotes {
                    text: format!("Search failed: {e}"),
                    query,
                    result_count: 0,
                    search_error: Some(e.to_string()),
                }
            }
        }
    }
}

/// `"{title}\n{body}\nSource: {href}"` per result, separated by a blank line.
pub fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}\n{}\nSource: {}", r.title, r.body, r.href))
        .collect::<Vec<_>>()
        .join("\n\n")
}
