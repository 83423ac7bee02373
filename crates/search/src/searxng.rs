//! SearXNG backend.
//!
//! Queries `{endpoint}/search?q=...&format=json`. The instance must have the
//! JSON output format enabled in its `settings.yml`.

use async_trait::async_trait;
use scribeloop_core::error::SearchError;
use scribeloop_core::search::{SearchProvider, SearchResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{http_client, transport_error};

pub struct SearxngSearch {
    endpoint: String,
    client: reqwest::Client,
}

impl SearxngSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl SearchProvider for SearxngSearch {
    fn name(&self) -> &str {
        "searxng"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!(
            "{}/search?q={}&format=json",
            self.endpoint,
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: SearxngResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        let results: Vec<SearchResult> = body
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchResult::new(r.title, r.content, r.url))
            .collect();

        debug!(query, count = results.len(), "SearXNG search complete");
        Ok(results)
    }
}

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}
