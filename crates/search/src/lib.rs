//! Web search backends for Scribeloop.
//!
//! All backends implement `scribeloop_core::SearchProvider`:
//! - `duckduckgo` — DuckDuckGo HTML web results (no key needed)
//! - `searxng` — a self-hosted or public SearXNG instance
//! - `offline` — deterministic canned results, no network

pub mod duckduckgo;
pub mod offline;
pub mod searxng;

#[cfg(test)]
pub(crate) mod test_server;

use std::sync::Arc;
use std::time::Duration;

use scribeloop_config::SearchConfig;
use scribeloop_core::error::SearchError;
use scribeloop_core::search::SearchProvider;

pub use duckduckgo::DuckDuckGoSearch;
pub use offline::OfflineSearch;
pub use searxng::SearxngSearch;

/// Build the configured search backend.
pub fn build_from_config(config: &SearchConfig) -> Result<Arc<dyn SearchProvider>, SearchError> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let search: Arc<dyn SearchProvider> = match config.backend.as_str() {
        "duckduckgo" => {
            let ddg = DuckDuckGoSearch::new(timeout)?;
            match &config.endpoint {
                Some(endpoint) => Arc::new(ddg.with_base_url(endpoint)),
                None => Arc::new(ddg),
            }
        }
        "searxng" => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                SearchError::NotConfigured("searxng backend needs search.endpoint".into())
            })?;
            Arc::new(SearxngSearch::new(endpoint, timeout)?)
        }
        "offline" => Arc::new(OfflineSearch),
        other => {
            return Err(SearchError::NotConfigured(format!(
                "unknown search backend '{other}'"
            )));
        }
    };

    tracing::debug!(backend = search.name(), "Search backend built");
    Ok(search)
}

/// Map a transport failure onto the domain error.
pub(crate) fn transport_error(err: reqwest::Error) -> SearchError {
    SearchError::Network(err.to_string())
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("scribeloop/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SearchError::NotConfigured(format!("Failed to create HTTP client: {e}")))
}
