//! DuckDuckGo web search backend.
//!
//! Scrapes the JavaScript-free results page at
//! `https://html.duckduckgo.com/html/?q=...`; no key needed. Result links
//! point at DuckDuckGo's redirector and are unwrapped to the target URL.
//! Sponsored results are skipped.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use scribeloop_core::error::SearchError;
use scribeloop_core::search::{SearchProvider, SearchResult};
use std::time::Duration;
use tracing::debug;

use crate::{http_client, transport_error};

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

pub struct DuckDuckGoSearch {
    base_url: String,
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client: http_client(timeout)?,
        })
    }

    /// Point at a different host (mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/html/?q={}", self.base_url, urlencoding::encode(query));

        let response = self.client.get(&url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let page = response.text().await.map_err(transport_error)?;
        let results = parse_results(&page, max_results)?;
        debug!(query, count = results.len(), "DuckDuckGo search complete");
        Ok(results)
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Decode(format!("bad selector {css}: {e:?}")))
}

/// Pull organic results out of a results page.
///
/// A page without the `#links` container is not a results page (rate-limit
/// and challenge pages look like this) and is a decode error.
fn parse_results(page: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(page);
    let links = selector("#links")?;
    let result = selector("div.result")?;
    let title = selector("a.result__a")?;
    let snippet = selector(".result__snippet")?;

    let Some(container) = document.select(&links).next() else {
        return Err(SearchError::Decode(
            "page has no result list (rate limited?)".into(),
        ));
    };

    let mut results = Vec::new();
    for element in container.select(&result) {
        if results.len() == max_results {
            break;
        }
        let is_ad = element
            .value()
            .attr("class")
            .is_some_and(|c| c.contains("result--ad"));
        if is_ad {
            continue;
        }

        let Some(anchor) = element.select(&title).next() else {
            continue;
        };
        let href = anchor.value().attr("href").map(unwrap_redirect).unwrap_or_default();
        if href.is_empty() {
            continue;
        }
        let body = element
            .select(&snippet)
            .next()
            .map(|s| squash(&s))
            .unwrap_or_default();

        results.push(SearchResult::new(squash(&anchor), body, href));
    }

    Ok(results)
}

/// Collapse an element's text into one line.
fn squash(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `//duckduckgo.com/l/?uddg=<encoded target>&rut=...` → the target URL.
fn unwrap_redirect(href: &str) -> String {
    if let Some((_, rest)) = href.split_once("uddg=") {
        let encoded = rest.split('&').next().unwrap_or(rest);
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return decoded.into_owned();
        }
    }
    match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_string(),
    }
}
