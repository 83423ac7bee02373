//! Text-completion provider implementations for Scribeloop.
//!
//! All providers implement the `scribeloop_core::Provider` trait.
//! [`build_from_config`] picks the implementation for the configured kind.

pub mod ollama;
pub mod openai_compat;

#[cfg(test)]
pub(crate) mod test_server;

use std::sync::Arc;
use std::time::Duration;

use scribeloop_config::ProviderConfig;
use scribeloop_core::error::ProviderError;
use scribeloop_core::provider::Provider;

pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// `ollama` gets the native client; every other kind is treated as an
/// OpenAI-compatible `/chat/completions` endpoint.
pub fn build_from_config(config: &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let base_url = config.effective_base_url();
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let provider: Arc<dyn Provider> = match config.kind.as_str() {
        "ollama" => Arc::new(
            OllamaProvider::new(&base_url, timeout)?.with_strip_reasoning(config.strip_reasoning),
        ),
        other => Arc::new(OpenAiCompatProvider::new(
            other,
            &base_url,
            config.api_key.clone().unwrap_or_default(),
            timeout,
        )?),
    };

    tracing::debug!(provider = provider.name(), endpoint = %base_url, "Provider built");
    Ok(provider)
}

/// Map a transport failure onto the domain error.
pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Build the shared HTTP client with the configured timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {e}")))
}
