//! Configuration loading, validation, and management for Scribeloop.
//!
//! Loads configuration from `~/.scribeloop/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use scribeloop_core::ApprovalMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.scribeloop/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text-completion provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Web search backend used by the researcher
    #[serde(default)]
    pub search: SearchConfig,

    /// Revision loop settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP front end
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Log verbosity and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// "ollama" or "openai" (any OpenAI-compatible endpoint)
    #[serde(default = "default_provider_kind")]
    pub kind: String,

    /// Endpoint override; the kind's well-known URL is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Drop `<think>...</think>` reasoning blocks from model output
    #[serde(default = "default_true")]
    pub strip_reasoning: bool,
}

fn default_provider_kind() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "deepseek-r1:8b".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &redact(&self.api_key))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("strip_reasoning", &self.strip_reasoning)
            .finish()
    }
}

impl ProviderConfig {
    /// The endpoint to talk to: the override, or the kind's default.
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| default_base_url(&self.kind))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            api_key: None,
            request_timeout_secs: default_request_timeout(),
            strip_reasoning: true,
        }
    }
}

/// Well-known endpoints per provider kind.
pub fn default_base_url(kind: &str) -> String {
    match kind {
        "ollama" => "http://localhost:11434".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => "http://localhost:11434".into(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// "duckduckgo", "searxng" or "offline"
    #[serde(default = "default_search_backend")]
    pub backend: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// SearXNG instance URL (required for the searxng backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_search_backend() -> String {
    "duckduckgo".into()
}
fn default_max_results() -> usize {
    5
}
fn default_search_timeout() -> u64 {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_search_backend(),
            max_results: default_max_results(),
            endpoint: None,
            timeout_secs: default_search_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Critic passes after which the loop stops even without approval
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,

    #[serde(default)]
    pub approval_mode: ApprovalMode,
}

fn default_max_revisions() -> u32 {
    3
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_revisions: default_max_revisions(),
            approval_mode: ApprovalMode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const SEARCH_BACKENDS: &[&str] = &["duckduckgo", "searxng", "offline"];
const MAX_SEARCH_RESULTS: usize = 5;

impl AppConfig {
    /// Load configuration from the default path (~/.scribeloop/config.toml)
    /// and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides, looking variables up through `lookup`.
    ///
    /// - `SCRIBELOOP_PROVIDER`, `SCRIBELOOP_MODEL`
    /// - `SCRIBELOOP_BASE_URL`, then `OLLAMA_HOST` for the ollama kind
    /// - `SCRIBELOOP_API_KEY`, then `OPENAI_API_KEY`
    /// - `SCRIBELOOP_SEARCH_BACKEND`
    /// - `SEARXNG_URL`, only when the backend is `searxng`
    /// - `SCRIBELOOP_LOG`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup("SCRIBELOOP_PROVIDER") {
            self.provider.kind = kind;
        }
        if let Some(model) = lookup("SCRIBELOOP_MODEL") {
            self.provider.model = model;
        }
        if let Some(url) = lookup("SCRIBELOOP_BASE_URL") {
            self.provider.base_url = Some(url);
        } else if self.provider.kind == "ollama" && self.provider.base_url.is_none() {
            if let Some(host) = lookup("OLLAMA_HOST") {
                self.provider.base_url = Some(normalize_ollama_host(&host));
            }
        }
        if self.provider.api_key.is_none() {
            self.provider.api_key =
                lookup("SCRIBELOOP_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(backend) = lookup("SCRIBELOOP_SEARCH_BACKEND") {
            self.search.backend = backend;
        }
        if self.search.backend == "searxng" {
            if let Some(endpoint) = lookup("SEARXNG_URL") {
                self.search.endpoint = Some(endpoint);
            }
        }
        if let Some(level) = lookup("SCRIBELOOP_LOG") {
            self.logging.level = level;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".scribeloop")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !matches!(
            self.provider.kind.as_str(),
            "ollama" | "openai" | "openrouter" | "vllm" | "llamacpp" | "llama.cpp"
        ) {
            return Err(ConfigError::ValidationError(format!(
                "unknown provider.kind '{}'",
                self.provider.kind
            )));
        }

        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.model must not be empty".into(),
            ));
        }

        if self.provider.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.request_timeout_secs must be > 0".into(),
            ));
        }

        if !SEARCH_BACKENDS.contains(&self.search.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown search.backend '{}' (expected one of: {})",
                self.search.backend,
                SEARCH_BACKENDS.join(", ")
            )));
        }

        if self.search.backend == "searxng" && self.search.endpoint.is_none() {
            return Err(ConfigError::ValidationError(
                "search.endpoint is required for the searxng backend".into(),
            ));
        }

        if self.search.max_results == 0 || self.search.max_results > MAX_SEARCH_RESULTS {
            return Err(ConfigError::ValidationError(format!(
                "search.max_results must be between 1 and {MAX_SEARCH_RESULTS}"
            )));
        }

        if self.pipeline.max_revisions == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.max_revisions must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// `OLLAMA_HOST` is often a bare `host:port`.
fn normalize_ollama_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
