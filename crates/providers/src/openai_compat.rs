//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, vLLM, llama.cpp server, and any endpoint
//! exposing `/chat/completions` and `/models`.

use async_trait::async_trait;
use scribeloop_core::error::ProviderError;
use scribeloop_core::message::Message;
use scribeloop_core::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{http_client, transport_error};

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    ///
    /// An empty `api_key` sends no `Authorization` header, which is what
    /// local servers expect.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: http_client(timeout)?,
        })
    }

    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().to_string(),
                content: Some(m.content.clone()),
            })
            .collect()
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model.clone()));
        }

        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("No choices in response".into()))?;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ProviderResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            usage,
            model: api_response.model,
        })
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let models = body["data"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    async fn health_check(&self) -> std::result::Result<ProviderHealth, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(ProviderHealth::Connected)
        } else {
            Ok(ProviderHealth::Unexpected {
                status_code: status.as_u16(),
            })
        }
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };

    fn provider(base: &str, key: &str) -> OpenAiCompatProvider {
        OpenAiCompatProvider::new("openai", base, key, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn message_conversion() {
        let messages = vec![Message::system("You are helpful"), Message::user("Hello")];
        let api_messages = OpenAiCompatProvider::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let p = provider("http://localhost:8000/v1/", "");
        assert_eq!(p.endpoint(), "http://localhost:8000/v1");
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "APPROVE"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("APPROVE"));
        assert_eq!(parsed.usage.unwrap().total_tokens, 11);
    }

    #[tokio::test]
    async fn complete_sends_bearer_and_reads_first_choice() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["max_tokens"], 256);
                Json(serde_json::json!({
                    "model": "gpt-4o-mini",
                    "choices": [{"message": {"role": "assistant", "content": "# Solar Power"}}]
                }))
            }),
        );
        let base = test_server::spawn(router).await;

        let resp = provider(&base, "sk-test")
            .complete(ProviderRequest::prompt("gpt-4o-mini", 0.7, "write").with_max_tokens(Some(256)))
            .await
            .unwrap();
        assert_eq!(resp.message.content, "# Solar Power");
        assert!(resp.usage.is_none());
    }

    #[tokio::test]
    async fn empty_key_sends_no_authorization() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap| async move {
                assert!(headers.get("authorization").is_none());
                Json(serde_json::json!({
                    "model": "local",
                    "choices": [{"message": {"role": "assistant", "content": "ok"}}]
                }))
            }),
        );
        let base = test_server::spawn(router).await;

        let resp = provider(&base, "")
            .complete(ProviderRequest::prompt("local", 0.7, "p"))
            .await
            .unwrap();
        assert_eq!(resp.message.content, "ok");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_failed() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let base = test_server::spawn(router).await;

        let err = provider(&base, "bad")
            .complete(ProviderRequest::prompt("m", 0.7, "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(serde_json::json!({"model": "m", "choices": []})) }),
        );
        let base = test_server::spawn(router).await;

        let err = provider(&base, "")
            .complete(ProviderRequest::prompt("m", 0.7, "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn models_endpoint_drives_health_and_listing() {
        let router = Router::new().route(
            "/models",
            get(|| async { Json(serde_json::json!({"data": [{"id": "gpt-4o-mini"}]})) }),
        );
        let base = test_server::spawn(router).await;
        let p = provider(&base, "");

        assert_eq!(p.health_check().await.unwrap(), ProviderHealth::Connected);
        assert_eq!(p.list_models().await.unwrap(), vec!["gpt-4o-mini".to_string()]);
    }

    #[tokio::test]
    async fn health_reports_unexpected_status() {
        let router = Router::new().route("/models", get(|| async { StatusCode::FORBIDDEN }));
        let base = test_server::spawn(router).await;

        assert_eq!(
            provider(&base, "").health_check().await.unwrap(),
            ProviderHealth::Unexpected { status_code: 403 }
        );
    }
}
