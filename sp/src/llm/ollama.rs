//! Ollama API client implementation
//!
//! Implements the LlmClient trait against a local Ollama server's
//! /api/generate endpoint. One non-streaming request per call, no retries;
//! a failure is terminal for the triggering action.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{GenerationRequest, GenerationResponse, LlmClient, LlmError, TokenUsage};
use crate::config::LlmConfig;

/// Ollama API client
pub struct OllamaClient {
    model: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    /// Build the request body for the generate endpoint
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        debug!(%self.model, prompt_len = request.prompt.len(), "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
        })
    }

    /// Parse the generate endpoint response
    ///
    /// Ollama reports durations in nanoseconds and token counts only when
    /// the model run produced them.
    fn parse_response(&self, api_response: OllamaResponse) -> Result<GenerationResponse, LlmError> {
        debug!(has_response = api_response.response.is_some(), "parse_response: called");
        let Some(text) = api_response.response else {
            return Err(LlmError::InvalidResponse("Missing response field".to_string()));
        };

        Ok(GenerationResponse {
            text,
            usage: TokenUsage {
                prompt_tokens: api_response.prompt_eval_count.unwrap_or(0),
                completion_tokens: api_response.eval_count.unwrap_or(0),
            },
            total_duration: api_response.total_duration.map(Duration::from_nanos),
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        debug!(%self.model, "generate: called");
        let url = format!("{}/api/generate", self.base_url);
        let body = self.build_request_body(&request);

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                debug!(error = %e, "generate: request timed out");
                return Err(LlmError::Timeout(self.timeout));
            }
            Err(e) => {
                debug!(error = %e, "generate: network error");
                return Err(LlmError::Network(e));
            }
        };

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "generate: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        debug!("generate: success");
        let text = response.text().await.map_err(LlmError::Network)?;
        let api_response: OllamaResponse = serde_json::from_str(&text)?;
        self.parse_response(api_response)
    }
}

// Ollama API response types

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: Option<String>,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
    total_duration: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OllamaClient {
        OllamaClient {
            model: "phi3".to_string(),
            base_url: "http://localhost:11434".to_string(),
            http: Client::new(),
            timeout: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_build_request_body() {
        let body = client().build_request_body(&GenerationRequest::new("make a plan"));

        assert_eq!(body["model"], "phi3");
        assert_eq!(body["prompt"], "make a plan");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let config = LlmConfig {
            provider: "ollama".to_string(),
            model: "phi3".to_string(),
            base_url: "http://localhost:11434/".to_string(),
            timeout_ms: 300_000,
        };

        let client = OllamaClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_parse_response_extracts_fields() {
        let api_response: OllamaResponse = serde_json::from_str(
            r#"{
                "response": "Day 1: algebra",
                "prompt_eval_count": 42,
                "eval_count": 256,
                "total_duration": 1500000000
            }"#,
        )
        .unwrap();

        let parsed = client().parse_response(api_response).unwrap();
        assert_eq!(parsed.text, "Day 1: algebra");
        assert_eq!(parsed.usage.prompt_tokens, 42);
        assert_eq!(parsed.usage.completion_tokens, 256);
        assert_eq!(parsed.total_duration, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_parse_response_missing_field_is_error() {
        let api_response: OllamaResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();

        let result = client().parse_response(api_response);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_response_counts_default_to_zero() {
        let api_response: OllamaResponse = serde_json::from_str(r#"{"response": "plan"}"#).unwrap();

        let parsed = client().parse_response(api_response).unwrap();
        assert_eq!(parsed.usage.prompt_tokens, 0);
        assert_eq!(parsed.usage.completion_tokens, 0);
        assert_eq!(parsed.total_duration, None);
    }
}
