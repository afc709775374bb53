//! Generation request/response types for StudyPlanner
//!
//! These types model Ollama's /api/generate endpoint but are
//! provider-agnostic enough to support other local servers later.

use std::time::Duration;
use tracing::debug;

/// A generation request - everything needed for one model call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full prompt text (rendered from the Handlebars template)
    pub prompt: String,
}

impl GenerationRequest {
    /// Create a request from a rendered prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        debug!("GenerationRequest::new: called");
        Self { prompt: prompt.into() }
    }
}

/// Response from a generation request
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// The generated plan text
    pub text: String,

    /// Token usage reported by the server; zero when not reported
    pub usage: TokenUsage,

    /// Server-side wall time for the request, when reported
    pub total_duration: Option<Duration>,
}

/// Token usage reported by the model server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    /// Total tokens across prompt and completion
    pub fn total(&self) -> u64 {
        debug!(%self.prompt_tokens, %self.completion_tokens, "TokenUsage::total: called");
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_new() {
        let req = GenerationRequest::new("make a plan");
        assert_eq!(req.prompt, "make a plan");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 42,
            completion_tokens: 256,
        };
        assert_eq!(usage.total(), 298);
        assert_eq!(TokenUsage::default().total(), 0);
    }
}
