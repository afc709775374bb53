//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while requesting a plan
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// The generic message shown to the user for this failure
    ///
    /// The UI reports coarse categories only; the precise error stays in
    /// the variant and the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            LlmError::ApiError { .. } => "Ollama server error",
            LlmError::Network(_) | LlmError::Timeout(_) => "Cannot connect to Ollama server",
            LlmError::InvalidResponse(_) | LlmError::Json(_) => "No response generated",
        }
    }
}
