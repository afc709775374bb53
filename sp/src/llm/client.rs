//! LlmClient trait definition

use async_trait::async_trait;
#[allow(unused_imports)]
use tracing::debug;

use super::{GenerationRequest, GenerationResponse, LlmError};

/// Stateless plan-generation client - each call is independent
///
/// One request produces one complete response. No conversation state is
/// kept between calls and responses are never streamed; a plan is either
/// generated in full or the call fails.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single generation request (blocking until complete)
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    ///
    /// Responses are scripted in order and consumed one per call, so
    /// failures can be scripted directly as LlmError values.
    pub struct MockLlmClient {
        responses: Mutex<VecDeque<Result<GenerationResponse, LlmError>>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<GenerationResponse, LlmError>>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self {
                responses: Mutex::new(responses.into()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Shorthand for a client that always answers with one plan text
        pub fn with_text(text: &str) -> Self {
            Self::new(vec![Ok(GenerationResponse {
                text: text.to_string(),
                usage: crate::llm::TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 20,
                },
                total_duration: None,
            })])
        }

        pub fn call_count(&self) -> usize {
            debug!("MockLlmClient::call_count: called");
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            debug!("MockLlmClient::generate: called");
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::generate: taking next scripted response");
            self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
                debug!("MockLlmClient::generate: no more mock responses");
                Err(LlmError::InvalidResponse("No more mock responses".to_string()))
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::llm::TokenUsage;

        fn response(text: &str) -> GenerationResponse {
            GenerationResponse {
                text: text.to_string(),
                usage: TokenUsage::default(),
                total_duration: None,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockLlmClient::new(vec![Ok(response("Plan 1")), Ok(response("Plan 2"))]);

            let req = GenerationRequest::new("test");

            let resp1 = client.generate(req.clone()).await.unwrap();
            assert_eq!(resp1.text, "Plan 1");

            let resp2 = client.generate(req.clone()).await.unwrap();
            assert_eq!(resp2.text, "Plan 2");

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_scripted_failure() {
            let client = MockLlmClient::new(vec![Err(LlmError::ApiError {
                status: 500,
                message: "boom".to_string(),
            })]);

            let result = client.generate(GenerationRequest::new("test")).await;
            assert!(matches!(result, Err(LlmError::ApiError { status: 500, .. })));
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);

            let result = client.generate(GenerationRequest::new("test")).await;
            assert!(result.is_err());
            assert_eq!(client.call_count(), 1);
        }
    }
}
