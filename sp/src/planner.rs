//! Plan generation orchestration
//!
//! Ties prompt rendering, the model call, and the store append into one
//! explicit-outcome operation. A single linear request cycle per action;
//! there is no retry and no intermediate state.

use std::sync::Arc;

use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use planstore::{PlanRecord, PlanStore, timestamp_now};

use crate::llm::{GenerationRequest, LlmClient};
use crate::prompts::{PLAN_TEMPLATE, PromptLoader};

/// Warning shown when required inputs are missing
pub const MISSING_INPUT_MESSAGE: &str = "Please fill all fields";

/// User inputs for one plan generation
///
/// Ephemeral; exists only within one request cycle. The serialized fields
/// are the render context for the plan template.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRequest {
    /// Subjects to cover
    pub subjects: String,
    /// Days remaining until the exam
    pub days_left: u32,
    /// Topics needing extra attention
    pub weak_topics: String,
}

impl PlanRequest {
    /// Presence check: both text fields non-blank and at least one day
    pub fn is_complete(&self) -> bool {
        debug!("PlanRequest::is_complete: called");
        !self.subjects.trim().is_empty() && !self.weak_topics.trim().is_empty() && self.days_left >= 1
    }
}

/// Outcome of one generation action
#[derive(Debug)]
pub enum PlanOutcome {
    /// Plan generated and appended to the store
    Saved {
        record: PlanRecord,
        prompt_tokens: u64,
        completion_tokens: u64,
    },
    /// Required inputs missing; no request was made
    MissingInput,
    /// The endpoint failed; message is the user-facing string, store untouched
    Failed { message: String },
}

/// Owns the client, the prompt loader, and the store
pub struct Planner {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    store: PlanStore,
}

impl Planner {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, store: PlanStore) -> Self {
        debug!("Planner::new: called");
        Self { client, prompts, store }
    }

    /// The underlying history store (history view, clear)
    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Run one request cycle: render the prompt, call the model, append
    ///
    /// Missing input short-circuits before any network call. A failed call
    /// leaves the store untouched.
    pub async fn generate(&self, request: &PlanRequest) -> Result<PlanOutcome> {
        debug!(days_left = request.days_left, "generate: called");

        if !request.is_complete() {
            debug!("generate: missing input");
            return Ok(PlanOutcome::MissingInput);
        }

        let prompt = self
            .prompts
            .render(PLAN_TEMPLATE, request)
            .context("Failed to render plan prompt")?;

        let response = match self.client.generate(GenerationRequest::new(prompt)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "generate: request failed");
                return Ok(PlanOutcome::Failed {
                    message: e.user_message().to_string(),
                });
            }
        };

        let record = PlanRecord {
            timestamp: timestamp_now(),
            subjects: request.subjects.clone(),
            days_left: request.days_left,
            weak_topics: request.weak_topics.clone(),
            plan: response.text,
        };
        self.store.append(&record).context("Failed to save plan to history")?;

        debug!(tokens = response.usage.total(), "generate: plan saved");
        Ok(PlanOutcome::Saved {
            record,
            prompt_tokens: response.usage.prompt_tokens,
            completion_tokens: response.usage.completion_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{GenerationResponse, LlmError, TokenUsage};
    use std::time::Duration;
    use tempfile::TempDir;

    fn request() -> PlanRequest {
        PlanRequest {
            subjects: "Math, Physics".to_string(),
            days_left: 10,
            weak_topics: "Integrals".to_string(),
        }
    }

    fn planner(client: Arc<MockLlmClient>, temp: &TempDir) -> Planner {
        let store = PlanStore::open(temp.path().join("history.json")).unwrap();
        Planner::new(client, PromptLoader::embedded_only(), store)
    }

    #[tokio::test]
    async fn test_generate_saves_record() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockLlmClient::with_text("Day 1: algebra drills"));
        let planner = planner(client.clone(), &temp);

        let outcome = planner.generate(&request()).await.unwrap();

        match outcome {
            PlanOutcome::Saved {
                record,
                prompt_tokens,
                completion_tokens,
            } => {
                assert_eq!(record.subjects, "Math, Physics");
                assert_eq!(record.days_left, 10);
                assert_eq!(record.weak_topics, "Integrals");
                assert_eq!(record.plan, "Day 1: algebra drills");
                assert_eq!(prompt_tokens, 10);
                assert_eq!(completion_tokens, 20);
            }
            other => panic!("Expected Saved, got {:?}", other),
        }

        let records = planner.store().load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].plan, "Day 1: algebra drills");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_input_makes_no_call() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockLlmClient::new(vec![]));
        let planner = planner(client.clone(), &temp);

        let empty_subjects = PlanRequest {
            subjects: String::new(),
            ..request()
        };
        let outcome = planner.generate(&empty_subjects).await.unwrap();

        assert!(matches!(outcome, PlanOutcome::MissingInput));
        assert_eq!(client.call_count(), 0);
        assert!(planner.store().load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_only_input_is_missing() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockLlmClient::new(vec![]));
        let planner = planner(client.clone(), &temp);

        let blank_topics = PlanRequest {
            weak_topics: "   ".to_string(),
            ..request()
        };
        let outcome = planner.generate(&blank_topics).await.unwrap();

        assert!(matches!(outcome, PlanOutcome::MissingInput));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_days_is_missing_input() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockLlmClient::new(vec![]));
        let planner = planner(client.clone(), &temp);

        let zero_days = PlanRequest {
            days_left: 0,
            ..request()
        };
        let outcome = planner.generate(&zero_days).await.unwrap();

        assert!(matches!(outcome, PlanOutcome::MissingInput));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_server_error_leaves_store_untouched() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockLlmClient::new(vec![Err(LlmError::ApiError {
            status: 500,
            message: "model crashed".to_string(),
        })]));
        let planner = planner(client, &temp);

        let outcome = planner.generate(&request()).await.unwrap();

        match outcome {
            PlanOutcome::Failed { message } => assert_eq!(message, "Ollama server error"),
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert!(planner.store().load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_connect_message() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockLlmClient::new(vec![Err(LlmError::Timeout(
            Duration::from_secs(300),
        ))]));
        let planner = planner(client, &temp);

        let outcome = planner.generate(&request()).await.unwrap();

        match outcome {
            PlanOutcome::Failed { message } => assert_eq!(message, "Cannot connect to Ollama server"),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_response_maps_to_no_response() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockLlmClient::new(vec![Err(LlmError::InvalidResponse(
            "Missing response field".to_string(),
        ))]));
        let planner = planner(client, &temp);

        let outcome = planner.generate(&request()).await.unwrap();

        match outcome {
            PlanOutcome::Failed { message } => assert_eq!(message, "No response generated"),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_generations_accumulate_in_order() {
        let temp = TempDir::new().unwrap();
        let reply = |text: &str| {
            Ok(GenerationResponse {
                text: text.to_string(),
                usage: TokenUsage::default(),
                total_duration: None,
            })
        };
        let client = Arc::new(MockLlmClient::new(vec![reply("first plan"), reply("second plan")]));
        let planner = planner(client, &temp);

        planner.generate(&request()).await.unwrap();
        planner.generate(&request()).await.unwrap();

        let records = planner.store().load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].plan, "first plan");
        assert_eq!(records[1].plan, "second plan");
    }
}
