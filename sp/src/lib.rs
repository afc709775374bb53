//! StudyPlanner - AI study plan generator
//!
//! StudyPlanner turns three exam-prep inputs (subjects, days left, weak
//! topics) into a day-wise study plan by prompting a local Ollama model.
//! Plans persist as a JSON history through the planstore crate and export
//! to plain text or PDF.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Ollama implementation
//! - [`prompts`] - Prompt template loading and rendering
//! - [`planner`] - Input validation, prompt assembly, and history writes
//! - [`export`] - TXT and PDF plan export
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`tui`] - Interactive terminal interface

pub mod cli;
pub mod config;
pub mod export;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod tui;

/// Default text export path
pub const DEFAULT_TEXT_EXPORT: &str = "ai_study_plan.txt";

/// Default PDF export path
pub const DEFAULT_PDF_EXPORT: &str = "ai_study_plan.pdf";

// Re-export commonly used types
pub use config::{Config, ExportConfig, LlmConfig, StorageConfig};
pub use export::{write_pdf, write_text};
pub use llm::{GenerationRequest, GenerationResponse, LlmClient, LlmError, OllamaClient, TokenUsage, create_client};
pub use planner::{MISSING_INPUT_MESSAGE, PlanOutcome, PlanRequest, Planner};
pub use prompts::{PLAN_TEMPLATE, PromptLoader};
