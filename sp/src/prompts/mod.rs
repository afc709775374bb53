//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for plan generation.
//!
//! Template loading chain:
//! 1. `.studyplanner/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (repo default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::PromptLoader;

/// Template name for the study plan request
pub const PLAN_TEMPLATE: &str = "plan";
