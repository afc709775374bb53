//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when template files are not found.

/// Prompt for the study plan generation request
pub const PLAN: &str = r#"You are an AI study planner.

Create a concise daily study plan based on:
Subjects: {{subjects}}
Days left: {{days_left}}
Weak topics: {{weak_topics}}

Rules:
- Max 5 hours per day
- Prioritize weak topics
- Include revision
- Day-wise plan
"#;

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "plan" => Some(PLAN),
        _ => None,
    }
}
