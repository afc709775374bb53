//! PlanStore - study plan history persistence
//!
//! Keeps every generated study plan together with the inputs that produced
//! it, as a pretty-printed JSON array on disk. The `sp` application appends
//! to the store after each successful generation; the `ps` binary inspects
//! and clears it.
//!
//! # Layout
//!
//! ```text
//! study_plan_history.json    # JSON array of PlanRecord, insertion order
//! ```
//!
//! # Example
//!
//! ```ignore
//! use planstore::{PlanRecord, PlanStore};
//!
//! let store = PlanStore::open("study_plan_history.json")?;
//! store.append(&record)?;
//! let history = store.load()?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{PlanRecord, PlanStore, timestamp_now};

/// Default history file, relative to the working directory
pub const DEFAULT_HISTORY_FILE: &str = "study_plan_history.json";

/// Timestamp format for PlanRecord::timestamp (local wall clock)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
