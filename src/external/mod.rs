//! Collaborators outside the scoring core: resource search and submission history

pub mod history;
pub mod search;

pub use history::{JsonlHistoryStore, SubmissionModule, SubmissionRecord, SubmissionStore};
pub use search::{DuckDuckGoSearch, LearningResource, NoopSearch, ResourceSearch};
