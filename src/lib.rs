//! Resume ATS scoring, job-description matching, skill-gap analysis and
//! job-title prediction

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{AtsError, Result};
pub use processing::analyzer::{AnalysisContext, MatchResult};
