//! Grouped-commit planning and execution.

pub mod config;
pub mod orchestrator;
pub mod types;

pub use config::{GroupCommitConfig, RunMode};
pub use orchestrator::{GroupCommitter, build_plan};
pub use types::{CommitRecord, GroupPlan, OrchestrationResult};
