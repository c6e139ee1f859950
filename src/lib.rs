//! groupcommit - Split pending changes into conventional commits by category.
//!
//! # Overview
//!
//! groupcommit classifies every changed file in a working tree into one of a
//! fixed set of groups (docs, tests, CI, dependency locks, build config,
//! chores and code), proposes a conventional-commit message per group and,
//! when explicitly confirmed, stages and commits each group on its own before
//! an optional single push. Failures are tracked per group.

pub mod commit;
pub mod error;
pub mod git;
pub mod group;
pub mod plan;

// Re-export commonly used types
pub use commit::{GroupOverride, format_commit_message};
pub use error::{ConfigError, GitError, GroupCommitError};
pub use git::{ChangeSet, GitClient, GitSettings, SystemGit};
pub use group::{ChangeGroup, classify};
pub use plan::{
    CommitRecord, GroupCommitConfig, GroupCommitter, GroupPlan, OrchestrationResult, RunMode,
};
