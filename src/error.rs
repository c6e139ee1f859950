//! Error types for groupcommit modules using thiserror.

use thiserror::Error;

use crate::group::ChangeGroup;

/// Errors from git operations (enumeration, staging, committing, pushing).
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable '{0}' not found in PATH")]
    NotInstalled(String),

    #[error("Failed to spawn git for {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} timed out after {secs} seconds")]
    Timeout { operation: String, secs: u64 },

    #[error("git {operation} exited with {}: {stderr}",
             code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    NonZeroExit {
        operation: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Repository error: {0}")]
    Repository(#[from] git2::Error),

    #[error("Bare repositories are not supported")]
    BareRepository,

    #[error("Unexpected git output: {0}")]
    InvalidOutput(String),

    #[error("Repository scan task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Errors from validating a [`crate::plan::GroupCommitConfig`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Override for group '{group}' has an empty '{field}'")]
    EmptyOverrideField {
        group: ChangeGroup,
        field: &'static str,
    },

    #[error("Override for group '{group}' is invalid: {reason}")]
    InvalidOverride { group: ChangeGroup, reason: String },
}

/// Fatal errors from a grouped-commit run.
///
/// Everything after a successful enumeration is reported through
/// [`crate::plan::OrchestrationResult`] instead.
#[derive(Error, Debug)]
pub enum GroupCommitError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Failed to list changed files: {0}")]
    EnumerationFailed(#[source] GitError),
}
