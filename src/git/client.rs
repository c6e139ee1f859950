//! The version-control operations the orchestrator depends on.

use std::path::Path;

use async_trait::async_trait;

use crate::error::GitError;

/// Files with pending changes, split by where the change lives.
///
/// All lists are repository-relative, `/`-separated and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub staged: Vec<String>,
    pub unstaged: Vec<String>,
    /// Staged paths first, then unstaged paths not already staged.
    pub merged: Vec<String>,
}

impl ChangeSet {
    /// Build a change set, deduplicating each list and the merged view.
    pub fn new(staged: Vec<String>, unstaged: Vec<String>) -> Self {
        let staged = dedup(staged);
        let unstaged = dedup(unstaged);
        let merged = dedup(staged.iter().chain(unstaged.iter()).cloned().collect());
        Self {
            staged,
            unstaged,
            merged,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }
}

/// Remove repeated entries, keeping the first occurrence.
fn dedup(paths: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Trait for the git operations used by a grouped-commit run.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitClient: Send + Sync {
    /// List changed files. Unstaged (and untracked) files are only listed
    /// when `include_unstaged` is set; the `unstaged` list is empty otherwise.
    async fn changed_files(&self, repo: &Path, include_unstaged: bool)
    -> Result<ChangeSet, GitError>;

    /// Reset the index to HEAD without touching the working tree, so the next
    /// commit only contains what is staged afterwards.
    async fn reset_index(&self, repo: &Path) -> Result<(), GitError>;

    /// Stage the given paths, including deletions. An empty list is a no-op.
    async fn stage(&self, repo: &Path, paths: &[String]) -> Result<(), GitError>;

    /// Commit the index and return the new commit id.
    async fn commit(&self, repo: &Path, message: &str, signoff: bool) -> Result<String, GitError>;

    /// Push the current branch to its upstream.
    async fn push(&self, repo: &Path) -> Result<(), GitError>;
}
