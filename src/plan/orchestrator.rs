//! The grouped-commit state machine.
//!
//! Enumerate -> classify -> plan, then either stop (plan-only) or apply each
//! group in plan order. Groups are committed independently: a failure in one
//! group is recorded and the run moves on, and earlier commits are never
//! rolled back.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::commit::{GroupOverride, resolve_message};
use crate::error::GroupCommitError;
use crate::git::GitClient;
use crate::group::{ChangeGroup, classify};
use crate::plan::config::{GroupCommitConfig, RunMode};
use crate::plan::types::{CommitRecord, GroupPlan, OrchestrationResult};

/// Bucket `files` by group and build one plan per non-empty group, in
/// [`ChangeGroup::ALL`] order.
///
/// Duplicate paths are kept once; within a group, paths keep their input order.
pub fn build_plan(
    files: &[String],
    overrides: &BTreeMap<ChangeGroup, GroupOverride>,
) -> Vec<GroupPlan> {
    let mut buckets: BTreeMap<ChangeGroup, Vec<String>> = BTreeMap::new();
    for file in files {
        let bucket = buckets.entry(classify(file)).or_default();
        if !bucket.contains(file) {
            bucket.push(file.clone());
        }
    }

    // BTreeMap iterates in enum declaration order.
    buckets
        .into_iter()
        .map(|(name, files)| {
            let resolved = resolve_message(name, overrides.get(&name));
            GroupPlan {
                name,
                commit_type: resolved.commit_type,
                files,
                suggested_message: resolved.message,
            }
        })
        .collect()
}

/// Drives a grouped-commit run against a [`GitClient`].
///
/// Runs are strictly sequential. The caller must ensure nothing else mutates
/// the repository while an apply run is in progress.
pub struct GroupCommitter<G: GitClient> {
    git: G,
}

impl<G: GitClient> GroupCommitter<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    pub fn git(&self) -> &G {
        &self.git
    }

    /// Run a full invocation.
    ///
    /// Only configuration and enumeration failures are returned as errors.
    /// Once a plan exists, every staging, commit and push failure is reported
    /// inside the returned [`OrchestrationResult`].
    pub async fn run(
        &self,
        config: &GroupCommitConfig,
    ) -> Result<OrchestrationResult, GroupCommitError> {
        let groups = self.plan(config).await?;

        match config.mode() {
            RunMode::PlanOnly => {
                debug!("Plan-only run, {} group(s) proposed", groups.len());
                Ok(OrchestrationResult::plan_only(groups))
            }
            RunMode::Apply => Ok(self.apply(config, groups).await),
        }
    }

    /// Validate the config, enumerate changes and build the plan.
    pub async fn plan(
        &self,
        config: &GroupCommitConfig,
    ) -> Result<Vec<GroupPlan>, GroupCommitError> {
        config.validate()?;

        let changes = self
            .git
            .changed_files(&config.repo, config.include_unstaged)
            .await
            .map_err(GroupCommitError::EnumerationFailed)?;

        debug!(
            "Enumerated {} changed file(s) ({} staged, {} unstaged)",
            changes.merged.len(),
            changes.staged.len(),
            changes.unstaged.len()
        );

        let groups = build_plan(&changes.merged, &config.overrides);
        debug!(
            "Built {} group(s): {}",
            groups.len(),
            groups
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(groups)
    }

    /// Commit each group in order, then push once if requested.
    async fn apply(&self, config: &GroupCommitConfig, groups: Vec<GroupPlan>) -> OrchestrationResult {
        let mut commits = Vec::with_capacity(groups.len());
        let mut errors = Vec::new();

        for plan in &groups {
            let record = self.apply_group(config, plan).await;
            if let Some(error) = &record.error {
                errors.push(error.clone());
            }
            commits.push(record);
        }

        let pushed = if config.push {
            match self.git.push(&config.repo).await {
                Ok(()) => {
                    info!("Pushed {} commit group(s)", commits.len());
                    Some(true)
                }
                Err(e) => {
                    warn!("Push failed: {}", e);
                    errors.push(format!("push failed: {}", e));
                    Some(false)
                }
            }
        } else {
            None
        };

        OrchestrationResult::applied(groups, commits, pushed, errors)
    }

    /// Stage (if enabled) and commit a single group.
    ///
    /// The record's `error` doubles as the run-level error entry.
    async fn apply_group(&self, config: &GroupCommitConfig, plan: &GroupPlan) -> CommitRecord {
        let group = plan.name;

        if config.auto_stage {
            debug!("Staging {} file(s) for group {}", plan.files.len(), group);

            if let Err(e) = self.git.reset_index(&config.repo).await {
                warn!("Index reset failed before group {}: {}", group, e);
                return CommitRecord::failed(
                    plan,
                    format!("staging failed for group {}: could not reset index: {}", group, e),
                );
            }
            if let Err(e) = self.git.stage(&config.repo, &plan.files).await {
                warn!("Staging failed for group {}: {}", group, e);
                return CommitRecord::failed(
                    plan,
                    format!("staging failed for group {}: {}", group, e),
                );
            }
        }

        match self
            .git
            .commit(&config.repo, &plan.suggested_message, config.signoff)
            .await
        {
            Ok(sha) => {
                info!("Committed group {} as {}", group, sha);
                CommitRecord::succeeded(plan, sha)
            }
            Err(e) => {
                warn!("Commit failed for group {}: {}", group, e);
                CommitRecord::failed(plan, format!("commit failed for group {}: {}", group, e))
            }
        }
    }
}
