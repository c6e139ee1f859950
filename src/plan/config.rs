//! Configuration for a grouped-commit run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::commit::{GroupOverride, check_header, header_too_long, resolve_message};
use crate::error::ConfigError;
use crate::group::ChangeGroup;

/// Which branch of the state machine a run takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Enumerate and plan only. Never touches the repository.
    PlanOnly,
    /// Stage, commit and optionally push each group.
    Apply,
}

/// Options for a grouped-commit run.
///
/// Field names are camelCase on the wire. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GroupCommitConfig {
    /// Any path inside the repository.
    pub repo: PathBuf,
    pub include_unstaged: bool,
    pub auto_stage: bool,
    pub dry_run: bool,
    pub push: bool,
    pub signoff: bool,
    pub confirm: bool,
    pub overrides: BTreeMap<ChangeGroup, GroupOverride>,
}

impl Default for GroupCommitConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            include_unstaged: true,
            auto_stage: true,
            dry_run: true,
            push: false,
            signoff: false,
            confirm: false,
            overrides: BTreeMap::new(),
        }
    }
}

impl GroupCommitConfig {
    /// Mutation requires both `dry_run == false` and `confirm == true`.
    pub fn mode(&self) -> RunMode {
        if !self.dry_run && self.confirm {
            RunMode::Apply
        } else {
            RunMode::PlanOnly
        }
    }

    /// Reject overrides that would produce an unusable commit message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&group, o) in &self.overrides {
            validate_override(group, o)?;
        }
        Ok(())
    }
}

fn validate_override(group: ChangeGroup, o: &GroupOverride) -> Result<(), ConfigError> {
    if o.commit_type.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ConfigError::EmptyOverrideField {
            group,
            field: "commitType",
        });
    }
    if o.short.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(ConfigError::EmptyOverrideField {
            group,
            field: "short",
        });
    }
    if o.message.as_deref().is_some_and(|m| m.trim().is_empty()) {
        return Err(ConfigError::EmptyOverrideField {
            group,
            field: "message",
        });
    }

    for (field, value) in [
        ("commitType", &o.commit_type),
        ("scope", &o.scope),
        ("short", &o.short),
    ] {
        if value.as_deref().is_some_and(|v| v.contains('\n')) {
            return Err(ConfigError::InvalidOverride {
                group,
                reason: format!("{field} must be a single line"),
            });
        }
    }

    let resolved = resolve_message(group, Some(o));
    let issues = check_header(&resolved.message);
    if !issues.is_empty() {
        return Err(ConfigError::InvalidOverride {
            group,
            reason: issues.join("; "),
        });
    }

    if header_too_long(&resolved.message) {
        warn!(
            "Override for group {} produces a header longer than {} characters",
            group,
            crate::commit::lint::MAX_HEADER_LENGTH
        );
    }

    Ok(())
}
