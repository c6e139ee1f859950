//! Plan and result types serialized back to the caller.

use serde::{Deserialize, Serialize};

use crate::group::ChangeGroup;

/// One non-empty group of pending changes and the commit proposed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPlan {
    pub name: ChangeGroup,
    pub commit_type: String,
    /// Repository-relative paths, in change-set order, never empty.
    pub files: Vec<String>,
    pub suggested_message: String,
}

/// Outcome of committing one [`GroupPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub group: ChangeGroup,
    pub message: String,
    pub ok: bool,
    /// Set iff `ok`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Set iff not `ok`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommitRecord {
    pub fn succeeded(plan: &GroupPlan, sha: String) -> Self {
        Self {
            group: plan.name,
            message: plan.suggested_message.clone(),
            ok: true,
            sha: Some(sha),
            error: None,
        }
    }

    pub fn failed(plan: &GroupPlan, error: String) -> Self {
        Self {
            group: plan.name,
            message: plan.suggested_message.clone(),
            ok: false,
            sha: None,
            error: Some(error),
        }
    }
}

/// Top-level result of a grouped-commit run.
///
/// Optional fields are omitted from the serialized form when not applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    pub ok: bool,
    pub groups: Vec<GroupPlan>,
    /// Present only for apply runs, one record per group in plan order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<Vec<CommitRecord>>,
    /// Present only when a push was requested during an apply run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushed: Option<bool>,
    /// Present only when at least one step failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl OrchestrationResult {
    /// Result of a run that stopped after planning.
    pub fn plan_only(groups: Vec<GroupPlan>) -> Self {
        Self {
            ok: true,
            groups,
            commits: None,
            pushed: None,
            errors: None,
        }
    }

    /// Result of an apply run. `ok` is derived from `errors`.
    pub fn applied(
        groups: Vec<GroupPlan>,
        commits: Vec<CommitRecord>,
        pushed: Option<bool>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            ok: errors.is_empty(),
            groups,
            commits: Some(commits),
            pushed,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs_plan() -> GroupPlan {
        GroupPlan {
            name: ChangeGroup::Docs,
            commit_type: "docs".to_string(),
            files: vec!["README.md".to_string()],
            suggested_message: "docs: update docs\n".to_string(),
        }
    }

    #[test]
    fn test_plan_only_omits_optional_fields() {
        let result = OrchestrationResult::plan_only(vec![docs_plan()]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "ok": true,
                "groups": [{
                    "name": "docs",
                    "commit_type": "docs",
                    "files": ["README.md"],
                    "suggested_message": "docs: update docs\n"
                }]
            })
        );
    }

    #[test]
    fn test_applied_with_errors_is_not_ok() {
        let plan = docs_plan();
        let result = OrchestrationResult::applied(
            vec![plan.clone()],
            vec![CommitRecord::failed(&plan, "boom".to_string())],
            Some(false),
            vec!["commit failed for group docs: boom".to_string()],
        );
        assert!(!result.ok);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["pushed"], json!(false));
        assert_eq!(value["errors"].as_array().unwrap().len(), 1);
        assert_eq!(value["commits"][0]["error"], json!("boom"));
        assert!(value["commits"][0].get("sha").is_none());
    }

    #[test]
    fn test_applied_without_push_omits_pushed() {
        let plan = docs_plan();
        let result = OrchestrationResult::applied(
            vec![plan.clone()],
            vec![CommitRecord::succeeded(&plan, "abc123".to_string())],
            None,
            Vec::new(),
        );
        assert!(result.ok);

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("pushed").is_none());
        assert!(value.get("errors").is_none());
        assert_eq!(value["commits"][0]["sha"], json!("abc123"));
        assert!(value["commits"][0].get("error").is_none());
    }
}
