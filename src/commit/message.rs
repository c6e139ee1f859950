//! Conventional-commit message formatting and per-group message resolution.

use serde::{Deserialize, Serialize};

use crate::group::ChangeGroup;

/// Format a conventional-commit message.
///
/// Produces:
/// ```text
/// type(scope)!: short
///
/// long
/// ```
/// The scope is omitted when empty, `!` appears only for breaking changes and
/// the body block only when `long` is non-empty. The result always ends with
/// exactly one newline. Nothing is escaped, wrapped or trimmed.
pub fn format_commit_message(
    commit_type: &str,
    short: &str,
    scope: Option<&str>,
    long: Option<&str>,
    breaking: bool,
) -> String {
    let mut message = String::from(commit_type);

    if let Some(scope) = scope.filter(|s| !s.is_empty()) {
        message.push('(');
        message.push_str(scope);
        message.push(')');
    }
    if breaking {
        message.push('!');
    }
    message.push_str(": ");
    message.push_str(short);
    message.push('\n');

    if let Some(long) = long.filter(|l| !l.is_empty()) {
        message.push('\n');
        message.push_str(long);
        message.push('\n');
    }

    message
}

/// Caller-supplied replacement for a group's default message parts.
///
/// Every field is optional. `message`, when present, is used verbatim as the
/// full commit text (this is how externally generated suggestions are fed
/// in) and `commit_type` is then only reported, not re-rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(default)]
    pub breaking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Commit type and message text resolved for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub commit_type: String,
    pub message: String,
}

/// Resolve the commit type and message for `group`, applying `overrides` on
/// top of the group defaults field by field.
pub fn resolve_message(group: ChangeGroup, overrides: Option<&GroupOverride>) -> ResolvedMessage {
    let Some(o) = overrides else {
        return ResolvedMessage {
            commit_type: group.default_commit_type().to_string(),
            message: format_commit_message(
                group.default_commit_type(),
                group.default_short(),
                None,
                None,
                false,
            ),
        };
    };

    let commit_type = o
        .commit_type
        .as_deref()
        .unwrap_or(group.default_commit_type())
        .to_string();

    let message = match &o.message {
        Some(full) => full.clone(),
        None => format_commit_message(
            &commit_type,
            o.short.as_deref().unwrap_or(group.default_short()),
            o.scope.as_deref(),
            o.long.as_deref(),
            o.breaking,
        ),
    };

    ResolvedMessage {
        commit_type,
        message,
    }
}
