//! Semantic change groups and path classification.

pub mod classify;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use classify::classify;

/// A semantic category of pending changes.
///
/// Declaration order is the order groups appear in a plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeGroup {
    Docs,
    Tests,
    Ci,
    Deps,
    Build,
    Chore,
    Code,
}

impl ChangeGroup {
    /// All groups in plan order.
    pub const ALL: [ChangeGroup; 7] = [
        ChangeGroup::Docs,
        ChangeGroup::Tests,
        ChangeGroup::Ci,
        ChangeGroup::Deps,
        ChangeGroup::Build,
        ChangeGroup::Chore,
        ChangeGroup::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeGroup::Docs => "docs",
            ChangeGroup::Tests => "tests",
            ChangeGroup::Ci => "ci",
            ChangeGroup::Deps => "deps",
            ChangeGroup::Build => "build",
            ChangeGroup::Chore => "chore",
            ChangeGroup::Code => "code",
        }
    }

    /// Conventional-commit type used when the caller does not override it.
    pub fn default_commit_type(&self) -> &'static str {
        match self {
            ChangeGroup::Docs => "docs",
            ChangeGroup::Tests => "test",
            ChangeGroup::Ci => "ci",
            ChangeGroup::Deps => "chore",
            ChangeGroup::Build => "build",
            ChangeGroup::Chore => "chore",
            ChangeGroup::Code => "chore",
        }
    }

    /// Short summary used when the caller does not override it.
    ///
    /// `code` stays deliberately vague: nothing is inferred from the diff.
    pub fn default_short(&self) -> &'static str {
        match self {
            ChangeGroup::Docs => "update docs",
            ChangeGroup::Tests => "update tests",
            ChangeGroup::Ci => "update CI",
            ChangeGroup::Deps => "update dependencies",
            ChangeGroup::Build => "update build config",
            ChangeGroup::Chore => "misc maintenance",
            ChangeGroup::Code => "update code",
        }
    }
}

impl fmt::Display for ChangeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChangeGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown change group '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_declaration_order() {
        let mut sorted = ChangeGroup::ALL;
        sorted.sort();
        assert_eq!(sorted, ChangeGroup::ALL);
    }

    #[test]
    fn test_from_str_round_trips_every_group() {
        for group in ChangeGroup::ALL {
            assert_eq!(group.as_str().parse::<ChangeGroup>(), Ok(group));
        }
        assert!("misc".parse::<ChangeGroup>().is_err());
    }

    #[test]
    fn test_serializes_as_lowercase_name() {
        let json = serde_json::to_string(&ChangeGroup::Deps).unwrap();
        assert_eq!(json, r#""deps""#);
        let group: ChangeGroup = serde_json::from_str(r#""ci""#).unwrap();
        assert_eq!(group, ChangeGroup::Ci);
    }

    #[test]
    fn test_defaults_table() {
        assert_eq!(ChangeGroup::Tests.default_commit_type(), "test");
        assert_eq!(ChangeGroup::Deps.default_commit_type(), "chore");
        assert_eq!(ChangeGroup::Code.default_commit_type(), "chore");
        assert_eq!(ChangeGroup::Ci.default_short(), "update CI");
        assert_eq!(ChangeGroup::Build.default_short(), "update build config");
    }
}
