//! Conventional commit types and subject parsing.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod formatter;

pub use classifier::{Classification, ClassifyOptions, MergeHandling, Rule, RuleSet};
pub use formatter::{format_subject, rewrite_message};

/// Conventional commit type tag.
///
/// Exactly one tag is assigned per rewritten message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConventionalType {
    /// New feature or capability.
    Feat,
    /// Bug fix.
    Fix,
    /// Documentation-only change.
    Docs,
    /// Formatting or presentation change, no behavior change.
    Style,
    /// Code restructuring without behavior change.
    Refactor,
    /// Performance improvement.
    Perf,
    /// Test additions or corrections.
    Test,
    /// Maintenance work that fits no other type.
    Chore,
    /// Build system or dependency change.
    Build,
    /// Continuous integration configuration change.
    Ci,
    /// Reverts a previous commit.
    Revert,
}

impl ConventionalType {
    /// All recognized types, in the order they appear in the prefix pattern.
    pub const ALL: [Self; 11] = [
        Self::Feat,
        Self::Fix,
        Self::Docs,
        Self::Style,
        Self::Refactor,
        Self::Perf,
        Self::Test,
        Self::Chore,
        Self::Build,
        Self::Ci,
        Self::Revert,
    ];

    /// Returns the lowercase tag used in rewritten subjects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Revert => "revert",
        }
    }

    /// Parses a type token, case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for ConventionalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subject line that already carries a conventional prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalSubject {
    /// The recognized type tag (normalized to lowercase).
    pub kind: ConventionalType,
    /// Parenthesized scope, verbatim including the parentheses.
    pub scope: Option<String>,
    /// Everything after `": "`, verbatim.
    pub content: String,
}

static CONVENTIONAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(feat|fix|docs|style|refactor|perf|test|chore|build|ci|revert)(\([^)]*\))?: (.*)$",
    )
    .unwrap()
});

impl ConventionalSubject {
    /// Parses a subject line that is already in conventional form.
    ///
    /// Returns `None` when the subject does not start with a recognized
    /// type tag followed by an optional scope and `": "`.
    pub fn parse(subject: &str) -> Option<Self> {
        let caps = CONVENTIONAL_PREFIX.captures(subject)?;
        let kind = ConventionalType::from_token(caps.get(1)?.as_str())?;
        let scope = caps.get(2).map(|m| m.as_str().to_string());
        let content = caps.get(3).map_or(String::new(), |m| m.as_str().to_string());
        Some(Self { kind, scope, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_prefix() {
        let parsed = ConventionalSubject::parse("fix: Resolve crash").unwrap();
        assert_eq!(parsed.kind, ConventionalType::Fix);
        assert_eq!(parsed.scope, None);
        assert_eq!(parsed.content, "Resolve crash");
    }

    #[test]
    fn parses_scoped_prefix_case_insensitively() {
        let parsed = ConventionalSubject::parse("Feat(auth): add login").unwrap();
        assert_eq!(parsed.kind, ConventionalType::Feat);
        assert_eq!(parsed.scope.as_deref(), Some("(auth)"));
        assert_eq!(parsed.content, "add login");
    }

    #[test]
    fn keeps_remainder_verbatim() {
        let parsed = ConventionalSubject::parse("docs:  Two leading spaces").unwrap();
        assert_eq!(parsed.content, " Two leading spaces");
    }

    #[test]
    fn rejects_unknown_type_and_missing_space() {
        assert!(ConventionalSubject::parse("wip: half done").is_none());
        assert!(ConventionalSubject::parse("fix:no space").is_none());
        assert!(ConventionalSubject::parse("Add login form").is_none());
    }

    #[test]
    fn type_token_round_trips() {
        for kind in ConventionalType::ALL {
            assert_eq!(ConventionalType::from_token(kind.as_str()), Some(kind));
        }
        assert_eq!(ConventionalType::from_token("FIX"), Some(ConventionalType::Fix));
        assert_eq!(ConventionalType::from_token("feature"), None);
    }
}
