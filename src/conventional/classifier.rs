//! Heuristic classification of free-form commit subjects.
//!
//! Classification runs in three stages: an early exit for subjects that
//! already carry a conventional prefix, an ordered first-match scan over
//! keyword rule groups, and a pair of unconditional substring overrides
//! that run last and win over whatever the ordered scan picked.

use super::{ConventionalSubject, ConventionalType};

/// How merge-commit subjects are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeHandling {
    /// Leave merge commits untouched.
    #[default]
    PassThrough,
    /// Classify merge commits as `chore` like any other subject.
    Classify,
}

/// Behavioral toggles for classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    /// Merge-commit treatment.
    pub merge_handling: MergeHandling,
}

/// How a rule matches the lower-cased subject.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Subject starts with one of these tokens.
    Prefix(&'static [&'static str]),
    /// Subject contains one of these tokens anywhere.
    Contains(&'static [&'static str]),
}

/// One ordered classification rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short label for diagnostics and tests.
    pub name: &'static str,
    /// Match condition, applied to the lower-cased subject.
    pub matcher: Matcher,
    /// Type assigned when this rule fires.
    pub kind: ConventionalType,
}

impl Rule {
    fn matches(&self, lower_subject: &str) -> bool {
        match self.matcher {
            Matcher::Prefix(tokens) => tokens.iter().any(|t| lower_subject.starts_with(t)),
            Matcher::Contains(tokens) => tokens.iter().any(|t| lower_subject.contains(t)),
        }
    }
}

/// Unconditional substring override, applied after the ordered rules.
#[derive(Debug, Clone, Copy)]
pub struct Override {
    /// Substring that triggers the override.
    pub needle: &'static str,
    /// Type forced when the needle is present.
    pub kind: ConventionalType,
}

/// Result of classifying one subject line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Subject already carried a conventional prefix; only the type token
    /// needs lowercasing.
    Conventional(ConventionalSubject),
    /// Subject was assigned a type by the heuristic rules. The subject text
    /// has its trailing period stripped but is otherwise untouched.
    Classified {
        /// Assigned conventional type.
        kind: ConventionalType,
        /// Period-stripped subject, original case preserved.
        subject: String,
    },
    /// Merge commit left as-is under [`MergeHandling::PassThrough`].
    PassThrough,
}

/// The ordered rule list plus overrides.
///
/// Rule order is significant: the first matching rule wins, so the list is
/// explicit data rather than a chain of conditionals, and tests can assert
/// on it directly.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    overrides: Vec<Override>,
}

impl Default for RuleSet {
    fn default() -> Self {
        use ConventionalType::{Chore, Docs, Feat, Fix, Refactor, Style, Test};

        Self {
            rules: vec![
                Rule {
                    name: "creation",
                    matcher: Matcher::Prefix(&[
                        "add", "added", "create", "created", "implement", "new", "feat", "feature",
                    ]),
                    kind: Feat,
                },
                Rule {
                    name: "correction",
                    matcher: Matcher::Prefix(&[
                        "fix", "fixed", "resolve", "resolved", "correct", "bug", "patch", "repair",
                        "restore",
                    ]),
                    kind: Fix,
                },
                Rule {
                    name: "mutation",
                    matcher: Matcher::Prefix(&[
                        "update", "updated", "change", "changed", "adjust", "adjusted", "modify",
                        "tweak",
                    ]),
                    kind: Chore,
                },
                Rule {
                    name: "structure",
                    matcher: Matcher::Prefix(&[
                        "refactor", "clean", "cleanup", "reorganize", "move", "extract", "simplify",
                    ]),
                    kind: Refactor,
                },
                Rule {
                    name: "documentation",
                    matcher: Matcher::Prefix(&["doc", "docs", "document", "readme"]),
                    kind: Docs,
                },
                Rule {
                    name: "deletion",
                    matcher: Matcher::Prefix(&["remove", "removed", "delete", "deleted", "drop"]),
                    kind: Chore,
                },
                Rule {
                    name: "presentation",
                    matcher: Matcher::Prefix(&["style", "styling", "format", "css", "ui", "layout"]),
                    kind: Style,
                },
                Rule {
                    name: "testing",
                    matcher: Matcher::Prefix(&["test", "tests", "spec"]),
                    kind: Test,
                },
                Rule {
                    name: "readme-anywhere",
                    matcher: Matcher::Contains(&["readme"]),
                    kind: Docs,
                },
            ],
            overrides: vec![
                Override { needle: "typo", kind: Docs },
                Override { needle: "bump", kind: Chore },
            ],
        }
    }
}

impl RuleSet {
    /// Read-only view of the ordered rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Read-only view of the overrides.
    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    /// Classifies one subject line.
    ///
    /// Total over all UTF-8 input: a subject matching no rule degrades to
    /// `chore`, never to an error.
    pub fn classify(&self, subject: &str, opts: ClassifyOptions) -> Classification {
        // Already conventional: lowercase the type and bypass every rule,
        // including the overrides. This is what makes rewriting idempotent.
        if let Some(parsed) = ConventionalSubject::parse(subject) {
            return Classification::Conventional(parsed);
        }

        let lower = subject.to_lowercase();

        let mut kind = self
            .rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.kind);

        if kind.is_none() && lower.contains("merge") {
            match opts.merge_handling {
                MergeHandling::PassThrough => return Classification::PassThrough,
                MergeHandling::Classify => kind = Some(ConventionalType::Chore),
            }
        }

        // Overrides run last and win even over an ordered-rule match.
        let mut kind = kind.unwrap_or(ConventionalType::Chore);
        for ov in &self.overrides {
            if lower.contains(ov.needle) {
                kind = ov.kind;
            }
        }

        let subject = subject.strip_suffix('.').unwrap_or(subject).to_string();
        Classification::Classified { kind, subject }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(subject: &str) -> Classification {
        RuleSet::default().classify(subject, ClassifyOptions::default())
    }

    fn classified_kind(subject: &str) -> ConventionalType {
        match classify(subject) {
            Classification::Classified { kind, .. } => kind,
            other => panic!("expected heuristic classification, got {other:?}"),
        }
    }

    #[test]
    fn creation_verbs_map_to_feat() {
        assert_eq!(classified_kind("Add login form"), ConventionalType::Feat);
        assert_eq!(classified_kind("Implement retry logic"), ConventionalType::Feat);
        assert_eq!(classified_kind("new homepage"), ConventionalType::Feat);
    }

    #[test]
    fn correction_verbs_map_to_fix() {
        assert_eq!(classified_kind("Fixed the crash on boot"), ConventionalType::Fix);
        assert_eq!(classified_kind("Resolve flaky timeout"), ConventionalType::Fix);
        assert_eq!(classified_kind("Bugfix for empty input"), ConventionalType::Fix);
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        // "update docs" starts with a mutation verb, so the documentation
        // rule further down the list never sees it.
        assert_eq!(classified_kind("Update docs for v2"), ConventionalType::Chore);
    }

    #[test]
    fn deletion_and_structure_rules() {
        assert_eq!(classified_kind("Remove dead code"), ConventionalType::Chore);
        assert_eq!(classified_kind("Refactor session handling"), ConventionalType::Refactor);
        assert_eq!(classified_kind("Move helpers into utils"), ConventionalType::Refactor);
    }

    #[test]
    fn presentation_and_test_rules() {
        assert_eq!(classified_kind("CSS tweaks for navbar"), ConventionalType::Style);
        assert_eq!(classified_kind("Tests for the parser"), ConventionalType::Test);
    }

    #[test]
    fn readme_anywhere_maps_to_docs() {
        assert_eq!(classified_kind("Touch up README badges"), ConventionalType::Docs);
    }

    #[test]
    fn unmatched_subject_defaults_to_chore() {
        assert_eq!(classified_kind("Weekly housekeeping"), ConventionalType::Chore);
        assert_eq!(classified_kind(""), ConventionalType::Chore);
        assert_eq!(classified_kind("   "), ConventionalType::Chore);
    }

    #[test]
    fn overrides_beat_ordered_rules() {
        // "Bump" would otherwise not match; "add" fires feat first, but the
        // bump override still wins.
        assert_eq!(classified_kind("Bump lodash version"), ConventionalType::Chore);
        assert_eq!(classified_kind("Add bump script"), ConventionalType::Chore);
        assert_eq!(classified_kind("Fix typo in error message"), ConventionalType::Docs);
    }

    #[test]
    fn trailing_period_is_stripped() {
        match classify("Bump lodash version.") {
            Classification::Classified { kind, subject } => {
                assert_eq!(kind, ConventionalType::Chore);
                assert_eq!(subject, "Bump lodash version");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn conventional_subjects_bypass_rules_and_overrides() {
        // Contains "typo", but the early exit means the override never runs.
        match classify("fix: correct typo in banner") {
            Classification::Conventional(parsed) => {
                assert_eq!(parsed.kind, ConventionalType::Fix);
                assert_eq!(parsed.content, "correct typo in banner");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn merge_passes_through_by_default() {
        assert_eq!(classify("Merge branch 'main' into dev"), Classification::PassThrough);
    }

    #[test]
    fn merge_classifies_as_chore_when_configured() {
        let opts = ClassifyOptions { merge_handling: MergeHandling::Classify };
        match RuleSet::default().classify("Merge branch 'main' into dev", opts) {
            Classification::Classified { kind, .. } => assert_eq!(kind, ConventionalType::Chore),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn merge_rule_only_fires_when_nothing_else_matched() {
        // Starts with a correction verb, so the merge containment check is
        // never reached.
        assert_eq!(classified_kind("Fix merge conflict leftovers"), ConventionalType::Fix);
    }
}
