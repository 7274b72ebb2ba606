//! Final assembly of rewritten commit messages.

use super::{Classification, ClassifyOptions, ConventionalType, RuleSet};

/// Formats a subject line as `"{type}{scope}: {subject}"`.
///
/// If the subject itself begins with `"{type}:"` (case-insensitively), that
/// redundant prefix and the whitespace around it are stripped before
/// re-prefixing, so `"feat: Add X"` classified as `feat` comes out as
/// `"feat: Add X"` rather than `"feat: feat: Add X"`.
///
/// Total: an empty subject yields the degenerate `"{type}: "`.
pub fn format_subject(kind: ConventionalType, scope: Option<&str>, subject: &str) -> String {
    let mut content = subject;

    let tag = kind.as_str();
    let trimmed = content.trim_start();
    if trimmed.len() > tag.len()
        && trimmed.is_char_boundary(tag.len())
        && trimmed[..tag.len()].eq_ignore_ascii_case(tag)
        && trimmed[tag.len()..].starts_with(':')
    {
        content = trimmed[tag.len() + 1..].trim();
    }

    format!("{}{}: {}", tag, scope.unwrap_or(""), content)
}

/// Reattaches body lines after the subject, separated by one blank line.
fn assemble(subject_line: String, body: &str) -> String {
    if body.is_empty() {
        subject_line
    } else {
        format!("{subject_line}\n\n{body}")
    }
}

/// Rewrites one whole commit message into conventional form.
///
/// The first line is classified and reformatted; any remaining lines are
/// treated as the body and reattached verbatim after exactly one blank
/// line. Deterministic and total, and idempotent: feeding the output back
/// in returns it unchanged.
pub fn rewrite_message(original: &str, rules: &RuleSet, opts: ClassifyOptions) -> String {
    let trimmed = original.trim();
    let (subject, body) = match trimmed.split_once('\n') {
        Some((subject, rest)) => (subject.trim(), rest.trim()),
        None => (trimmed, ""),
    };

    match rules.classify(subject, opts) {
        Classification::PassThrough => trimmed.to_string(),
        // format_subject also collapses a doubled prefix hiding inside the
        // content, e.g. "fix: fix: X" -> "fix: X".
        Classification::Conventional(parsed) => assemble(
            format_subject(parsed.kind, parsed.scope.as_deref(), &parsed.content),
            body,
        ),
        Classification::Classified { kind, subject } => {
            assemble(format_subject(kind, None, &subject), body)
        }
    }
}
