//! Data structures shared across commands.

use serde::{Deserialize, Serialize};

pub mod table;

pub use table::{reconcile, MappingTable, ReconcileStats};

/// Divider line between message blocks in the missing-message listing.
pub const MISSING_DIVIDER: &str = "--------------------";

/// Coverage of the current history by the mapping table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageReport {
    /// Commits walked, duplicates and empty messages included.
    pub total_commits: usize,
    /// Distinct non-empty commit messages in the walked history.
    pub total_messages: usize,
    /// Messages with a table entry.
    pub mapped: usize,
    /// Messages without a table entry.
    pub missing: usize,
}

/// Computes table coverage over a history, returning the report and the
/// missing messages in history order.
///
/// `mapped`/`missing` count distinct messages (a message repeated across
/// commits has one table entry and shows up once in the listing);
/// `total_commits` counts every walked commit.
pub fn coverage(table: &MappingTable, history: &[String]) -> (CoverageReport, Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    let mut missing = Vec::new();
    let mut mapped = 0usize;

    for message in history {
        let key = message.trim();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        if table.contains_key(key) {
            mapped += 1;
        } else {
            missing.push(key.to_string());
        }
    }

    let report = CoverageReport {
        total_commits: history.len(),
        total_messages: mapped + missing.len(),
        mapped,
        missing: missing.len(),
    };
    (report, missing)
}

/// Renders the missing-message listing, one message per block separated by
/// a fixed divider line.
pub fn render_missing_report(missing: &[String]) -> String {
    let mut out = String::new();
    for message in missing {
        out.push_str(message);
        out.push('\n');
        out.push_str(MISSING_DIVIDER);
        out.push('\n');
    }
    out
}
