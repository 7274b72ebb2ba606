//! Git repository access and history rewriting.

use anyhow::{Context, Result};
use git2::Repository;

use crate::error::RenormError;

pub mod history;
pub mod rewriter;

pub use history::collect_messages;
pub use rewriter::{Git2Rewriter, HistoryRewriter, RewriteOutcome, RewriteSummary};

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;

/// Checks that the current directory is inside a git repository.
pub fn check_git_repo() -> Result<()> {
    Repository::open(".").context("Not in a git repository")?;
    Ok(())
}

/// Checks that the working directory has no uncommitted changes.
///
/// Ignored files do not count.
pub fn check_working_directory_clean(repo: &Repository) -> Result<()> {
    let statuses = repo
        .statuses(None)
        .context("Failed to get repository status")?;

    let dirty = statuses.iter().any(|entry| !entry.status().is_ignored());
    if dirty {
        return Err(RenormError::DirtyWorkingTree.into());
    }

    Ok(())
}
