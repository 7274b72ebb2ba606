//! Fatal error taxonomy for the rewrite pipeline.
//!
//! Only collaborator failures are errors. A malformed table pair is skipped
//! during parsing and a replay-time lookup miss passes the message through;
//! both are counted, not raised.

use thiserror::Error;

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum RenormError {
    /// The working tree has uncommitted changes and `--force` was not given.
    #[error(
        "working directory is not clean; commit or stash changes, or pass --force to rewrite anyway"
    )]
    DirtyWorkingTree,

    /// The requested ref does not resolve to a branch.
    #[error("reference not found: {0}")]
    RefNotFound(String),

    /// HEAD is detached and no `--refs` branch was named.
    #[error("HEAD is detached; name the branch to rewrite with --refs")]
    DetachedHead,

    /// The history replay itself failed; refs were left untouched.
    #[error("history rewrite failed: {0}")]
    RewriteFailed(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types
