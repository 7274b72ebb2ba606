//! # git-renorm
//!
//! Normalizes free-form commit messages into conventional
//! `type: subject` form across an entire git history.
//!
//! The engine builds a deterministic mapping from original message text to
//! rewritten text: a heuristic classifier assigns each subject one
//! conventional type, a prior table artifact carrying manual corrections is
//! reconciled so approved entries are never regenerated, and the finalized
//! table backs a per-commit rewrite callback handed to a history rewriter.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod conventional;
pub mod data;
pub mod error;
pub mod git;

pub use crate::cli::Cli;
pub use crate::error::RenormError;

/// The current version of git-renorm.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
