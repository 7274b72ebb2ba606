//! The history-rewriter boundary and its git2-backed implementation.
//!
//! The engine hands the rewriter a single per-commit callback; the rewriter
//! owns iteration order, object rewriting, and ref updates. `Git2Rewriter`
//! replays the selected branch oldest-first, rebuilding each commit with
//! the returned message and re-pointing the branch ref once at the very
//! end, so a failure mid-replay leaves every ref untouched.

use std::collections::HashMap;

use anyhow::{Context, Result};
use git2::{Oid, Repository, Sort};
use serde::Serialize;
use tracing::{debug, trace};

use crate::data::MappingTable;
use crate::error::RenormError;
use crate::git::{check_working_directory_clean, SHORT_HASH_LEN};

/// Result of the per-commit rewrite callback.
///
/// Tagged, rather than returning the input back, so callers can tell
/// "found and rewritten" from "left as original" when reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The table held an entry; commit with this text.
    Mapped(String),
    /// No table entry; the original message is kept verbatim.
    Unchanged,
}

/// Counts reported after a full history replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    /// Commits visited.
    pub total: usize,
    /// Commits whose message came from the table.
    pub mapped: usize,
    /// Commits left with their original message.
    pub unchanged: usize,
}

/// Contract required of a history rewriter: walk the full history exactly
/// once, invoke the callback per commit, and persist the returned text.
pub trait HistoryRewriter {
    /// Replays history, calling `rewrite` once per commit in the order this
    /// rewriter chooses.
    fn rewrite_history(
        &self,
        rewrite: &mut dyn FnMut(&str) -> RewriteOutcome,
    ) -> Result<RewriteSummary>;
}

/// Builds the replay callback from a finalized table.
///
/// Exact-match on the trimmed message; anything absent from the table
/// passes through unchanged. The closure borrows the table immutably and
/// keeps no other state, so it is referentially stable across the replay.
pub fn rewrite_with_table(table: &MappingTable) -> impl Fn(&str) -> RewriteOutcome + '_ {
    |current: &str| match table.get(current.trim()) {
        Some(value) => RewriteOutcome::Mapped(value.to_string()),
        None => RewriteOutcome::Unchanged,
    }
}

/// git2-backed history rewriter.
pub struct Git2Rewriter {
    repo: Repository,
    refname: Option<String>,
    allow_dirty: bool,
}

impl Git2Rewriter {
    /// Opens the repository in the current directory.
    pub fn new() -> Result<Self> {
        let repo = Repository::open(".").context("Failed to open git repository")?;
        Ok(Self { repo, refname: None, allow_dirty: false })
    }

    /// Opens the repository at the given path.
    pub fn open_at<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;
        Ok(Self { repo, refname: None, allow_dirty: false })
    }

    /// Restricts the rewrite to the named branch instead of HEAD's branch.
    pub fn with_refname(mut self, refname: Option<String>) -> Self {
        self.refname = refname;
        self
    }

    /// Skips the clean-working-tree check.
    pub fn allow_dirty(mut self, yes: bool) -> Self {
        self.allow_dirty = yes;
        self
    }

    /// Resolves the branch reference to rewrite: the named branch, or the
    /// branch HEAD points at.
    fn target_branch(&self) -> Result<(String, Oid)> {
        if let Some(name) = &self.refname {
            let branch = self
                .repo
                .find_branch(name, git2::BranchType::Local)
                .map_err(|_| RenormError::RefNotFound(name.clone()))?;
            let reference = branch.into_reference();
            let full_name = reference
                .name()
                .map(ToString::to_string)
                .ok_or_else(|| RenormError::RefNotFound(name.clone()))?;
            let tip = reference
                .target()
                .ok_or_else(|| RenormError::RefNotFound(name.clone()))?;
            return Ok((full_name, tip));
        }

        let head = self.repo.head().context("Failed to resolve HEAD")?;
        if !head.is_branch() {
            return Err(RenormError::DetachedHead.into());
        }
        let full_name = head
            .name()
            .map(ToString::to_string)
            .ok_or(RenormError::DetachedHead)?;
        let tip = head.target().ok_or(RenormError::DetachedHead)?;
        Ok((full_name, tip))
    }

    /// Rebuilds every commit reachable from `tip` oldest-first, mapping
    /// messages through the callback. Returns the new tip and the counts.
    fn replay(
        &self,
        tip: Oid,
        rewrite: &mut dyn FnMut(&str) -> RewriteOutcome,
    ) -> Result<(Oid, RewriteSummary)> {
        let mut revwalk = self.repo.revwalk().context("Failed to create revwalk")?;
        revwalk.push(tip).context("Failed to push tip onto revwalk")?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
            .context("Failed to set revwalk sorting")?;

        // Old commit id -> rewritten commit id. Topological+reverse order
        // guarantees parents are rewritten before their children.
        let mut rewritten: HashMap<Oid, Oid> = HashMap::new();
        let mut summary = RewriteSummary::default();

        for oid in revwalk {
            let oid = oid.context("Failed to walk history")?;
            let commit = self
                .repo
                .find_commit(oid)
                .with_context(|| format!("Failed to load commit {oid}"))?;

            let original = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            summary.total += 1;
            let message = match rewrite(&original) {
                RewriteOutcome::Mapped(text) => {
                    summary.mapped += 1;
                    text
                }
                RewriteOutcome::Unchanged => {
                    summary.unchanged += 1;
                    original
                }
            };

            let parents: Vec<git2::Commit> = commit
                .parent_ids()
                .map(|pid| {
                    let new_pid = rewritten.get(&pid).copied().unwrap_or(pid);
                    self.repo
                        .find_commit(new_pid)
                        .with_context(|| format!("Failed to load rewritten parent {new_pid}"))
                })
                .collect::<Result<_>>()?;
            let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

            let tree = commit.tree().context("Failed to load commit tree")?;
            let new_oid = self
                .repo
                .commit(
                    None,
                    &commit.author(),
                    &commit.committer(),
                    &message,
                    &tree,
                    &parent_refs,
                )
                .map_err(|e| RenormError::RewriteFailed(e.to_string()))?;

            trace!(old = %oid, new = %new_oid, "rewrote commit");
            rewritten.insert(oid, new_oid);
        }

        let new_tip = rewritten
            .get(&tip)
            .copied()
            .ok_or_else(|| RenormError::RewriteFailed(format!("tip {tip} was never visited")))?;
        Ok((new_tip, summary))
    }
}

impl HistoryRewriter for Git2Rewriter {
    fn rewrite_history(
        &self,
        rewrite: &mut dyn FnMut(&str) -> RewriteOutcome,
    ) -> Result<RewriteSummary> {
        if !self.allow_dirty {
            check_working_directory_clean(&self.repo)
                .context("Cannot rewrite history with uncommitted changes")?;
        }

        let (full_name, tip) = self.target_branch()?;
        debug!(branch = %full_name, tip = %tip, "starting history replay");

        let (new_tip, summary) = self.replay(tip, rewrite)?;

        if new_tip == tip {
            debug!("history unchanged; leaving {full_name} in place");
            return Ok(summary);
        }

        // The only ref mutation of the whole run. Everything before this
        // point wrote unreachable objects.
        self.repo
            .reference(
                &full_name,
                new_tip,
                true,
                "git-renorm: rewrite commit messages",
            )
            .map_err(|e| RenormError::RewriteFailed(e.to_string()))?;

        println!(
            "✅ Rewrote {} -> {}",
            &tip.to_string()[..SHORT_HASH_LEN],
            &new_tip.to_string()[..SHORT_HASH_LEN]
        );

        Ok(summary)
    }
}
