//! History enumeration: commit messages, oldest first.

use anyhow::{Context, Result};
use git2::{Repository, Sort};
use tracing::debug;

use crate::error::RenormError;

/// Resolves a branch-ish name to a commit id, or the current HEAD when no
/// name is given.
pub fn resolve_tip(repo: &Repository, refname: Option<&str>) -> Result<git2::Oid> {
    match refname {
        Some(name) => {
            let obj = repo
                .revparse_single(name)
                .map_err(|_| RenormError::RefNotFound(name.to_string()))?;
            let commit = obj
                .peel_to_commit()
                .map_err(|_| RenormError::RefNotFound(name.to_string()))?;
            Ok(commit.id())
        }
        None => {
            let head = repo.head().context("Failed to resolve HEAD")?;
            head.target().context("HEAD has no target commit")
        }
    }
}

/// Collects every commit message reachable from the given ref (or HEAD),
/// oldest first.
///
/// Each element is the exact message text of one commit; messages that are
/// not valid UTF-8 are decoded lossily. No normalization is applied here —
/// trimming is the table layer's concern.
pub fn collect_messages(repo: &Repository, refname: Option<&str>) -> Result<Vec<String>> {
    let tip = resolve_tip(repo, refname)?;

    let mut revwalk = repo.revwalk().context("Failed to create revwalk")?;
    revwalk.push(tip).context("Failed to push tip onto revwalk")?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
        .context("Failed to set revwalk sorting")?;

    let mut messages = Vec::new();
    for oid in revwalk {
        let oid = oid.context("Failed to walk history")?;
        let commit = repo
            .find_commit(oid)
            .with_context(|| format!("Failed to load commit {oid}"))?;
        messages.push(String::from_utf8_lossy(commit.message_bytes()).into_owned());
    }

    debug!(count = messages.len(), "collected history messages");
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use std::path::Path;

    fn init_repo(dir: &Path, messages: &[&str]) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let sig = Signature::now("Test User", "test@example.com").unwrap();
            let mut parent: Option<git2::Oid> = None;
            for (i, message) in messages.iter().enumerate() {
                std::fs::write(dir.join("file.txt"), format!("rev {i}")).unwrap();
                let mut index = repo.index().unwrap();
                index.add_path(Path::new("file.txt")).unwrap();
                index.write().unwrap();
                let tree_id = index.write_tree().unwrap();
                let tree = repo.find_tree(tree_id).unwrap();
                let parents = parent
                    .map(|oid| repo.find_commit(oid).unwrap())
                    .into_iter()
                    .collect::<Vec<_>>();
                let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
                let oid = repo
                    .commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
                    .unwrap();
                parent = Some(oid);
            }
        }
        repo
    }

    #[test]
    fn collects_messages_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path(), &["first commit", "second commit", "third commit"]);
        let messages = collect_messages(&repo, None).unwrap();
        assert_eq!(messages, vec!["first commit", "second commit", "third commit"]);
    }

    #[test]
    fn unknown_ref_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path(), &["only commit"]);
        let err = collect_messages(&repo, Some("no-such-branch")).unwrap_err();
        assert!(err.to_string().contains("no-such-branch"));
    }
}
