//! Apply command — replays history through the rewrite callback.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::data::MappingTable;
use crate::git::{rewriter, Git2Rewriter, HistoryRewriter};

/// Apply command options.
#[derive(Parser)]
pub struct ApplyCommand {
    /// Table artifact holding the original -> rewritten mapping.
    #[arg(long, value_name = "FILE", default_value = super::DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Rewrite only this branch instead of HEAD's branch.
    #[arg(long, value_name = "REF")]
    pub refs: Option<String>,

    /// Rewrite even when the working directory has uncommitted changes.
    #[arg(long)]
    pub force: bool,
}

impl ApplyCommand {
    /// Executes the apply command.
    pub fn execute(self) -> Result<()> {
        println!("🔄 Rewriting commit messages from {}", self.table.display());

        let blob = fs::read_to_string(&self.table)
            .with_context(|| format!("Failed to read table artifact: {}", self.table.display()))?;
        let table = MappingTable::parse(&blob);
        if table.is_empty() {
            anyhow::bail!("table artifact {} holds no mappings", self.table.display());
        }

        let rewriter = Git2Rewriter::new()
            .context("Failed to initialize history rewriter")?
            .with_refname(self.refs)
            .allow_dirty(self.force);

        let mut rewrite = rewriter::rewrite_with_table(&table);
        let summary = rewriter
            .rewrite_history(&mut rewrite)
            .context("Failed to rewrite history")?;

        println!("✅ Replayed {} commits: {} mapped, {} unchanged", summary.total, summary.mapped, summary.unchanged);
        Ok(())
    }
}
