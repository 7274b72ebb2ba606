//! Table commands — generate the mapping table and report its coverage.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::conventional::{ClassifyOptions, MergeHandling, RuleSet};
use crate::data::{self, MappingTable};
use crate::git;

/// Table operations.
#[derive(Parser)]
pub struct TableCommand {
    /// Table subcommand to execute.
    #[command(subcommand)]
    pub command: TableSubcommands,
}

/// Table subcommands.
#[derive(Subcommand)]
pub enum TableSubcommands {
    /// Walks history and writes the reconciled mapping table.
    Generate(GenerateCommand),
    /// Reports how much of the history the table covers.
    Coverage(CoverageCommand),
}

impl TableCommand {
    /// Executes the selected table subcommand.
    pub fn execute(self) -> Result<()> {
        match self.command {
            TableSubcommands::Generate(cmd) => cmd.execute(),
            TableSubcommands::Coverage(cmd) => cmd.execute(),
        }
    }
}

/// Reads and parses a table artifact; a missing file is an empty table.
fn load_table(path: &Path) -> Result<MappingTable> {
    if !path.exists() {
        debug!(path = %path.display(), "no prior table artifact");
        return Ok(MappingTable::new());
    }
    let blob = fs::read_to_string(path)
        .with_context(|| format!("Failed to read table artifact: {}", path.display()))?;
    Ok(MappingTable::parse(&blob))
}

/// Generate command options.
#[derive(Parser)]
pub struct GenerateCommand {
    /// Prior table artifact to inherit approved mappings from.
    #[arg(long, value_name = "FILE", default_value = super::DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Where to write the reconciled table (defaults to the --table path).
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Branch to walk instead of HEAD's branch.
    #[arg(long, value_name = "REF")]
    pub refs: Option<String>,

    /// Classify merge commits as chore instead of leaving them untouched.
    #[arg(long)]
    pub classify_merges: bool,

    /// Keep table entries whose messages no longer appear in history.
    #[arg(long)]
    pub keep_orphans: bool,
}

impl GenerateCommand {
    /// Executes the generate command.
    pub fn execute(self) -> Result<()> {
        git::check_git_repo()?;
        let repo = git2::Repository::open(".").context("Failed to open git repository")?;

        let existing = load_table(&self.table)?;
        let history = git::collect_messages(&repo, self.refs.as_deref())?;

        let opts = ClassifyOptions {
            merge_handling: if self.classify_merges {
                MergeHandling::Classify
            } else {
                MergeHandling::PassThrough
            },
        };
        let (table, stats) = data::reconcile(
            &existing,
            &history,
            &RuleSet::default(),
            opts,
            self.keep_orphans,
        );

        let output = self.output.unwrap_or(self.table);
        fs::write(&output, table.render())
            .with_context(|| format!("Failed to write table artifact: {}", output.display()))?;

        println!("✅ Wrote {} entries to {}", table.len(), output.display());
        println!("   inherited: {}", stats.inherited);
        println!("   generated: {}", stats.generated);
        if stats.orphaned > 0 {
            let verdict = if self.keep_orphans { "kept" } else { "dropped" };
            println!("   orphaned:  {} ({verdict})", stats.orphaned);
        }

        Ok(())
    }
}

/// Coverage command options.
#[derive(Parser)]
pub struct CoverageCommand {
    /// Table artifact to check against history.
    #[arg(long, value_name = "FILE", default_value = super::DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Branch to walk instead of HEAD's branch.
    #[arg(long, value_name = "REF")]
    pub refs: Option<String>,

    /// Where to write the missing-message listing.
    #[arg(long, value_name = "FILE", default_value = super::DEFAULT_MISSING_PATH)]
    pub missing_report: PathBuf,
}

impl CoverageCommand {
    /// Executes the coverage command.
    pub fn execute(self) -> Result<()> {
        git::check_git_repo()?;
        let repo = git2::Repository::open(".").context("Failed to open git repository")?;

        let table = load_table(&self.table)?;
        let history = git::collect_messages(&repo, self.refs.as_deref())?;

        let (report, missing) = data::coverage(&table, &history);

        let yaml =
            serde_yaml::to_string(&report).context("Failed to serialize coverage report")?;
        print!("{yaml}");

        if !missing.is_empty() {
            fs::write(&self.missing_report, data::render_missing_report(&missing)).with_context(
                || format!("Failed to write missing report: {}", self.missing_report.display()),
            )?;
            println!("wrote {} missing messages to {}", missing.len(), self.missing_report.display());
        }

        Ok(())
    }
}
