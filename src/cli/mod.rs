//! CLI interface for git-renorm.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod apply;
pub mod classify;
pub mod table;

pub use apply::ApplyCommand;
pub use classify::ClassifyCommand;
pub use table::{CoverageCommand, GenerateCommand, TableCommand};

/// Default path of the mapping-table artifact.
pub const DEFAULT_TABLE_PATH: &str = "renorm-messages.txt";

/// Default path of the missing-message listing.
pub const DEFAULT_MISSING_PATH: &str = "missing-commits.txt";

/// git-renorm: normalize commit messages across a history.
#[derive(Parser)]
#[command(name = "git-renorm")]
#[command(about = "Normalize a git history's commit messages into conventional commit form", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Mapping-table operations (generate, coverage).
    Table(TableCommand),
    /// Rewrites history by applying the mapping table.
    Apply(ApplyCommand),
    /// Classifies a single message and prints the rewritten form.
    Classify(ClassifyCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Table(cmd) => cmd.execute(),
            Commands::Apply(cmd) => cmd.execute(),
            Commands::Classify(cmd) => cmd.execute(),
        }
    }
}
