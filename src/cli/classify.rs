//! Classify command — one-shot classification of a single message.

use anyhow::Result;
use clap::Parser;

use crate::conventional::{self, ClassifyOptions, MergeHandling, RuleSet};

/// Classify command options.
#[derive(Parser)]
pub struct ClassifyCommand {
    /// Commit message to classify (subject, or full message with body).
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Classify merge commits as chore instead of leaving them untouched.
    #[arg(long)]
    pub classify_merges: bool,
}

impl ClassifyCommand {
    /// Executes the classify command.
    pub fn execute(self) -> Result<()> {
        let opts = ClassifyOptions {
            merge_handling: if self.classify_merges {
                MergeHandling::Classify
            } else {
                MergeHandling::PassThrough
            },
        };
        let rewritten = conventional::rewrite_message(&self.message, &RuleSet::default(), opts);
        println!("{rewritten}");
        Ok(())
    }
}
