//! CLI argument parsing via clap.

use clap::Parser;

use crate::build_info;
use crate::config::{Config, EvaluatorKind};
use crate::repl::{InsertPolicy, TypeaheadPolicy};

/// A line-editing console that sends each line to an evaluator and prints
/// the result.
#[derive(Debug, Parser)]
#[command(name = "calcline", version, long_version = build_info::LONG_VERSION)]
pub struct Args {
    /// Path to config file (default: ./calcline.toml or ~/.config/calcline/calcline.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the prompt text.
    #[arg(short = 'p', long = "prompt")]
    pub prompt: Option<String>,

    /// How multi-character key names are treated.
    #[arg(long = "insert-policy", value_enum)]
    pub insert_policy: Option<InsertPolicy>,

    /// What happens to keys typed while a line is evaluating.
    #[arg(long = "typeahead", value_enum)]
    pub typeahead: Option<TypeaheadPolicy>,

    /// Per-line timeout for a command evaluator, in seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Evaluate lines with an external program instead of the calculator.
    /// Consumes the remaining arguments.
    #[arg(
        long = "command",
        num_args = 1..,
        allow_hyphen_values = true,
        value_name = "PROGRAM"
    )]
    pub command: Option<Vec<String>>,

    /// Disable color in diagnostics.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(prompt) = &self.prompt {
            config.repl.prompt = prompt.clone();
        }
        if let Some(policy) = self.insert_policy {
            config.repl.insert_policy = policy;
        }
        if let Some(policy) = self.typeahead {
            config.repl.typeahead = policy;
        }
        if let Some(secs) = self.timeout {
            config.evaluator.timeout_secs = secs.max(1);
        }
        if let Some(command) = &self.command {
            config.evaluator.kind = EvaluatorKind::Command;
            config.evaluator.command = command.clone();
        }
    }
}
