//! Configuration data model.
//!
//! Struct/enum definitions plus default values. Loading and precedence live in
//! `config::mod` and its helper modules.

use serde::Deserialize;

use crate::repl::{InsertPolicy, TypeaheadPolicy};

use super::defaults::{DEFAULT_EVALUATOR_TIMEOUT_SECS, DEFAULT_PROMPT};
use super::sources::ConfigSource;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub repl: ReplConfig,
    pub evaluator: EvaluatorConfig,
    pub logging: LoggingConfig,
}

/// Line editing and prompt behavior.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    /// Text written after every result and after the banner.
    pub prompt: String,
    /// How key identifiers longer than one character are treated.
    pub insert_policy: InsertPolicy,
    /// What happens to keys typed while a line is being evaluated.
    pub typeahead: TypeaheadPolicy,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            insert_policy: InsertPolicy::default(),
            typeahead: TypeaheadPolicy::default(),
        }
    }
}

/// Which evaluator backs the REPL.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    #[default]
    Builtin,
    Command,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    pub kind: EvaluatorKind,
    /// Program and arguments; used when `kind = "command"`.
    pub command: Vec<String>,
    /// Per-line limit for the command evaluator.
    pub timeout_secs: u64,
    /// Banner for the command evaluator. The built-in calculator has its own.
    pub banner: Option<String>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            kind: EvaluatorKind::default(),
            command: Vec::new(),
            timeout_secs: DEFAULT_EVALUATOR_TIMEOUT_SECS,
            banner: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Append logs to this file instead of stderr.
    pub file: Option<String>,
    /// `EnvFilter` directive; `CALCLINE_LOG` wins over it.
    pub filter: Option<String>,
}

/// Resolved config plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}
