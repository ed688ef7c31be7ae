//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`CALCLINE_PROMPT`, `CALCLINE_INSERT_POLICY`,
//!    `CALCLINE_TYPEAHEAD`, `CALCLINE_EVALUATOR_TIMEOUT_SECS`,
//!    `CALCLINE_LOG_FILE`)
//! 2. TOML file specified via `--config`
//! 3. `./calcline.toml` in the current directory
//! 4. `$XDG_CONFIG_HOME/calcline/calcline.toml` (or
//!    `~/.config/calcline/calcline.toml`)
//! 5. Built-in defaults
//!
//! Command-line flags are applied after loading, in `cli`.

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use defaults::DEFAULT_LOG_FILTER;
pub use loader::load_config;
pub use sources::{config_root_dir, ConfigSource};
pub use types::{Config, EvaluatorConfig, EvaluatorKind, LoadedConfig, LoggingConfig, ReplConfig};

use crate::repl::SessionOptions;

impl Config {
    /// Session settings derived from the `[repl]` table.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            prompt: self.repl.prompt.clone(),
            insert_policy: self.repl.insert_policy,
            typeahead: self.repl.typeahead,
        }
    }
}
