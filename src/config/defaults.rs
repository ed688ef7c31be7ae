//! Default configuration constants.

/// File name searched for in the working directory and the config root.
pub(super) const CONFIG_FILE_NAME: &str = "calcline.toml";
/// Directory under the config root that holds the global config file.
pub(super) const CONFIG_DIR_NAME: &str = "calcline";
/// Prompt written after the banner and after every result.
pub(super) const DEFAULT_PROMPT: &str = crate::repl::DEFAULT_PROMPT;
/// Per-line limit for external evaluator programs.
pub(super) const DEFAULT_EVALUATOR_TIMEOUT_SECS: u64 = 10;
/// Log filter used when neither `CALCLINE_LOG` nor `logging.filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "calcline=info";
