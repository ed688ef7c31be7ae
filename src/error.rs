//! Unified error types for the REPL and its collaborators.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// TerminalError
// ---------------------------------------------------------------------------

/// Errors raised by a terminal widget.
#[derive(Debug)]
pub enum TerminalError {
    Io(std::io::Error),
    /// `on_key` was called while a key handler is already registered.
    AlreadySubscribed,
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "terminal io: {e}"),
            Self::AlreadySubscribed => write!(f, "a key handler is already registered"),
        }
    }
}

impl std::error::Error for TerminalError {}

impl From<std::io::Error> for TerminalError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// StartupError
// ---------------------------------------------------------------------------

/// Fatal errors that prevent the REPL from becoming interactive.
#[derive(Debug)]
pub enum StartupError {
    Config(ConfigError),
    /// The evaluator failed its capability check.
    EvaluatorUnavailable(String),
    Terminal(TerminalError),
    /// Banner or prompt could not be written during initialization.
    Repl(ReplError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::EvaluatorUnavailable(msg) => write!(f, "evaluator unavailable: {msg}"),
            Self::Terminal(e) => write!(f, "terminal: {e}"),
            Self::Repl(e) => write!(f, "initialization: {e}"),
        }
    }
}

impl std::error::Error for StartupError {}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TerminalError> for StartupError {
    fn from(e: TerminalError) -> Self {
        Self::Terminal(e)
    }
}

impl From<ReplError> for StartupError {
    fn from(e: ReplError) -> Self {
        Self::Repl(e)
    }
}

// ---------------------------------------------------------------------------
// ReplError
// ---------------------------------------------------------------------------

/// Errors from the controller and session loop.
#[derive(Debug)]
pub enum ReplError {
    Terminal(TerminalError),
    /// `handle` was called before `initialize`.
    NotInitialized,
    /// `initialize` was called a second time.
    AlreadyInitialized,
}

impl fmt::Display for ReplError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(e) => write!(f, "{e}"),
            Self::NotInitialized => write!(f, "repl used before initialization"),
            Self::AlreadyInitialized => write!(f, "repl already initialized"),
        }
    }
}

impl std::error::Error for ReplError {}

impl From<TerminalError> for ReplError {
    fn from(e: TerminalError) -> Self {
        Self::Terminal(e)
    }
}

impl From<std::io::Error> for ReplError {
    fn from(e: std::io::Error) -> Self {
        Self::Terminal(TerminalError::Io(e))
    }
}
