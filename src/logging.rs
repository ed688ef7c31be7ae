//! Tracing subscriber setup.
//!
//! The REPL owns stdout, so log lines go to a file or to stderr, never to the
//! terminal the user is typing into.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LoggingConfig, DEFAULT_LOG_FILTER};
use crate::error::ConfigError;

/// Environment variable holding an `EnvFilter` directive. Setting it also
/// enables stderr logging when no log file is configured.
pub const LOG_ENV: &str = "CALCLINE_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPlan {
    pub destination: LogDestination,
    pub filter: String,
}

/// Decide where logs go and which filter applies.
pub fn plan(config: &LoggingConfig, env_filter: Option<&str>) -> LogPlan {
    let env_filter = env_filter.map(str::trim).filter(|f| !f.is_empty());
    let destination = match (&config.file, env_filter) {
        (Some(path), _) => LogDestination::File(PathBuf::from(path)),
        (None, Some(_)) => LogDestination::Stderr,
        (None, None) => LogDestination::Disabled,
    };
    let filter = env_filter
        .or(config.filter.as_deref())
        .unwrap_or(DEFAULT_LOG_FILTER)
        .to_string();
    LogPlan {
        destination,
        filter,
    }
}

/// Install the global subscriber described by `config` and `CALCLINE_LOG`.
pub fn init_logging(config: &LoggingConfig) -> Result<LogDestination, ConfigError> {
    let env_filter = std::env::var(LOG_ENV).ok();
    let plan = plan(config, env_filter.as_deref());
    let filter = EnvFilter::try_new(&plan.filter).map_err(|e| {
        ConfigError::Invalid(format!("invalid log filter `{}`: {e}", plan.filter))
    })?;

    let installed = match &plan.destination {
        LogDestination::Disabled => return Ok(LogDestination::Disabled),
        LogDestination::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogDestination::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    ConfigError::Invalid(format!(
                        "failed to open log file `{}`: {e}",
                        path.display()
                    ))
                })?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
    };
    if let Err(e) = installed {
        // Another subscriber (a test harness, say) is already global.
        eprintln!("calcline: logging not initialized: {e}");
    }
    Ok(plan.destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_file_or_env() {
        let plan = plan(&LoggingConfig::default(), None);
        assert_eq!(plan.destination, LogDestination::Disabled);
        assert_eq!(plan.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn env_enables_stderr_and_sets_filter() {
        let config = LoggingConfig {
            file: None,
            filter: Some("calcline=warn".into()),
        };
        let plan = plan(&config, Some("calcline=trace"));
        assert_eq!(plan.destination, LogDestination::Stderr);
        assert_eq!(plan.filter, "calcline=trace");
    }

    #[test]
    fn file_wins_over_stderr() {
        let config = LoggingConfig {
            file: Some("/tmp/calcline.log".into()),
            filter: Some("calcline=debug".into()),
        };
        let plan = plan(&config, None);
        assert_eq!(
            plan.destination,
            LogDestination::File(PathBuf::from("/tmp/calcline.log"))
        );
        assert_eq!(plan.filter, "calcline=debug");
    }

    #[test]
    fn blank_env_is_ignored() {
        let plan = plan(&LoggingConfig::default(), Some("  "));
        assert_eq!(plan.destination, LogDestination::Disabled);
    }
}
