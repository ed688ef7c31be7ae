//! Evaluator loading with a capability check.
//!
//! Loading happens before any terminal setup. A failed check is a startup
//! failure: the caller must not open the REPL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calc::Calculator;
use crate::config::{EvaluatorConfig, EvaluatorKind};
use crate::error::{ConfigError, StartupError};

use super::{CommandEvaluator, Evaluator};

/// Banner used by the command evaluator when none is configured.
const DEFAULT_COMMAND_BANNER: &str = "Evaluating lines with";

/// Which evaluator to instantiate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorSpec {
    /// The built-in calculator.
    Builtin,
    /// An external program run once per submitted line.
    Command {
        argv: Vec<String>,
        timeout: Duration,
        banner: Option<String>,
    },
}

impl EvaluatorSpec {
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, ConfigError> {
        match config.kind {
            EvaluatorKind::Builtin => Ok(Self::Builtin),
            EvaluatorKind::Command => {
                if config.command.first().map_or(true, |p| p.trim().is_empty()) {
                    return Err(ConfigError::Invalid(
                        "evaluator.kind = \"command\" requires a non-empty `evaluator.command`"
                            .to_string(),
                    ));
                }
                Ok(Self::Command {
                    argv: config.command.clone(),
                    timeout: Duration::from_secs(config.timeout_secs.max(1)),
                    banner: config.banner.clone(),
                })
            }
        }
    }
}

/// Check and instantiate the evaluator described by `spec`.
pub fn load(spec: &EvaluatorSpec) -> Result<Box<dyn Evaluator>, StartupError> {
    load_with_path(spec, std::env::var_os("PATH").as_deref())
}

pub(crate) fn load_with_path(
    spec: &EvaluatorSpec,
    search_path: Option<&std::ffi::OsStr>,
) -> Result<Box<dyn Evaluator>, StartupError> {
    match spec {
        EvaluatorSpec::Builtin => {
            tracing::info!("loaded built-in calculator");
            Ok(Box::new(Calculator::new()))
        }
        EvaluatorSpec::Command {
            argv,
            timeout,
            banner,
        } => {
            let Some((program, args)) = argv.split_first() else {
                return Err(StartupError::EvaluatorUnavailable(
                    "empty evaluator command".to_string(),
                ));
            };
            let resolved = resolve_program(program, search_path)
                .map_err(StartupError::EvaluatorUnavailable)?;
            tracing::info!(program = %resolved.display(), "loaded command evaluator");
            let banner = banner
                .clone()
                .unwrap_or_else(|| format!("{DEFAULT_COMMAND_BANNER} `{}`\n", argv.join(" ")));
            Ok(Box::new(CommandEvaluator::new(
                resolved,
                args.to_vec(),
                *timeout,
                banner,
            )))
        }
    }
}

/// Resolve `program` to an executable file: as a path when it contains a
/// separator, otherwise by searching `search_path`.
fn resolve_program(
    program: &str,
    search_path: Option<&std::ffi::OsStr>,
) -> Result<PathBuf, String> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(format!("`{program}` is not an executable file"))
        };
    }

    search_path
        .into_iter()
        .flat_map(|paths| std::env::split_paths(paths))
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
        .ok_or_else(|| format!("`{program}` not found on PATH"))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    fn command_config(command: &[&str]) -> EvaluatorConfig {
        EvaluatorConfig {
            kind: EvaluatorKind::Command,
            command: command.iter().map(|s| s.to_string()).collect(),
            ..EvaluatorConfig::default()
        }
    }

    #[test]
    fn builtin_spec_from_default_config() {
        let spec = EvaluatorSpec::from_config(&EvaluatorConfig::default()).unwrap();
        assert_eq!(spec, EvaluatorSpec::Builtin);
    }

    #[test]
    fn command_kind_requires_a_program() {
        let err = EvaluatorSpec::from_config(&command_config(&[])).unwrap_err();
        assert!(err.to_string().contains("evaluator.command"), "got: {err}");
        assert!(EvaluatorSpec::from_config(&command_config(&["  "])).is_err());
    }

    #[test]
    fn command_timeout_is_at_least_one_second() {
        let mut config = command_config(&["bc", "-l"]);
        config.timeout_secs = 0;
        let spec = EvaluatorSpec::from_config(&config).unwrap();
        let EvaluatorSpec::Command { timeout, argv, .. } = spec else {
            panic!("expected command spec");
        };
        assert_eq!(timeout, Duration::from_secs(1));
        assert_eq!(argv, vec!["bc", "-l"]);
    }

    #[test]
    fn builtin_always_loads() {
        let evaluator = load_with_path(&EvaluatorSpec::Builtin, None).unwrap();
        assert!(!evaluator.welcome_banner().is_empty());
    }

    #[test]
    fn missing_program_fails_the_check() {
        let spec = EvaluatorSpec::Command {
            argv: vec!["calcline-no-such-program".to_string()],
            timeout: Duration::from_secs(1),
            banner: None,
        };
        let err = load_with_path(&spec, Some(std::ffi::OsStr::new("/nonexistent")))
            .err()
            .expect("check should fail");
        assert!(matches!(err, StartupError::EvaluatorUnavailable(_)));
        assert!(err.to_string().contains("not found on PATH"), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn program_is_resolved_through_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TestTempDir::new("loader");
        let script = dir.write_text("bin/fake-eval", "#!/bin/sh\ncat\n");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let search = dir.child("bin").into_os_string();
        let resolved = resolve_program("fake-eval", Some(search.as_os_str())).unwrap();
        assert_eq!(resolved, script);

        let spec = EvaluatorSpec::Command {
            argv: vec!["fake-eval".to_string()],
            timeout: Duration::from_secs(1),
            banner: None,
        };
        let evaluator = load_with_path(&spec, Some(search.as_os_str())).unwrap();
        assert_eq!(evaluator.welcome_banner(), "Evaluating lines with `fake-eval`\n");
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_path_fails_the_check() {
        let dir = TestTempDir::new("loader");
        let file = dir.write_text("plain.txt", "not a program");
        let err = resolve_program(file.to_str().unwrap(), None).unwrap_err();
        assert!(err.contains("not an executable file"), "got: {err}");
    }
}
