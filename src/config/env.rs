//! `CALCLINE_*` environment overrides applied on top of the file config.

use crate::error::ConfigError;
use crate::repl::{InsertPolicy, TypeaheadPolicy};

use super::Config;

pub(super) const ENV_PROMPT: &str = "CALCLINE_PROMPT";
pub(super) const ENV_INSERT_POLICY: &str = "CALCLINE_INSERT_POLICY";
pub(super) const ENV_TYPEAHEAD: &str = "CALCLINE_TYPEAHEAD";
pub(super) const ENV_EVALUATOR_TIMEOUT: &str = "CALCLINE_EVALUATOR_TIMEOUT_SECS";
pub(super) const ENV_LOG_FILE: &str = "CALCLINE_LOG_FILE";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(prompt) = env_lookup(ENV_PROMPT) {
        config.repl.prompt = prompt;
    }
    if let Some(value) = env_lookup(ENV_INSERT_POLICY) {
        config.repl.insert_policy = parse_insert_policy(&value)?;
    }
    if let Some(value) = env_lookup(ENV_TYPEAHEAD) {
        config.repl.typeahead = parse_typeahead(&value)?;
    }
    if let Some(timeout) = env_lookup(ENV_EVALUATOR_TIMEOUT) {
        // Clamp to at least 1 second so a zero never disables the limit.
        let parsed = timeout.trim().parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_EVALUATOR_TIMEOUT} value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.evaluator.timeout_secs = parsed.max(1);
    }
    if let Some(path) = env_lookup(ENV_LOG_FILE) {
        let path = path.trim();
        config.logging.file = (!path.is_empty()).then(|| path.to_string());
    }
    Ok(())
}

fn parse_insert_policy(value: &str) -> Result<InsertPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "single-char" => Ok(InsertPolicy::SingleChar),
        "verbatim" => Ok(InsertPolicy::Verbatim),
        _ => Err(ConfigError::Invalid(format!(
            "invalid {ENV_INSERT_POLICY} value `{value}`: expected `single-char` or `verbatim`"
        ))),
    }
}

fn parse_typeahead(value: &str) -> Result<TypeaheadPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "queue" => Ok(TypeaheadPolicy::Queue),
        "discard" => Ok(TypeaheadPolicy::Discard),
        _ => Err(ConfigError::Invalid(format!(
            "invalid {ENV_TYPEAHEAD} value `{value}`: expected `queue` or `discard`"
        ))),
    }
}
