//! `${VAR}` and `${VAR:-default}` expansion for string settings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand environment variable references in a setting value.
///
/// `${VAR}` must be set; `${VAR:-default}` falls back to `default`.
/// Values without `${` are returned as-is, and bare `$VAR` is never expanded.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| -> Result<Option<Cow<'static, str>>, UnsetVar> {
        std::env::var(var)
            .map(|val| Some(Cow::Owned(val)))
            .map_err(|_| UnsetVar(var.to_owned()))
    };

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Name of an environment variable that was referenced but not set.
struct UnsetVar(String);
