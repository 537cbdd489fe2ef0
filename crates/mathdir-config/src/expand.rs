//! Environment variable and home directory expansion for config strings.

use crate::ConfigError;

/// Expand `~`, `${VAR}` and `${VAR:-default}` in `value`.
///
/// `field` names the config field in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let expanded = shellexpand::env_with_context(value, lookup).map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: e.cause,
    })?;
    Ok(shellexpand::tilde(expanded.as_ref()).into_owned())
}

fn lookup(name: &str) -> Result<Option<String>, String> {
    let (var, default) = match name.split_once(":-") {
        Some((var, default)) => (var, Some(default)),
        None => (name, None),
    };

    match (std::env::var(var), default) {
        (Ok(value), Some(default)) if value.is_empty() => Ok(Some(default.to_owned())),
        (Ok(value), _) => Ok(Some(value)),
        (Err(_), Some(default)) => Ok(Some(default.to_owned())),
        (Err(_), None) => Err(format!("${{{var}}} not set")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("templates.toml", "f").unwrap(), "templates.toml");
    }

    #[test]
    fn test_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MATHDIR_EXPAND_TEST_DIR", "/srv/math");
        }

        assert_eq!(
            expand_env("${MATHDIR_EXPAND_TEST_DIR}/t.toml", "f").unwrap(),
            "/srv/math/t.toml"
        );

        unsafe {
            std::env::remove_var("MATHDIR_EXPAND_TEST_DIR");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MATHDIR_EXPAND_TEST_UNSET");
        }

        assert_eq!(
            expand_env("${MATHDIR_EXPAND_TEST_UNSET:-shared}/t.toml", "f").unwrap(),
            "shared/t.toml"
        );
    }

    #[test]
    fn test_missing_variable_errors() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MATHDIR_EXPAND_TEST_MISSING");
        }

        let err = expand_env("${MATHDIR_EXPAND_TEST_MISSING}", "templates.path").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("MATHDIR_EXPAND_TEST_MISSING"));
        assert!(msg.contains("templates.path"));
    }
}
