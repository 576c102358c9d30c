//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// An unset variable without a default is an error naming `field`.
/// Strings without `${` are returned unchanged, including bare `$VAR`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    match shellexpand::env_with_context(value, lookup) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(e) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.cause,
        }),
    }
}

/// Variable lookup for [`shellexpand`]; the error is a ready message.
fn lookup(var: &str) -> Result<Option<String>, String> {
    match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Err(format!("${{{var}}} not set")),
        Err(std::env::VarError::NotUnicode(_)) => Err(format!("${{{var}}} is not valid UTF-8")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_with_default_uses_value() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MARKUPS_TEST_PYTHON", "/opt/python/bin/python3");
        }
        let result = expand_env("${MARKUPS_TEST_PYTHON:-python3}", "restructuredtext.python").unwrap();
        assert_eq!(result, "/opt/python/bin/python3");
        unsafe {
            std::env::remove_var("MARKUPS_TEST_PYTHON");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MARKUPS_TEST_UNSET");
        }
        let result = expand_env("${MARKUPS_TEST_UNSET:-dot}", "graphviz.dot").unwrap();
        assert_eq!(result, "dot");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MARKUPS_TEST_CDN", "cdn.example.com");
        }
        let result = expand_env("https://${MARKUPS_TEST_CDN}/MathJax.js", "mathjax.web_url").unwrap();
        assert_eq!(result, "https://cdn.example.com/MathJax.js");
        unsafe {
            std::env::remove_var("MARKUPS_TEST_CDN");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MARKUPS_TEST_MISSING");
        }
        let err = expand_env("${MARKUPS_TEST_MISSING}", "graphviz.dot").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MARKUPS_TEST_MISSING"));
        assert!(err.to_string().contains("graphviz.dot"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("python3", "f").unwrap(), "python3");
        assert_eq!(expand_env("$HOME", "f").unwrap(), "$HOME");
    }
}
