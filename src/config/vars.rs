//! Environment variable interpolation for config files.
//!
//! Supports the following syntax:
//! - `${VAR}` - substitute with env var value, error if missing
//! - `${VAR:-default}` - use default if VAR is unset or empty
//! - `$$` - escape sequence for literal `$`

use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// Matches `$$`, `${VAR}` and `${VAR:-default}`.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \$\$                           # Escape sequence $$
        |
        \$\{                           # Opening ${
            ([A-Za-z_][A-Za-z0-9_]*)   # Variable name (capture group 1)
            (?:
                :-                     # Default value separator
                ([^}]*)                # Default value (capture group 2)
            )?
        \}                             # Closing }
        ",
    )
    .expect("Invalid regex pattern")
});

/// Result of environment variable interpolation.
#[derive(Debug)]
pub struct InterpolationResult {
    /// The interpolated text.
    pub text: String,
    /// Any errors encountered during interpolation.
    pub errors: Vec<String>,
}

impl InterpolationResult {
    /// Returns true if there were no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Interpolate environment variables in the given text.
///
/// All errors are accumulated so the user can see all missing variables at once.
pub fn interpolate(input: &str) -> InterpolationResult {
    let mut errors = Vec::new();

    let text = ENV_VAR_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            let full_match = caps.get(0).unwrap().as_str();

            if full_match == "$$" {
                return "$".to_string();
            }

            let var_name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let default_value = caps.get(2).map(|m| m.as_str());

            match env::var(var_name) {
                Ok(value) if !value.is_empty() => value,
                _ => match default_value {
                    Some(default) => default.to_string(),
                    None => {
                        errors.push(format!("missing environment variable: {var_name}"));
                        String::new()
                    }
                },
            }
        })
        .into_owned();

    InterpolationResult { text, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_braced_var() {
        // SAFETY: tests in this module set distinct variable names
        unsafe { env::set_var("LH_TEST_BUCKET", "my-bucket") };
        let result = interpolate("s3://${LH_TEST_BUCKET}/tables");
        assert!(result.is_ok());
        assert_eq!(result.text, "s3://my-bucket/tables");
    }

    #[test]
    fn test_interpolate_default_used_when_unset() {
        let result = interpolate("${LH_TEST_UNSET_VAR:-fallback}");
        assert!(result.is_ok());
        assert_eq!(result.text, "fallback");
    }

    #[test]
    fn test_interpolate_missing_var_is_error() {
        let result = interpolate("key: ${LH_TEST_DEFINITELY_MISSING}");
        assert!(!result.is_ok());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("LH_TEST_DEFINITELY_MISSING"));
    }

    #[test]
    fn test_interpolate_escape_sequence() {
        let result = interpolate("cost: $$5");
        assert!(result.is_ok());
        assert_eq!(result.text, "cost: $5");
    }
}
