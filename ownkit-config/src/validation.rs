//! Custom validation functions for configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static POLICY_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new("^(linear-scan|free-stack)$"));

/// Validate that the provided value is a power of two.
pub fn validate_power_of_two(value: usize) -> Result<(), ValidationError> {
    if value.is_power_of_two() {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_power_of_two"))
    }
}

/// Validate a heap search policy name.
pub fn validate_policy(policy: &str) -> Result<(), ValidationError> {
    let re = POLICY_RE
        .as_ref()
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(policy) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_search_policy"))
    }
}

/// Validate a log level name.
pub fn validate_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two() {
        assert!(validate_power_of_two(4096).is_ok());
        assert!(validate_power_of_two(4000).is_err());
    }

    #[test]
    fn policy_names() {
        assert!(validate_policy("linear-scan").is_ok());
        assert!(validate_policy("free-stack").is_ok());
        assert!(validate_policy("linear-scan2").is_err());
    }

    #[test]
    fn levels_are_case_insensitive() {
        assert!(validate_level("WARN").is_ok());
        assert!(validate_level("verbose").is_err());
    }
}
