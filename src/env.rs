//! Environment variable access.

use crate::error::{Error, Result};

/// Value of `key`, or `default` when it is unset
///
/// # Errors
/// `NotFound` when the variable is unset and no default is given. A value
/// that is not valid unicode counts as unset.
pub fn get_env(key: &str, default: Option<&str>) -> Result<String> {
    match std::env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => default
            .map(str::to_string)
            .ok_or_else(|| Error::MissingEnv(key.to_string())),
    }
}

/// Require `key` to be set
pub fn validate_env(key: &str) -> Result<()> {
    if std::env::var_os(key).is_none() {
        return Err(Error::Validation(format!(
            "Environment variable {key} is required"
        )));
    }
    Ok(())
}
