//! Environment variable parsing for configuration.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric or boolean values return `ConfigError::InvalidValue`.

use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{
    ENV_CERT, ENV_CHALLENGE_TOKEN, ENV_HOST, ENV_PASSWORD, ENV_REFRESH_RATIO, ENV_TIMEOUT,
    ENV_USERNAME,
};
use crate::types::CertVerification;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment value, mapping failures to `ConfigError::InvalidValue`.
fn parse_env<T: FromStr>(var: &str, value: &str, message: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: message.to_string(),
    })
}

/// Parse a boolean flag, accepting the usual spellings.
fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "must be true or false".to_string(),
        }),
    }
}

/// Apply environment variable configuration to the loader.
///
/// Values already set through builder methods are left untouched.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(host) = env_var_or_none(ENV_HOST) {
        loader.controller.get_or_insert(host);
    }
    if let Some(username) = env_var_or_none(ENV_USERNAME) {
        loader.username.get_or_insert(username);
    }
    if let Some(password) = env_var_or_none(ENV_PASSWORD) {
        loader
            .password
            .get_or_insert_with(|| SecretString::new(password.into()));
    }
    if let Some(cert) = env_var_or_none(ENV_CERT) {
        let Ok(cert) = cert.parse::<CertVerification>();
        loader.cert.get_or_insert(cert);
    }
    if let Some(flag) = env_var_or_none(ENV_CHALLENGE_TOKEN) {
        let enabled = parse_flag(ENV_CHALLENGE_TOKEN, &flag)?;
        loader.challenge_token.get_or_insert(enabled);
    }
    if let Some(ratio) = env_var_or_none(ENV_REFRESH_RATIO) {
        let ratio: f64 = parse_env(ENV_REFRESH_RATIO, &ratio, "must be a number")?;
        loader.refresh_ratio.get_or_insert(ratio);
    }
    if let Some(timeout) = env_var_or_none(ENV_TIMEOUT) {
        let secs: u64 = parse_env(ENV_TIMEOUT, &timeout, "must be a number of seconds")?;
        loader.timeout.get_or_insert(Duration::from_secs(secs));
    }
    Ok(())
}
