//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Validate and build the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables, regardless
//!   of the order in which they are applied.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{DEFAULT_REFRESH_RATIO, ENV_DOTENV_DISABLED, MAX_TIMEOUT_SECS};
use crate::types::{CertVerification, Config, SessionConfig};

/// Configuration loader that builds config from environment variables and overrides.
#[derive(Default)]
pub struct ConfigLoader {
    pub(super) controller: Option<String>,
    pub(super) username: Option<String>,
    pub(super) password: Option<SecretString>,
    pub(super) cert: Option<CertVerification>,
    pub(super) challenge_token: Option<bool>,
    pub(super) refresh_ratio: Option<f64>,
    pub(super) timeout: Option<Duration>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(ENV_DOTENV_DISABLED).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file will not be
    /// loaded (useful for testing). Missing `.env` files are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvParse` for invalid syntax and
    /// `ConfigError::DotenvIo` when the file exists but cannot be read.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Loaded .env file");
                Ok(self)
            }
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    ///
    /// Values already set through builder methods are kept.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the controller host, IP address or URL.
    pub fn with_controller(mut self, controller: String) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the certificate verification mode.
    pub fn with_cert(mut self, cert: CertVerification) -> Self {
        self.cert = Some(cert);
        self
    }

    /// Enable or disable the challenge-token login flow.
    pub fn with_challenge_token(mut self, enabled: bool) -> Self {
        self.challenge_token = Some(enabled);
        self
    }

    /// Set the keepalive refresh ratio.
    pub fn with_refresh_ratio(mut self, ratio: f64) -> Self {
        self.refresh_ratio = Some(ratio);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the controller address collected so far, if any.
    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    /// Build the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingController` when no controller was given,
    /// `ConfigError::InvalidRefreshRatio` when the ratio is outside `(0, 1]`
    /// and `ConfigError::InvalidTimeout` for zero or oversized timeouts.
    pub fn build(self) -> Result<Config, ConfigError> {
        let controller = self
            .controller
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingController)?;

        let refresh_ratio = self.refresh_ratio.unwrap_or(DEFAULT_REFRESH_RATIO);
        if !(refresh_ratio > 0.0 && refresh_ratio <= 1.0) {
            return Err(ConfigError::InvalidRefreshRatio {
                message: format!("must be greater than 0 and at most 1 (got {refresh_ratio})"),
            });
        }

        if let Some(timeout) = self.timeout
            && (timeout.is_zero() || timeout.as_secs() > MAX_TIMEOUT_SECS)
        {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "must be between 1 and {} seconds (got {})",
                    MAX_TIMEOUT_SECS,
                    timeout.as_secs()
                ),
            });
        }

        Ok(Config {
            controller,
            session: SessionConfig {
                username: self.username,
                password: self.password,
                cert: self.cert.unwrap_or_default(),
                challenge_token: self.challenge_token.unwrap_or(false),
                refresh_ratio,
                timeout: self.timeout,
            },
        })
    }
}
