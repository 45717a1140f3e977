//! Session configuration bag.

use secrecy::SecretString;
use std::time::Duration;

use super::connection::CertVerification;
use crate::constants::DEFAULT_REFRESH_RATIO;

/// Options recognized when constructing a session client.
///
/// Missing `username`/`password` values are resolved by the client's
/// credential provider at construction time.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Login username.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<SecretString>,
    /// Certificate verification setting.
    pub cert: CertVerification,
    /// Request a GUI challenge token at login and send it on every request.
    pub challenge_token: bool,
    /// Fraction of the session timeout after which keepalive refresh fires.
    pub refresh_ratio: f64,
    /// Optional per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            cert: CertVerification::Disabled,
            challenge_token: false,
            refresh_ratio: DEFAULT_REFRESH_RATIO,
            timeout: None,
        }
    }
}

/// Fully loaded configuration: the controller address plus session options.
#[derive(Debug, Clone)]
pub struct Config {
    /// Controller host, IP address or URL.
    pub controller: String,
    /// Session options.
    pub session: SessionConfig,
}

impl Config {
    /// Create a config for `controller` with default session options.
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            session: SessionConfig::default(),
        }
    }

    /// Create a config with pre-supplied credentials.
    pub fn with_credentials(
        controller: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        let mut config = Self::new(controller);
        config.session.username = Some(username.into());
        config.session.password = Some(password);
        config
    }
}
