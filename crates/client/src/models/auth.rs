//! Authentication models for the APIC login API.
//!
//! Parsing from the wire lives in `endpoints::auth`; this module only holds
//! the decoded result.

use secrecy::SecretString;
use std::time::Duration;

/// Decoded `aaaLogin` result element.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Server-declared session validity window (`refreshTimeoutSeconds`).
    pub refresh_timeout_seconds: u64,
    /// GUI challenge token (`urlToken`), present when requested at login.
    pub url_token: Option<SecretString>,
    /// Session token (`token`), also carried by the session cookie.
    pub token: Option<SecretString>,
    /// Authenticated user name (`userName`).
    pub user_name: Option<String>,
    /// Hard session lifetime (`maximumLifetimeSeconds`).
    pub maximum_lifetime_seconds: Option<u64>,
    /// Controller software version (`version`).
    pub version: Option<String>,
}

impl LoginResult {
    /// Session timeout as a duration.
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_seconds)
    }
}
