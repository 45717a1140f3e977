//! APIC REST endpoints used by the session lifecycle.
//!
//! Responsibilities:
//! - Normalize the controller address into a base URL.
//! - Compute the login/refresh/logout endpoint URLs.
//! - Build wire payloads and parse login responses (see `auth`).
//!
//! Invariants:
//! - The base URL always ends with `/` and carries no query or fragment.
//! - A controller given without a scheme is reached over HTTPS.

mod auth;

pub use auth::{
    check_login_status, login_payload, logout_payload, parse_error_text,
    parse_login_response,
};

use url::Url;

use crate::error::{ClientError, Result};

/// Login endpoint path.
pub const LOGIN_PATH: &str = "api/aaaLogin.xml";

/// Session refresh endpoint path.
pub const REFRESH_PATH: &str = "api/aaaRefresh.xml";

/// Logout endpoint path.
pub const LOGOUT_PATH: &str = "api/aaaLogout.xml";

/// Header carrying the GUI challenge token.
pub const CHALLENGE_HEADER: &str = "APIC-challenge";

/// Query parameter requesting a challenge token at login.
pub const CHALLENGE_QUERY: (&str, &str) = ("gui-token-request", "yes");

/// Scheme used for controllers given as a bare host or IP.
pub const DEFAULT_SCHEME: &str = "https";

/// Normalize a controller address into a base URL.
///
/// # Examples
///
/// - `"10.0.0.1"` -> `"https://10.0.0.1/"`
/// - `"apic1:8443"` -> `"https://apic1:8443/"`
/// - `"http://127.0.0.1:8080/"` -> `"http://127.0.0.1:8080/"`
///
/// # Errors
///
/// Returns [`ClientError::InvalidUrl`] for empty or unparseable addresses.
pub fn controller_base_url(controller: &str) -> Result<Url> {
    let trimmed = controller.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl(
            "controller address is required".to_string(),
        ));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{trimmed}")
    };

    let mut url = Url::parse(&candidate)
        .map_err(|e| ClientError::InvalidUrl(format!("{controller}: {e}")))?;
    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidUrl(format!(
            "{controller}: controller address has no host"
        )));
    }

    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Fully-qualified session endpoint URLs for one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEndpoints {
    /// `POST` target for authentication.
    pub login: Url,
    /// `GET` target for keepalive.
    pub refresh: Url,
    /// `POST` target for logout.
    pub logout: Url,
}

impl SessionEndpoints {
    /// Template the fixed endpoint paths onto `base`.
    pub fn new(base: &Url) -> Result<Self> {
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| ClientError::InvalidUrl(format!("{base}{path}: {e}")))
        };
        Ok(Self {
            login: join(LOGIN_PATH)?,
            refresh: join(REFRESH_PATH)?,
            logout: join(LOGOUT_PATH)?,
        })
    }
}
