//! Client builder for constructing [`SessionClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for session configuration
//! - Validating the controller address and refresh ratio
//! - Resolving credentials, consulting a [`CredentialProvider`] for missing values
//! - Configuring the underlying HTTP client (cookies, timeouts, TLS verification)
//!
//! # What this module does NOT handle:
//! - Login, refresh and logout (handled by `session.rs`)
//! - Loading configuration from the environment (handled by `apic-config`)
//!
//! # Invariants
//! - `controller` is required and must resolve to a URL with a host
//! - The refresh ratio satisfies `0 < ratio <= 1`
//! - The credential provider is consulted only after all other settings validate
//! - A CA bundle that cannot be read or holds no certificates is a configuration error

use std::sync::{Arc, Mutex};
use std::time::Duration;

use apic_config::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_REFRESH_RATIO};
use apic_config::{CertVerification, Config, SessionConfig};
use secrecy::SecretString;
use url::Url;

use super::{SessionClient, SessionInner, SessionState};
use crate::auth::{CredentialProvider, Credentials};
use crate::endpoints::{SessionEndpoints, controller_base_url};
use crate::error::{ClientError, Result};
use crate::proxy::{LastResponse, RequestProxy};

/// Builder for creating a new [`SessionClient`].
///
/// Everything except `controller` has a default. Credentials that are not
/// supplied are requested from the credential provider during `build()`.
///
/// # Example
///
/// ```rust,ignore
/// use apic_client::SessionClient;
/// use apic_config::CertVerification;
///
/// let client = SessionClient::builder()
///     .controller("apic1.example.com")
///     .username("admin")
///     .credential_provider(Arc::new(TerminalPrompt))
///     .cert(CertVerification::SystemRoots)
///     .challenge_token(true)
///     .build()?;
/// ```
pub struct SessionClientBuilder {
    controller: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    cert: CertVerification,
    challenge_token: bool,
    refresh_ratio: f64,
    timeout: Option<Duration>,
    credential_provider: Option<Arc<dyn CredentialProvider>>,
}

impl Default for SessionClientBuilder {
    fn default() -> Self {
        Self {
            controller: None,
            username: None,
            password: None,
            cert: CertVerification::default(),
            challenge_token: false,
            refresh_ratio: DEFAULT_REFRESH_RATIO,
            timeout: None,
            credential_provider: None,
        }
    }
}

impl SessionClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the controller host, IP address or URL.
    ///
    /// A bare host is reached over HTTPS.
    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    /// Set the login username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    /// Set certificate verification.
    ///
    /// # Security Warning
    /// The default, [`CertVerification::Disabled`], accepts any certificate.
    /// Controllers commonly ship self-signed certificates, but this makes the
    /// connection vulnerable to man-in-the-middle attacks.
    pub fn cert(mut self, cert: CertVerification) -> Self {
        self.cert = cert;
        self
    }

    /// Request a GUI challenge token at login and send it on every request.
    pub fn challenge_token(mut self, enabled: bool) -> Self {
        self.challenge_token = enabled;
        self
    }

    /// Set the fraction of the session timeout after which keepalive fires.
    ///
    /// Default is 0.9.
    pub fn refresh_ratio(mut self, ratio: f64) -> Self {
        self.refresh_ratio = ratio;
        self
    }

    /// Set a per-request timeout. By default requests use the transport default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the provider consulted for missing credentials.
    pub fn credential_provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credential_provider = Some(provider);
        self
    }

    /// Apply a session configuration bag.
    pub fn session_config(mut self, config: &SessionConfig) -> Self {
        self.username = config.username.clone();
        self.password = config.password.clone();
        self.cert = config.cert.clone();
        self.challenge_token = config.challenge_token;
        self.refresh_ratio = config.refresh_ratio;
        self.timeout = config.timeout;
        self
    }

    /// Create a client builder from loaded configuration.
    ///
    /// The credential provider, if any, is kept.
    pub fn from_config(self, config: &Config) -> Self {
        self.controller(config.controller.clone())
            .session_config(&config.session)
    }

    /// Build the [`SessionClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidConfig`] if `controller` is missing, the refresh
    ///   ratio is out of range, or the CA bundle is unusable
    /// - [`ClientError::InvalidUrl`] if the controller address is invalid
    /// - [`ClientError::MissingCredentials`] if credentials are missing and no
    ///   provider was configured
    /// - `ClientError::HttpError` if the HTTP client fails to build
    pub fn build(self) -> Result<SessionClient> {
        let controller = self
            .controller
            .ok_or_else(|| ClientError::InvalidConfig("controller is required".to_string()))?;

        if !(self.refresh_ratio > 0.0 && self.refresh_ratio <= 1.0) {
            return Err(ClientError::InvalidConfig(format!(
                "refresh ratio must be in (0, 1], got {}",
                self.refresh_ratio
            )));
        }

        let base_url = controller_base_url(&controller)?;
        let endpoints = SessionEndpoints::new(&base_url)?;
        let http = build_http_client(&base_url, &self.cert, self.timeout)?;

        let credentials = Credentials::resolve(
            self.username,
            self.password,
            self.credential_provider.as_deref(),
        )?;

        let last_response = Arc::new(LastResponse::new());
        let proxy = RequestProxy::new(http, base_url, last_response.clone());

        Ok(SessionClient::from_inner(SessionInner {
            proxy,
            credentials,
            endpoints,
            challenge_token: self.challenge_token,
            refresh_ratio: self.refresh_ratio,
            last_response,
            state: Mutex::new(SessionState::default()),
        }))
    }
}

/// Configure the HTTP client: cookie store for the session cookie, bounded
/// redirects, optional timeout and certificate verification.
fn build_http_client(
    base_url: &Url,
    cert: &CertVerification,
    timeout: Option<Duration>,
) -> Result<reqwest::Client> {
    let mut http_builder = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

    if let Some(timeout) = timeout {
        http_builder = http_builder.timeout(timeout);
    }

    match cert {
        CertVerification::Disabled => {
            http_builder = http_builder.danger_accept_invalid_certs(true);
        }
        CertVerification::SystemRoots => {}
        CertVerification::CaBundle(path) => {
            let pem = std::fs::read(path).map_err(|e| {
                ClientError::InvalidConfig(format!(
                    "cannot read CA bundle {}: {e}",
                    path.display()
                ))
            })?;
            let certificates = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
                ClientError::InvalidConfig(format!("invalid CA bundle {}: {e}", path.display()))
            })?;
            if certificates.is_empty() {
                return Err(ClientError::InvalidConfig(format!(
                    "CA bundle {} contains no certificates",
                    path.display()
                )));
            }
            for certificate in certificates {
                http_builder = http_builder.add_root_certificate(certificate);
            }
        }
    }

    if cert.is_enabled() && base_url.scheme() != "https" {
        // Verification settings only apply to TLS connections.
        tracing::warn!(
            "cert={cert} has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
        );
    }

    Ok(http_builder.build()?)
}
