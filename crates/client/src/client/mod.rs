//! APIC session client.
//!
//! This module provides [`SessionClient`], which owns the credentials, the
//! session state and the keepalive timer for one controller.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `session`: Login, refresh and logout (private module)
//! - `keepalive`: Refresh timer scheduling (private module)
//!
//! # What this module does NOT handle:
//! - Target resolution and response capture (delegated to [`crate::proxy`])
//! - Wire payloads and response parsing (delegated to [`crate::endpoints`])
//! - Prompting for credentials (delegated to a [`crate::CredentialProvider`])
//!
//! # Invariants
//! - A refresh timer exists only while the session is Active with keepalive on.
//! - At most one refresh timer is outstanding at any time.
//! - The state lock is never held across an `.await`.
//! - The client never moves itself to [`SessionStatus::Expired`]; callers whose
//!   requests start failing with authentication errors must log in again.

pub mod builder;
mod keepalive;
mod session;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Method;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::endpoints::{CHALLENGE_HEADER, SessionEndpoints};
use crate::error::Result;
use crate::models::{ApicResponse, LoginResult};
use crate::proxy::{LastResponse, RequestParts, RequestProxy};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No session: never logged in, logged out, or a login failed.
    #[default]
    Unauthenticated,
    /// Logged in.
    Active,
    /// The server-side session lapsed. Reserved for callers that track expiry
    /// themselves; the client does not enter this state.
    Expired,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A scheduled keepalive refresh.
#[derive(Debug)]
struct RefreshTimer {
    generation: u64,
    deadline: Instant,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct SessionState {
    status: SessionStatus,
    timeout: Option<Duration>,
    keepalive: bool,
    timer: Option<RefreshTimer>,
    next_generation: u64,
}

/// Shared session internals. The keepalive task holds only a weak reference.
struct SessionInner {
    proxy: RequestProxy,
    credentials: Credentials,
    endpoints: SessionEndpoints,
    challenge_token: bool,
    refresh_ratio: f64,
    last_response: Arc<LastResponse>,
    state: Mutex<SessionState>,
}

impl SessionInner {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the timer on drop. Returns whether a logout is still owed.
    fn teardown_on_drop(&self) -> bool {
        let mut state = self.lock_state();
        keepalive::cancel_timer(&mut state);
        state.keepalive = false;
        state.status == SessionStatus::Active
    }
}

/// Session client for one APIC controller.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use apic_client::SessionClient;
/// use secrecy::SecretString;
///
/// let client = SessionClient::builder()
///     .controller("10.0.0.1")
///     .username("admin")
///     .password(SecretString::new("pw".to_string().into()))
///     .build()?;
///
/// client.login(true).await?;
/// let tenants = client.get("api/class/fvTenant.json").await?;
/// client.logout().await?;
/// ```
///
/// # Teardown
///
/// Prefer [`SessionClient::with_session`], which always logs out. Dropping
/// an Active client cancels the keepalive timer and, when a tokio runtime is
/// available, spawns a best-effort logout whose failure is only logged.
pub struct SessionClient {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("controller", &self.inner.proxy.base_url().as_str())
            .field("username", &self.inner.credentials.username())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl SessionClient {
    /// Create a new client builder.
    pub fn builder() -> builder::SessionClientBuilder {
        builder::SessionClientBuilder::new()
    }

    /// Create a client for `controller` from a configuration bag.
    ///
    /// Missing credentials cannot be prompted for here; use the builder with
    /// a [`crate::CredentialProvider`] for that.
    pub fn new(controller: &str, config: &apic_config::SessionConfig) -> Result<Self> {
        Self::builder()
            .controller(controller)
            .session_config(config)
            .build()
    }

    fn from_inner(inner: SessionInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Log in, optionally starting the keepalive timer.
    ///
    /// Logging in again while Active cancels the existing timer first.
    ///
    /// # Errors
    ///
    /// - [`crate::ClientError::AuthFailed`] if the controller rejects the credentials
    /// - [`crate::ClientError::InvalidResponse`] if the login response is malformed
    /// - [`crate::ClientError::HttpError`] for transport failures
    ///
    /// On any error the session is Unauthenticated.
    pub async fn login(&self, keepalive: bool) -> Result<LoginResult> {
        self.inner.login(keepalive).await
    }

    /// Refresh the session now.
    ///
    /// When keepalive is on, the pending timer is replaced by one measured
    /// from now. Without keepalive no timer is created.
    pub async fn refresh(&self) -> Result<ApicResponse> {
        self.inner.refresh().await
    }

    /// Log out and cancel the keepalive timer.
    ///
    /// Safe to call in any state. The session is Unauthenticated afterwards
    /// even if the logout request fails.
    pub async fn logout(&self) -> Result<()> {
        self.inner.logout().await
    }

    /// Run `f` inside a session that is always logged out afterwards.
    ///
    /// `f`'s error takes precedence over a logout error.
    ///
    /// ```rust,ignore
    /// use futures::FutureExt;
    ///
    /// let body = client
    ///     .with_session(false, |session| {
    ///         async move { Ok(session.get("api/mo/uni.json").await?.text().to_string()) }.boxed()
    ///     })
    ///     .await?;
    /// ```
    pub async fn with_session<T, F>(&self, keepalive: bool, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(&'a SessionClient) -> BoxFuture<'a, Result<T>>,
    {
        self.login(keepalive).await?;
        let outcome = f(self).await;
        let logout = self.logout().await;

        match (outcome, logout) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
            (Err(e), Err(logout_err)) => {
                warn!(error = %logout_err, "Logout after failed session body also failed");
                Err(e)
            }
        }
    }

    /// Send a request through the session.
    pub async fn request(
        &self,
        method: Method,
        target: &str,
        parts: RequestParts,
    ) -> Result<ApicResponse> {
        self.inner.proxy.request(method, target, parts).await
    }

    /// `GET` a path or URL.
    pub async fn get(&self, target: &str) -> Result<ApicResponse> {
        self.inner.proxy.get(target).await
    }

    /// `POST` a body to a path or URL.
    pub async fn post(&self, target: &str, body: impl Into<String>) -> Result<ApicResponse> {
        self.inner.proxy.post(target, body).await
    }

    /// `DELETE` a path or URL.
    pub async fn delete(&self, target: &str) -> Result<ApicResponse> {
        self.inner.proxy.delete(target).await
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.inner.lock_state().status
    }

    /// Whether the session is Active.
    pub fn is_active(&self) -> bool {
        self.status() == SessionStatus::Active
    }

    /// Server-declared session timeout from the last successful login.
    pub fn session_timeout(&self) -> Option<Duration> {
        self.inner.lock_state().timeout
    }

    /// Fraction of the timeout after which keepalive refresh fires.
    pub fn refresh_ratio(&self) -> f64 {
        self.inner.refresh_ratio
    }

    /// Whether a keepalive refresh is scheduled.
    pub fn has_pending_refresh(&self) -> bool {
        self.inner.lock_state().timer.is_some()
    }

    /// Time until the scheduled keepalive refresh fires.
    pub fn next_refresh_in(&self) -> Option<Duration> {
        self.inner
            .lock_state()
            .timer
            .as_ref()
            .map(|timer| timer.deadline.saturating_duration_since(Instant::now()))
    }

    /// The most recent response received by any request on this session.
    pub fn last_response(&self) -> Option<ApicResponse> {
        self.inner.last_response.get()
    }

    /// Whether the challenge header is currently sent with requests.
    pub fn challenge_token_active(&self) -> bool {
        self.inner.proxy.has_session_header(CHALLENGE_HEADER)
    }

    /// Login, refresh and logout URLs.
    pub fn endpoints(&self) -> &SessionEndpoints {
        &self.inner.endpoints
    }

    /// Controller base URL.
    pub fn controller(&self) -> &Url {
        self.inner.proxy.base_url()
    }

    /// Login username.
    pub fn username(&self) -> &str {
        self.inner.credentials.username()
    }

    /// The underlying request proxy.
    pub fn proxy(&self) -> &RequestProxy {
        &self.inner.proxy
    }
}

impl Drop for SessionClient {
    fn drop(&mut self) {
        if !self.inner.teardown_on_drop() {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Session dropped while active, logging out in background");
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    if let Err(e) = inner.logout().await {
                        warn!(error = %e, "Logout on drop failed");
                    }
                });
            }
            Err(_) => {
                warn!("Session dropped while active outside a tokio runtime, skipping logout");
            }
        }
    }
}
