//! Login, refresh and logout.
//!
//! # What this module does NOT handle:
//! - Timer bookkeeping (handled by `keepalive.rs`)
//! - Payload building and response parsing (handled by [`crate::endpoints`])
//!
//! # Invariants
//! - Login cancels any existing timer before authenticating
//! - A failed login leaves the session Unauthenticated with no challenge header
//! - The keepalive timer is armed before the session becomes Active
//! - Refresh re-arms the timer only when keepalive was requested at login,
//!   using the timeout observed at login

use std::sync::Arc;

use reqwest::Method;
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use super::keepalive::cancel_timer;
use super::{SessionInner, SessionStatus};
use crate::endpoints::{
    CHALLENGE_HEADER, CHALLENGE_QUERY, check_login_status, login_payload, logout_payload,
    parse_login_response,
};
use crate::error::Result;
use crate::models::{ApicResponse, LoginResult};
use crate::proxy::RequestParts;

impl SessionInner {
    pub(super) async fn login(self: &Arc<Self>, keepalive: bool) -> Result<LoginResult> {
        {
            let mut state = self.lock_state();
            cancel_timer(&mut state);
            state.keepalive = false;
        }

        info!(
            username = %self.credentials.username(),
            controller = %self.proxy.base_url(),
            challenge_token = self.challenge_token,
            "Logging in"
        );

        match self.authenticate().await.and_then(|login| self.activate(login, keepalive)) {
            Ok(login) => {
                info!(
                    timeout_secs = login.refresh_timeout_seconds,
                    keepalive, "Login succeeded"
                );
                Ok(login)
            }
            Err(e) => {
                self.reset_session();
                Err(e)
            }
        }
    }

    /// Record a successful login, arming the timer before the session turns Active.
    fn activate(self: &Arc<Self>, login: LoginResult, keepalive: bool) -> Result<LoginResult> {
        let timeout = login.refresh_timeout();
        let mut state = self.lock_state();
        if keepalive {
            self.arm_refresh_timer(&mut state, timeout)?;
        }
        state.status = SessionStatus::Active;
        state.timeout = Some(timeout);
        state.keepalive = keepalive;
        Ok(login)
    }

    /// Post the credentials and install the challenge header if requested.
    async fn authenticate(&self) -> Result<LoginResult> {
        self.proxy.clear_session_header(CHALLENGE_HEADER);

        let mut parts = RequestParts::new().body(login_payload(
            self.credentials.username(),
            self.credentials.password().expose_secret(),
        ));
        if self.challenge_token {
            let (key, value) = CHALLENGE_QUERY;
            parts = parts.query(key, value);
        }

        let response = self
            .proxy
            .request(Method::POST, self.endpoints.login.as_str(), parts)
            .await?;
        check_login_status(&response)?;

        let login = parse_login_response(response.text(), self.challenge_token)?;
        if self.challenge_token
            && let Some(token) = &login.url_token
        {
            self.proxy.set_session_header(CHALLENGE_HEADER, token)?;
        }
        Ok(login)
    }

    pub(super) async fn refresh(self: &Arc<Self>) -> Result<ApicResponse> {
        debug!(url = %self.endpoints.refresh, "Refreshing session");
        let result = self.proxy.get(self.endpoints.refresh.as_str()).await;

        match &result {
            Ok(response) if !response.is_success() => {
                warn!(status = %response.status(), "Session refresh returned non-success status");
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Session refresh failed"),
        }

        self.rearm_keepalive();
        result
    }

    /// Replace the timer after a refresh, if keepalive is on.
    fn rearm_keepalive(self: &Arc<Self>) {
        let mut state = self.lock_state();
        if state.keepalive
            && state.status == SessionStatus::Active
            && let Some(timeout) = state.timeout
            && let Err(e) = self.arm_refresh_timer(&mut state, timeout)
        {
            warn!(error = %e, "Could not re-arm keepalive timer");
        }
    }

    pub(super) async fn logout(&self) -> Result<()> {
        {
            let mut state = self.lock_state();
            cancel_timer(&mut state);
            state.keepalive = false;
        }

        info!(username = %self.credentials.username(), "Logging out");
        let result = self
            .proxy
            .post(
                self.endpoints.logout.as_str(),
                logout_payload(self.credentials.username()),
            )
            .await;
        self.reset_session();

        let response = result?;
        if !response.is_success() {
            warn!(status = %response.status(), "Logout returned non-success status");
        }
        Ok(())
    }

    /// Return to Unauthenticated with no timer and no challenge header.
    pub(super) fn reset_session(&self) {
        {
            let mut state = self.lock_state();
            cancel_timer(&mut state);
            state.status = SessionStatus::Unauthenticated;
            state.timeout = None;
            state.keepalive = false;
        }
        self.proxy.clear_session_header(CHALLENGE_HEADER);
    }
}
