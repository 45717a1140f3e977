//! Common test utilities for integration tests.
//!
//! This module provides shared helper functions and re-exports commonly used
//! types for testing the APIC client against a wiremock controller. All
//! integration tests should use these utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Clients built here point at the mock server over plain HTTP
//!
//! # What this does NOT handle
//! - Test-specific assertions or test logic

use std::time::Duration;

use secrecy::SecretString;

// Re-export test utilities from apic-client
#[allow(unused_imports)]
pub use apic_client::testing::generators::{LoginResponseGenerator, error_response};
#[allow(unused_imports)]
pub use apic_client::testing::load_fixture;

// Re-export commonly used types for test convenience
// These are used via `use common::*;` in test files
#[allow(unused_imports)]
pub use apic_client::{ClientError, SessionClient, SessionClientBuilder, SessionStatus};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use wiremock::matchers::{method, path};

pub const LOGIN_PATH: &str = "/api/aaaLogin.xml";
pub const REFRESH_PATH: &str = "/api/aaaRefresh.xml";
pub const LOGOUT_PATH: &str = "/api/aaaLogout.xml";

/// Builder pointing at the mock server with `admin`/`pw` credentials.
#[allow(dead_code)]
pub fn builder_for(server: &MockServer) -> SessionClientBuilder {
    SessionClient::builder()
        .controller(server.uri())
        .username("admin")
        .password(SecretString::new("pw".to_string().into()))
        .timeout(Duration::from_secs(5))
}

/// Client pointing at the mock server with default settings.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> SessionClient {
    builder_for(server).build().expect("client should build")
}

/// Serve `body` with status 200 for every login.
#[allow(dead_code)]
pub async fn mount_login(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve successful refresh and logout responses.
#[allow(dead_code)]
pub async fn mount_refresh_and_logout(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("auth/refresh_success.xml")),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("auth/logout_success.xml")),
        )
        .mount(server)
        .await;
}

/// Number of requests the mock server received for `request_path`.
#[allow(dead_code)]
pub async fn requests_to(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}

/// Poll until the server has seen at least `count` requests for `request_path`.
#[allow(dead_code)]
pub async fn wait_for_requests(
    server: &MockServer,
    request_path: &str,
    count: usize,
    timeout: Duration,
) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if requests_to(server, request_path).await >= count {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
