//! Shared test utilities for apic-cli integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Mount the session endpoints on a wiremock controller.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - Credentials are passed on the command line so no prompt is reached.

use assert_cmd::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(unused_imports)]
pub use apic_client::testing::generators::{LoginResponseGenerator, error_response};
#[allow(unused_imports)]
pub use apic_client::testing::load_fixture;

pub const LOGIN_PATH: &str = "/api/aaaLogin.xml";
pub const LOGOUT_PATH: &str = "/api/aaaLogout.xml";

/// Returns a hermetic `apic-cli` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `APIC_*` variables from the host are cleared.
pub fn apic_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("apic-cli");

    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("APIC_HOST")
        .env_remove("APIC_USERNAME")
        .env_remove("APIC_PASSWORD")
        .env_remove("APIC_CERT")
        .env_remove("APIC_CHALLENGE_TOKEN")
        .env_remove("APIC_REFRESH_RATIO")
        .env_remove("APIC_TIMEOUT");

    cmd
}

/// Returns an `apic-cli` command pointed at `server` with `admin`/`pw` credentials.
#[allow(dead_code)]
pub fn apic_cmd_for(server: &MockServer) -> Command {
    let mut cmd = apic_cmd();
    cmd.args(["--host", &server.uri(), "-u", "admin", "-p", "pw", "--timeout", "5"]);
    cmd
}

/// Serve a successful login and logout.
#[allow(dead_code)]
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("auth/login_success.xml")),
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
