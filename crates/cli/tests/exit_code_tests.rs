//! Integration tests for structured exit codes.
//!
//! These tests verify that apic-cli returns the correct exit codes
//! for different failure scenarios, enabling reliable shell scripting.

mod common;

use common::{LOGIN_PATH, apic_cmd, apic_cmd_for, error_response, load_fixture, mount_session};
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test that a successful login returns exit code 0.
#[tokio::test]
async fn test_login_success_returns_exit_code_0() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    apic_cmd_for(&server)
        .arg("login")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Session timeout: 600s"))
        .stdout(predicate::str::contains("Logged out"));
}

/// Test that rejected credentials return exit code 2.
#[tokio::test]
async fn test_auth_failure_returns_exit_code_2() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(load_fixture("auth/login_invalid_creds.xml")),
        )
        .mount(&server)
        .await;

    apic_cmd_for(&server)
        .arg("login")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Authentication failed"));
}

/// Test that a missing password with no terminal returns exit code 2.
#[tokio::test]
async fn test_missing_password_without_terminal_returns_exit_code_2() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    apic_cmd()
        .args(["--host", &server.uri(), "-u", "admin", "login"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing credentials"));
}

/// Test that an unreachable controller returns exit code 3.
#[test]
fn test_connection_refused_returns_exit_code_3() {
    apic_cmd()
        .args([
            "--host",
            "http://127.0.0.1:9",
            "-u",
            "admin",
            "-p",
            "pw",
            "--timeout",
            "5",
            "login",
        ])
        .assert()
        .code(3);
}

/// Test that a login response without a timeout returns exit code 5.
#[tokio::test]
async fn test_malformed_login_returns_exit_code_5() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("auth/login_missing_timeout.xml")),
        )
        .mount(&server)
        .await;

    apic_cmd_for(&server).arg("login").assert().code(5);
}

/// Test that a missing controller address returns exit code 5.
#[test]
fn test_missing_host_returns_exit_code_5() {
    apic_cmd()
        .args(["-u", "admin", "-p", "pw", "login"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("APIC_HOST"));
}

/// Test that a rejected request returns exit code 1 and prints the controller's message.
#[tokio::test]
async fn test_server_error_returns_exit_code_1() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-missing.xml"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(error_response(500, "Internal failure")),
        )
        .mount(&server)
        .await;

    apic_cmd_for(&server)
        .args(["get", "api/mo/uni/tn-missing.xml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Internal failure"));
}
