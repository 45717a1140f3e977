//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ClientError and ConfigError values to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use apic_client::ClientError;
use apic_config::ConfigError;

use crate::cancellation::SIGINT_EXIT_CODE;

/// Structured exit codes for apic-cli.
///
/// These codes enable scripts to distinguish between different failure modes
/// and take appropriate action (retry, fix credentials, fail fast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - rejected or missing credentials.
    ///
    /// Scripts should fix credentials and log in again.
    AuthenticationFailed = 2,

    /// Connection error - network, TLS, timeout, or an unreachable address.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// Validation error - bad configuration, or a response that could not be parsed.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = SIGINT_EXIT_CODE,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ClientError> for ExitCode {
    /// Map ClientError variants to structured exit codes.
    fn from(err: &ClientError) -> Self {
        match err {
            // Authentication errors (exit code 2)
            ClientError::AuthFailed(_) => ExitCode::AuthenticationFailed,
            ClientError::MissingCredentials(_) => ExitCode::AuthenticationFailed,
            ClientError::ApiError {
                status: 401 | 403, ..
            } => ExitCode::AuthenticationFailed,

            // Connection errors (exit code 3)
            ClientError::InvalidUrl(_) => ExitCode::ConnectionError,
            ClientError::HttpError(e) => {
                if e.is_connect() || e.is_timeout() {
                    ExitCode::ConnectionError
                } else {
                    ExitCode::GeneralError
                }
            }

            // Validation errors (exit code 5)
            ClientError::InvalidResponse(_) => ExitCode::ValidationError,
            ClientError::InvalidConfig(_) => ExitCode::ValidationError,
            ClientError::ApiError { status: 400, .. } => ExitCode::ValidationError,

            // Default: general error
            ClientError::ApiError { .. } => ExitCode::GeneralError,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::DotenvParse { .. }
            | ConfigError::DotenvIo { .. }
            | ConfigError::DotenvUnknown => ExitCode::GeneralError,
            _ => ExitCode::ValidationError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no ClientError or ConfigError is found.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(config_err);
            }
        }

        ExitCode::GeneralError
    }
}
