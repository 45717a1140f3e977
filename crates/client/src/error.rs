//! Error types for the APIC session client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during APIC client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The controller rejected the supplied credentials.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Network, TLS or connection-level failure.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success status on a call whose status the client inspects.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// A response was missing expected fields or was not well-formed.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A credential was not supplied and could not be obtained.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl ClientError {
    /// Check if this error indicates the controller rejected the credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthFailed(_))
    }

    /// Check if this error is a transport-level failure.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::HttpError(_))
    }

    /// Check if this error is a response parsing failure.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::InvalidResponse(_))
    }
}
