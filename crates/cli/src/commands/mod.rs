//! CLI command implementations.

pub mod keepalive;
pub mod login;
pub mod request;

use std::sync::Arc;

use anyhow::{Context, Result};
use apic_client::endpoints::parse_error_text;
use apic_client::{ApicResponse, ClientError, SessionClient};

use crate::prompt::TerminalPrompt;

/// Build a session client, prompting on the terminal for missing credentials.
pub fn build_client(config: &apic_config::Config) -> Result<SessionClient> {
    SessionClient::builder()
        .from_config(config)
        .credential_provider(Arc::new(TerminalPrompt))
        .build()
        .with_context(|| format!("Failed to set up session for {}", config.controller))
}

/// Turn a non-success response into an API error carrying the controller's message.
pub fn ensure_success(response: &ApicResponse) -> Result<(), ClientError> {
    if response.is_success() {
        return Ok(());
    }

    let message = parse_error_text(response.text())
        .or_else(|| json_error_text(response))
        .unwrap_or_else(|| {
            response
                .status()
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Err(ClientError::ApiError {
        status: response.status().as_u16(),
        url: response.url().to_string(),
        message,
    })
}

/// Extract `imdata[0].error.attributes.text` from a JSON error document.
fn json_error_text(response: &ApicResponse) -> Option<String> {
    let document: serde_json::Value = response.json().ok()?;
    document
        .pointer("/imdata/0/error/attributes/text")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
