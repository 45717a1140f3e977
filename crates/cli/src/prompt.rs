//! Interactive credential prompting.
//!
//! Responsibilities:
//! - Supply missing usernames and passwords from the terminal, masking passwords.
//!
//! Does NOT handle:
//! - Deciding whether a prompt is needed; the client asks only for missing values.
//!
//! Invariants:
//! - Never prompts when stdin is not a terminal; reports missing credentials instead.
//! - Empty answers are rejected.

use std::io::IsTerminal;

use apic_client::{ClientError, CredentialProvider};
use secrecy::SecretString;

/// Credential provider backed by terminal prompts.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn ensure_terminal(what: &str) -> apic_client::Result<()> {
        if std::io::stdin().is_terminal() {
            Ok(())
        } else {
            Err(ClientError::MissingCredentials(format!(
                "{what} not supplied and stdin is not a terminal; use --{what} or APIC_{}",
                what.to_ascii_uppercase()
            )))
        }
    }
}

impl CredentialProvider for TerminalPrompt {
    fn username(&self) -> apic_client::Result<String> {
        Self::ensure_terminal("username")?;
        dialoguer::Input::<String>::new()
            .with_prompt("APIC username")
            .interact_text()
            .map(|username| username.trim().to_string())
            .map_err(|e| ClientError::MissingCredentials(format!("failed to read username: {e}")))
    }

    fn password(&self, username: &str) -> apic_client::Result<SecretString> {
        Self::ensure_terminal("password")?;
        dialoguer::Password::new()
            .with_prompt(format!("Password for {username}"))
            .allow_empty_password(false)
            .interact()
            .map(|password| SecretString::new(password.into()))
            .map_err(|e| ClientError::MissingCredentials(format!("failed to read password: {e}")))
    }
}

