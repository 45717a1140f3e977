//! Credentials and the credential-provider capability.
//!
//! Responsibilities:
//! - Hold the username/password pair a session logs in with.
//! - Resolve values that were not pre-supplied through a [`CredentialProvider`].
//!
//! Does NOT handle:
//! - Interactive prompting itself (the CLI supplies a terminal provider).
//!
//! Invariants:
//! - Credentials are immutable once resolved.
//! - The provider is consulted only for missing values, at most once each.
//! - The password never appears in `Debug` output.

use secrecy::SecretString;

use crate::error::{ClientError, Result};

/// Supplies credentials that were not configured up front.
///
/// Implementations typically prompt on a terminal, read a keychain, or call
/// out to a secrets manager.
pub trait CredentialProvider: Send + Sync {
    /// Return the username to log in with.
    fn username(&self) -> Result<String>;

    /// Return the password for `username`.
    fn password(&self, username: &str) -> Result<SecretString>;
}

/// Username and password for the controller.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials from known values.
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Resolve credentials, asking `provider` for whatever is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredentials`] when a value is absent and
    /// no provider was given, and propagates provider failures.
    pub fn resolve(
        username: Option<String>,
        password: Option<SecretString>,
        provider: Option<&dyn CredentialProvider>,
    ) -> Result<Self> {
        let username = match username {
            Some(username) => username,
            None => provider
                .ok_or_else(|| {
                    ClientError::MissingCredentials(
                        "username not supplied and no credential provider configured".to_string(),
                    )
                })?
                .username()?,
        };

        let password = match password {
            Some(password) => password,
            None => provider
                .ok_or_else(|| {
                    ClientError::MissingCredentials(format!(
                        "password for {username} not supplied and no credential provider configured"
                    ))
                })?
                .password(&username)?,
        };

        Ok(Self { username, password })
    }

    /// The login username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        username_calls: AtomicUsize,
        password_calls: AtomicUsize,
    }

    impl CredentialProvider for CountingProvider {
        fn username(&self) -> Result<String> {
            self.username_calls.fetch_add(1, Ordering::SeqCst);
            Ok("prompted-user".to_string())
        }

        fn password(&self, username: &str) -> Result<SecretString> {
            self.password_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SecretString::new(format!("{username}-pw").into()))
        }
    }

    #[test]
    fn test_supplied_values_skip_provider() {
        let provider = CountingProvider::default();
        let creds = Credentials::resolve(
            Some("admin".to_string()),
            Some(SecretString::new("pw".to_string().into())),
            Some(&provider),
        )
        .unwrap();

        assert_eq!(creds.username(), "admin");
        assert_eq!(creds.password().expose_secret(), "pw");
        assert_eq!(provider.username_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.password_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_password_uses_provider_once() {
        let provider = CountingProvider::default();
        let creds =
            Credentials::resolve(Some("admin".to_string()), None, Some(&provider)).unwrap();

        assert_eq!(creds.password().expose_secret(), "admin-pw");
        assert_eq!(provider.username_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.password_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_everything_prompts_username_first() {
        let provider = CountingProvider::default();
        let creds = Credentials::resolve(None, None, Some(&provider)).unwrap();

        assert_eq!(creds.username(), "prompted-user");
        assert_eq!(creds.password().expose_secret(), "prompted-user-pw");
    }

    #[test]
    fn test_missing_without_provider_fails() {
        let err = Credentials::resolve(Some("admin".to_string()), None, None).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials(_)));

        let err = Credentials::resolve(None, None, None).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials(_)));
    }

    /// Test that the password is not exposed in Debug output.
    #[test]
    fn test_password_not_exposed_in_debug() {
        let creds = Credentials::new("admin", SecretString::new("s3cr3t-pw".to_string().into()));
        let debug_output = format!("{:?}", creds);

        assert!(
            !debug_output.contains("s3cr3t-pw"),
            "Debug output should not contain the password"
        );
        assert!(debug_output.contains("admin"));
    }
}
