//! Generators for controller responses.
//!
//! Provides configurable builders for `aaaLogin` and error documents so
//! tests can vary timeouts and tokens without a fixture per case.

use quick_xml::escape::escape;

// =============================================================================
// Login Response Generator
// =============================================================================

/// Generates `aaaLogin` response documents.
///
/// # Example
/// ```ignore
/// use apic_client::testing::generators::LoginResponseGenerator;
///
/// let body = LoginResponseGenerator::new()
///     .with_refresh_timeout(600)
///     .with_url_token("challenge-abc")
///     .generate();
/// ```
#[derive(Debug, Clone)]
pub struct LoginResponseGenerator {
    refresh_timeout: Option<String>,
    url_token: Option<String>,
    token: String,
    user_name: String,
}

impl Default for LoginResponseGenerator {
    fn default() -> Self {
        Self {
            refresh_timeout: Some("600".to_string()),
            url_token: None,
            token: "session-token".to_string(),
            user_name: "admin".to_string(),
        }
    }
}

impl LoginResponseGenerator {
    /// Create a generator for a 600 second session without a challenge token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `refreshTimeoutSeconds`.
    pub fn with_refresh_timeout(mut self, seconds: u64) -> Self {
        self.refresh_timeout = Some(seconds.to_string());
        self
    }

    /// Set `refreshTimeoutSeconds` to an arbitrary (possibly invalid) value.
    pub fn with_raw_refresh_timeout(mut self, value: impl Into<String>) -> Self {
        self.refresh_timeout = Some(value.into());
        self
    }

    /// Omit `refreshTimeoutSeconds`.
    pub fn without_refresh_timeout(mut self) -> Self {
        self.refresh_timeout = None;
        self
    }

    /// Set `urlToken`.
    pub fn with_url_token(mut self, token: impl Into<String>) -> Self {
        self.url_token = Some(token.into());
        self
    }

    /// Set `userName`.
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    /// Render the document.
    pub fn generate(&self) -> String {
        let mut attributes = vec![
            format!(r#"token="{}""#, escape(&self.token)),
            format!(r#"userName="{}""#, escape(&self.user_name)),
            r#"maximumLifetimeSeconds="86400""#.to_string(),
            r#"version="5.2(7f)""#.to_string(),
        ];
        if let Some(timeout) = &self.refresh_timeout {
            attributes.push(format!(
                r#"refreshTimeoutSeconds="{}""#,
                escape(timeout)
            ));
        }
        if let Some(url_token) = &self.url_token {
            attributes.push(format!(r#"urlToken="{}""#, escape(url_token)));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><imdata totalCount="1"><aaaLogin {}><aaaUserDomain name="all" rolesR="admin" rolesW="admin"/></aaaLogin></imdata>"#,
            attributes.join(" ")
        )
    }
}

/// Generate an APIC error document.
pub fn error_response(code: u16, text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><imdata totalCount="1"><error code="{code}" text="{}"/></imdata>"#,
        escape(text)
    )
}
