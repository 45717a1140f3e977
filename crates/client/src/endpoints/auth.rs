//! Authentication wire format.
//!
//! Responsibilities:
//! - Build the `aaaUser` login/logout payloads.
//! - Parse the `aaaLogin` result element out of login responses.
//! - Classify failed logins as authentication or API errors.
//!
//! Invariants:
//! - Attribute values in payloads are XML-escaped.
//! - `refreshTimeoutSeconds` must be present and positive in every login result.
//! - `urlToken` must be present when a challenge token was requested.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use secrecy::SecretString;

use crate::error::{ClientError, Result};
use crate::models::{ApicResponse, LoginResult};

/// Element carrying the authentication result.
const LOGIN_ELEMENT: &[u8] = b"aaaLogin";

/// Longest session timeout accepted from a controller (one year).
pub const MAX_REFRESH_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Element the controller uses to report failures.
const ERROR_ELEMENT: &[u8] = b"error";

/// Login request body.
pub fn login_payload(username: &str, password: &str) -> String {
    format!(
        r#"<aaaUser name="{}" pwd="{}"/>"#,
        escape(username),
        escape(password)
    )
}

/// Logout request body.
pub fn logout_payload(username: &str) -> String {
    format!(r#"<aaaUser name="{}"/>"#, escape(username))
}

/// Find the first element named `name` and return its attributes.
fn find_element_attributes(body: &str, name: &[u8]) -> Result<Option<HashMap<String, String>>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element))
                if element.name().as_ref() == name =>
            {
                return collect_attributes(&reader, &element).map(Some);
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                return Err(ClientError::InvalidResponse(format!(
                    "malformed XML at position {}: {e}",
                    reader.error_position()
                )));
            }
        }
    }
}

fn collect_attributes(
    reader: &Reader<&[u8]>,
    element: &BytesStart<'_>,
) -> Result<HashMap<String, String>> {
    let mut attributes = HashMap::new();
    for attribute in element.attributes() {
        let attribute = attribute
            .map_err(|e| ClientError::InvalidResponse(format!("malformed attribute: {e}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| ClientError::InvalidResponse(format!("malformed attribute {key}: {e}")))?;
        attributes.insert(key, value.into_owned());
    }
    Ok(attributes)
}

/// Parse an optional non-negative integer attribute.
fn parse_seconds(attributes: &HashMap<String, String>, name: &str) -> Result<Option<u64>> {
    attributes
        .get(name)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                ClientError::InvalidResponse(format!("{name} is not an integer: {raw:?}"))
            })
        })
        .transpose()
}

/// Parse a login (or refresh) response body.
///
/// # Errors
///
/// Returns [`ClientError::InvalidResponse`] when the markup is malformed, the
/// `aaaLogin` element is absent, `refreshTimeoutSeconds` is missing, zero,
/// above [`MAX_REFRESH_TIMEOUT_SECS`] or non-numeric, or `urlToken` is
/// missing while `require_url_token` is set.
pub fn parse_login_response(body: &str, require_url_token: bool) -> Result<LoginResult> {
    let attributes = find_element_attributes(body, LOGIN_ELEMENT)?.ok_or_else(|| {
        ClientError::InvalidResponse("login response has no aaaLogin element".to_string())
    })?;

    let refresh_timeout_seconds = parse_seconds(&attributes, "refreshTimeoutSeconds")?
        .ok_or_else(|| {
            ClientError::InvalidResponse("aaaLogin is missing refreshTimeoutSeconds".to_string())
        })?;
    if refresh_timeout_seconds == 0 {
        return Err(ClientError::InvalidResponse(
            "refreshTimeoutSeconds must be positive".to_string(),
        ));
    }
    if refresh_timeout_seconds > MAX_REFRESH_TIMEOUT_SECS {
        return Err(ClientError::InvalidResponse(format!(
            "refreshTimeoutSeconds {refresh_timeout_seconds} exceeds {MAX_REFRESH_TIMEOUT_SECS}"
        )));
    }

    let secret = |name: &str| {
        attributes
            .get(name)
            .filter(|value| !value.is_empty())
            .map(|value| SecretString::new(value.clone().into()))
    };

    let url_token = secret("urlToken");
    if require_url_token && url_token.is_none() {
        return Err(ClientError::InvalidResponse(
            "aaaLogin is missing urlToken".to_string(),
        ));
    }

    Ok(LoginResult {
        refresh_timeout_seconds,
        url_token,
        token: secret("token"),
        user_name: attributes.get("userName").cloned(),
        maximum_lifetime_seconds: parse_seconds(&attributes, "maximumLifetimeSeconds")?,
        version: attributes.get("version").cloned(),
    })
}

/// Extract the `text` of an `<error>` element, if the body carries one.
pub fn parse_error_text(body: &str) -> Option<String> {
    find_element_attributes(body, ERROR_ELEMENT)
        .ok()
        .flatten()
        .and_then(|mut attributes| attributes.remove("text"))
        .filter(|text| !text.is_empty())
}

/// Classify a login response by status.
///
/// # Errors
///
/// Returns [`ClientError::AuthFailed`] for 401/403 and
/// [`ClientError::ApiError`] for any other non-success status.
pub fn check_login_status(response: &ApicResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    let status = response.status().as_u16();
    let message = parse_error_text(response.text()).unwrap_or_else(|| {
        response
            .status()
            .canonical_reason()
            .unwrap_or("login failed")
            .to_string()
    });

    match status {
        401 | 403 => Err(ClientError::AuthFailed(message)),
        _ => Err(ClientError::ApiError {
            status,
            url: response.url().to_string(),
            message,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use secrecy::ExposeSecret;
    use url::Url;

    const LOGIN_OK: &str = r#"<?xml version="1.0" encoding="UTF-8"?><imdata totalCount="1"><aaaLogin token="tok-123" refreshTimeoutSeconds="600" maximumLifetimeSeconds="86400" userName="admin" version="5.2(7f)" urlToken="challenge-abc"><aaaUserDomain name="all" rolesR="admin" rolesW="admin"/></aaaLogin></imdata>"#;

    const LOGIN_FAILED: &str = r#"<?xml version="1.0" encoding="UTF-8"?><imdata totalCount="1"><error code="401" text="Username or password is incorrect - FAILED local authentication"/></imdata>"#;

    fn response(status: u16, body: &str) -> ApicResponse {
        ApicResponse::new(
            StatusCode::from_u16(status).unwrap(),
            Url::parse("https://10.0.0.1/api/aaaLogin.xml").unwrap(),
            HeaderMap::new(),
            body.to_string(),
        )
    }

    #[test]
    fn test_login_payload() {
        assert_eq!(
            login_payload("admin", "pw"),
            r#"<aaaUser name="admin" pwd="pw"/>"#
        );
    }

    #[test]
    fn test_login_payload_escapes_attributes() {
        assert_eq!(
            login_payload("a&b", r#"p"<w>'"#),
            r#"<aaaUser name="a&amp;b" pwd="p&quot;&lt;w&gt;&apos;"/>"#
        );
    }

    #[test]
    fn test_logout_payload() {
        assert_eq!(logout_payload("admin"), r#"<aaaUser name="admin"/>"#);
        assert_eq!(
            logout_payload("<ops&'dev'>"),
            r#"<aaaUser name="&lt;ops&amp;&apos;dev&apos;&gt;"/>"#
        );
    }

    #[test]
    fn test_parse_login_response() {
        let login = parse_login_response(LOGIN_OK, false).unwrap();

        assert_eq!(login.refresh_timeout_seconds, 600);
        assert_eq!(login.maximum_lifetime_seconds, Some(86400));
        assert_eq!(login.user_name.as_deref(), Some("admin"));
        assert_eq!(login.version.as_deref(), Some("5.2(7f)"));
        assert_eq!(
            login.token.as_ref().map(|t| t.expose_secret()),
            Some("tok-123")
        );
        assert_eq!(
            login.url_token.as_ref().map(|t| t.expose_secret()),
            Some("challenge-abc")
        );
    }

    #[test]
    fn test_parse_self_closing_login_element() {
        let body = r#"<imdata><aaaLogin refreshTimeoutSeconds="300"/></imdata>"#;
        let login = parse_login_response(body, false).unwrap();
        assert_eq!(login.refresh_timeout_seconds, 300);
        assert!(login.url_token.is_none());
    }

    #[test]
    fn test_parse_unescapes_attribute_values() {
        let body = r#"<imdata><aaaLogin refreshTimeoutSeconds="300" urlToken="a&amp;b"/></imdata>"#;
        let login = parse_login_response(body, true).unwrap();
        assert_eq!(login.url_token.unwrap().expose_secret(), "a&b");
    }

    #[test]
    fn test_missing_timeout_is_parse_error() {
        let body = r#"<imdata><aaaLogin token="x" urlToken="y"/></imdata>"#;
        let err = parse_login_response(body, false).unwrap_err();
        assert!(err.is_parse_error(), "got {err:?}");
    }

    #[test]
    fn test_non_numeric_timeout_is_parse_error() {
        let body = r#"<imdata><aaaLogin refreshTimeoutSeconds="ten"/></imdata>"#;
        assert!(parse_login_response(body, false).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_zero_timeout_is_parse_error() {
        let body = r#"<imdata><aaaLogin refreshTimeoutSeconds="0"/></imdata>"#;
        assert!(parse_login_response(body, false).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_oversized_timeout_is_parse_error() {
        let body = format!(
            r#"<imdata><aaaLogin refreshTimeoutSeconds="{}"/></imdata>"#,
            u64::MAX
        );
        assert!(parse_login_response(&body, false).unwrap_err().is_parse_error());

        let body = format!(
            r#"<imdata><aaaLogin refreshTimeoutSeconds="{MAX_REFRESH_TIMEOUT_SECS}"/></imdata>"#
        );
        let login = parse_login_response(&body, false).unwrap();
        assert_eq!(login.refresh_timeout_seconds, MAX_REFRESH_TIMEOUT_SECS);
    }

    #[test]
    fn test_missing_url_token_in_challenge_mode() {
        let body = r#"<imdata><aaaLogin refreshTimeoutSeconds="600"/></imdata>"#;
        assert!(parse_login_response(body, false).is_ok());
        assert!(parse_login_response(body, true).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_missing_login_element() {
        let err = parse_login_response(LOGIN_FAILED, false).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_malformed_markup() {
        let err = parse_login_response("<imdata><aaaLogin refreshTimeoutSeconds=600", false)
            .unwrap_err();
        assert!(err.is_parse_error());

        let err = parse_login_response("not xml at all", false).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_parse_error_text() {
        assert_eq!(
            parse_error_text(LOGIN_FAILED).as_deref(),
            Some("Username or password is incorrect - FAILED local authentication")
        );
        assert!(parse_error_text(LOGIN_OK).is_none());
        assert!(parse_error_text("").is_none());
    }

    #[test]
    fn test_check_login_status_success() {
        assert!(check_login_status(&response(200, LOGIN_OK)).is_ok());
    }

    #[test]
    fn test_check_login_status_auth_failed() {
        let err = check_login_status(&response(401, LOGIN_FAILED)).unwrap_err();
        assert!(
            matches!(err, ClientError::AuthFailed(ref msg) if msg.contains("FAILED local authentication")),
            "got {err:?}"
        );

        let err = check_login_status(&response(403, "")).unwrap_err();
        assert!(matches!(err, ClientError::AuthFailed(ref msg) if msg == "Forbidden"));
    }

    #[test]
    fn test_check_login_status_other_status() {
        let err = check_login_status(&response(503, "")).unwrap_err();
        assert!(
            matches!(err, ClientError::ApiError { status: 503, ref url, .. } if url.ends_with("/api/aaaLogin.xml"))
        );
    }
}
