//! Request wrapper that resolves bare paths against the controller.
//!
//! Responsibilities:
//! - Resolve request targets: fully-qualified URLs are used as given, bare
//!   paths are joined onto the controller base URL.
//! - Apply session headers (e.g. the challenge token) to every request.
//! - Buffer each response and hand it to a [`ResponseSink`].
//!
//! Does NOT handle:
//! - Authentication or keepalive (see [`crate::client`]).
//! - Retries. Transport failures propagate unmodified.
//!
//! Invariants:
//! - A target is rewritten at most once, and only when it has no scheme.
//! - Every response that was read successfully is recorded, whatever its status.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::{ParseError, Url};

use crate::error::{ClientError, Result};
use crate::models::ApicResponse;

/// Receives every response the proxy reads.
pub trait ResponseSink: Send + Sync {
    /// Called once per response, after the body has been buffered.
    fn record(&self, response: &ApicResponse);
}

/// Sink that keeps only the most recent response.
#[derive(Debug, Default)]
pub struct LastResponse {
    slot: Mutex<Option<ApicResponse>>,
}

impl LastResponse {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent response, if any request has completed.
    pub fn get(&self) -> Option<ApicResponse> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResponseSink for LastResponse {
    fn record(&self, response: &ApicResponse) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(response.clone());
    }
}

/// Optional parts of a request beyond method and target.
#[derive(Debug, Default, Clone)]
pub struct RequestParts {
    /// Query parameters appended to the target URL.
    pub query: Vec<(String, String)>,
    /// Per-request headers. These override session headers of the same name.
    pub headers: HeaderMap,
    /// Raw request body.
    pub body: Option<String>,
}

impl RequestParts {
    /// Empty request parts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Resolve a request target against the controller base URL.
///
/// Targets that parse as absolute URLs are returned unchanged. Targets that
/// fail only because they have no scheme are joined onto `base`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidUrl`] for any other parse failure.
pub fn resolve_target(base: &Url, target: &str) -> Result<Url> {
    match Url::parse(target) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => base
            .join(target)
            .map_err(|e| ClientError::InvalidUrl(format!("{target}: {e}"))),
        Err(e) => Err(ClientError::InvalidUrl(format!("{target}: {e}"))),
    }
}

/// HTTP wrapper bound to one controller.
pub struct RequestProxy {
    http: reqwest::Client,
    base_url: Url,
    session_headers: RwLock<HeaderMap>,
    sink: Arc<dyn ResponseSink>,
}

impl fmt::Debug for RequestProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestProxy")
            .field("base_url", &self.base_url.as_str())
            .field("session_headers", &self.read_headers().len())
            .finish_non_exhaustive()
    }
}

impl RequestProxy {
    /// Create a proxy for the controller at `base_url`.
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        sink: Arc<dyn ResponseSink>,
    ) -> Self {
        Self {
            http,
            base_url,
            session_headers: RwLock::new(HeaderMap::new()),
            sink,
        }
    }

    /// The controller base URL bare paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a request and record its response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] when the target cannot be resolved
    /// and [`ClientError::HttpError`] for transport failures. Non-success
    /// statuses are not errors here; inspect [`ApicResponse::status`].
    pub async fn request(
        &self,
        method: Method,
        target: &str,
        parts: RequestParts,
    ) -> Result<ApicResponse> {
        let url = resolve_target(&self.base_url, target)?;
        if url.as_str() != target {
            debug!(path = target, resolved = %url, "Resolved bare path against controller");
        }

        let mut headers = self.read_headers().clone();
        headers.extend(parts.headers);

        let mut builder = self.http.request(method.clone(), url.clone()).headers(headers);
        if !parts.query.is_empty() {
            builder = builder.query(&parts.query);
        }
        if let Some(body) = parts.body {
            builder = builder.body(body);
        }

        debug!(%method, %url, "Sending request");
        let response = ApicResponse::read(builder.send().await?).await?;
        debug!(%method, %url, status = %response.status(), "Received response");

        self.sink.record(&response);
        Ok(response)
    }

    /// `GET` the target.
    pub async fn get(&self, target: &str) -> Result<ApicResponse> {
        self.request(Method::GET, target, RequestParts::new()).await
    }

    /// `POST` a body to the target.
    pub async fn post(&self, target: &str, body: impl Into<String>) -> Result<ApicResponse> {
        self.request(Method::POST, target, RequestParts::new().body(body))
            .await
    }

    /// `DELETE` the target.
    pub async fn delete(&self, target: &str) -> Result<ApicResponse> {
        self.request(Method::DELETE, target, RequestParts::new())
            .await
    }

    /// Install a sensitive header sent on every subsequent request.
    ///
    /// Replaces any previous value of the same header.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] for an invalid header name and
    /// [`ClientError::InvalidResponse`] when the value is not a legal header
    /// value (session header values come from the controller).
    pub fn set_session_header(&self, name: &str, value: &SecretString) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidConfig(format!("invalid header name {name}: {e}")))?;
        let mut value = HeaderValue::from_str(value.expose_secret()).map_err(|_| {
            ClientError::InvalidResponse(format!("value for header {name} is not a valid header"))
        })?;
        value.set_sensitive(true);

        self.write_headers().insert(name, value);
        Ok(())
    }

    /// Remove a session header. Returns whether it was present.
    pub fn clear_session_header(&self, name: &str) -> bool {
        self.write_headers().remove(name).is_some()
    }

    /// Whether a session header is currently installed.
    pub fn has_session_header(&self, name: &str) -> bool {
        self.read_headers().contains_key(name)
    }

    fn read_headers(&self) -> RwLockReadGuard<'_, HeaderMap> {
        self.session_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_headers(&self) -> RwLockWriteGuard<'_, HeaderMap> {
        self.session_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
