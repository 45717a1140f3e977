//! Buffered HTTP response snapshot.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ClientError, Result};

/// A fully-read response from the controller.
///
/// The body is buffered so the same response can be returned to the caller
/// and kept as the session's last response.
#[derive(Debug, Clone)]
pub struct ApicResponse {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: String,
}

impl ApicResponse {
    /// Create a response snapshot from its parts.
    pub fn new(status: StatusCode, url: Url, headers: HeaderMap, body: String) -> Self {
        Self {
            status,
            url,
            headers,
            body,
        }
    }

    /// Read a `reqwest` response to completion.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Self::new(status, url, headers, body))
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Final URL of the request (after redirects).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body as text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize a JSON body (for `.json` API paths).
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            ClientError::InvalidResponse(format!("invalid JSON from {}: {e}", self.url))
        })
    }
}
