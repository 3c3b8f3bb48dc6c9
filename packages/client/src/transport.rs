//! HTTP transport abstraction.
//!
//! The fetch logic never talks to `reqwest` directly; it goes through
//! [`HttpTransport`], which models the whole exchange as "send one GET,
//! get back a status and a body". That keeps retry behaviour testable
//! with scripted responses and leaves connection pooling, TLS, and
//! redirect handling to the implementation.

use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain any HTTP response (DNS, connect, TLS, timeout, or
/// a body that could not be read).
///
/// A response that arrived with an error status is *not* a transport
/// error; that is reported through [`TransportResponse::status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    /// Description of the connection-level failure.
    pub message: String,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// A complete HTTP response: status code plus the full body text.
///
/// Whether a status counts as success or gets retried is the retry
/// policy's decision, not this type's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, read to completion.
    pub body: String,
}

/// Capability to perform one GET request.
///
/// Implementations must be safe to share across concurrent calls; the
/// client holds a single transport behind an `Arc`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a GET request to `url` and reads the response to completion.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was obtained at
    /// all. Error statuses are returned as an `Ok` response.
    async fn send(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by a shared [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}
