#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Resilient client for the UK Police street-crime API.
//!
//! One call to [`CrimeDataClient::get_crime_summaries`] validates the
//! query text, builds the `crimes-street/all-crime` URL, fetches it with
//! bounded backoff on HTTP 429, and groups the returned incidents by
//! category. The HTTP layer and the backoff timer are both behind traits
//! ([`transport::HttpTransport`], [`retry::Sleeper`]) so the full retry
//! behaviour is testable with scripted responses and a recorded clock.

pub mod aggregate;
pub mod retry;
pub mod transport;

use std::sync::Arc;

use street_crimes_police_models::{CategorySummary, CrimeQuery, ValidationError};
use thiserror::Error;

use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::transport::{HttpTransport, ReqwestTransport, TransportError};

/// Base URL of the hosted UK Police API.
pub const DEFAULT_BASE_URL: &str = "https://data.police.uk/api";

/// Errors returned by [`CrimeDataClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// A query parameter failed validation. Nothing was sent upstream.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Every attempt was answered with HTTP 429.
    #[error("rate limited by upstream after {attempts} attempts")]
    RateLimitExhausted {
        /// How many requests were sent before giving up.
        attempts: u32,
    },
    /// Upstream answered with a non-success status other than 429.
    #[error("upstream returned HTTP {status}")]
    UpstreamStatus {
        /// The status code as received.
        status: u16,
    },
    /// No response was obtained at all.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response body was not a JSON array of incident records.
    #[error("failed to parse upstream response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for fetching street-level crime summaries.
///
/// Cheap to clone-by-`Arc` and safe to share: all state is per-call,
/// and concurrent calls back off independently when rate limited.
pub struct CrimeDataClient {
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    base_url: String,
}

impl CrimeDataClient {
    /// Creates a client backed by a shared `reqwest` connection pool,
    /// pointed at the hosted API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()), Arc::new(TokioSleeper))
    }

    /// Creates a client with a custom transport and sleeper.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            transport,
            sleeper,
            policy: RetryPolicy::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different API base URL (local stub,
    /// mirror).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches crimes near a point for one month, grouped by category.
    ///
    /// The three parameters are raw caller text; they are validated
    /// before anything is sent and echoed into the request URL exactly
    /// as supplied. Groups come back in ascending category order with
    /// upstream record order preserved inside each group. A month with
    /// no recorded crimes is an empty `Vec`, not an error.
    ///
    /// # Errors
    ///
    /// * [`ClientError::Validation`] when a parameter is blank or
    ///   malformed (checked in latitude, longitude, date order).
    /// * [`ClientError::RateLimitExhausted`] when every attempt was
    ///   answered with HTTP 429.
    /// * [`ClientError::UpstreamStatus`] for any other error status.
    /// * [`ClientError::Transport`] when no response was obtained.
    /// * [`ClientError::Parse`] when the body is not an incident array.
    pub async fn get_crime_summaries(
        &self,
        latitude: &str,
        longitude: &str,
        date: &str,
    ) -> Result<Vec<CategorySummary>, ClientError> {
        let query = CrimeQuery::parse(latitude, longitude, date)?;
        let url = crimes_street_url(&self.base_url, &query);

        log::debug!("Fetching street crimes: {url}");
        let body = retry::fetch_with_retry(
            self.transport.as_ref(),
            self.sleeper.as_ref(),
            self.policy,
            &url,
        )
        .await?;

        let summaries = aggregate::aggregate(&body)?;
        log::debug!(
            "Fetched {} incidents in {} categories for {date}",
            summaries.iter().map(|s| s.crimes.len()).sum::<usize>(),
            summaries.len(),
        );
        Ok(summaries)
    }
}

impl Default for CrimeDataClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the `crimes-street/all-crime` URL for a validated query.
///
/// The query text is inserted verbatim; validation already guarantees it
/// is URL-safe, and keeping the caller's exact text means every retry
/// asks for exactly the same resource.
#[must_use]
pub fn crimes_street_url(base_url: &str, query: &CrimeQuery) -> String {
    format!(
        "{base_url}/crimes-street/all-crime?lat={}&lng={}&date={}",
        query.latitude(),
        query.longitude(),
        query.date(),
    )
}
