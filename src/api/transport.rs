//! Transport seam between the photo client and the network.
//!
//! The [`Transport`] trait is the only place where bytes cross the wire.
//! [`HttpTransport`] performs real requests through `reqwest`; tests swap in
//! a mock or a scripted transport so that page loads are deterministic and
//! the number of issued requests can be asserted.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use url::Url;

use super::error::ClientError;
use super::rate_limit::RateLimitInfo;

/// Timeout applied when the host does not configure one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const ACCEPT_VERSION_HEADER: &str = "Accept-Version";
const API_VERSION: &str = "v1";

/// Whatever the transport managed to receive for one request.
///
/// Every part is optional: a failed connection has neither status nor body,
/// and a connection dropped mid-body may have a status but no body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// Response body, when one was received.
    pub body: Option<Vec<u8>>,
    /// HTTP status, when a response head was received.
    pub status: Option<StatusCode>,
    /// Transport-level failure description.
    pub transport_error: Option<String>,
    /// Rate limit headers, when present.
    pub rate_limit: Option<RateLimitInfo>,
}

impl RawResponse {
    /// A complete response with the given status and body.
    #[must_use]
    pub fn with_status(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Some(body.into()),
            status: Some(status),
            transport_error: None,
            rate_limit: None,
        }
    }

    /// A `200 OK` response carrying `body`.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    /// A request that never produced a response.
    #[must_use]
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            transport_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attaches rate limit information.
    #[must_use]
    pub const fn with_rate_limit(mut self, rate_limit: Option<RateLimitInfo>) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// Performs GET requests on behalf of the photo client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`, reporting whatever was received.
    async fn get(&self, url: &Url) -> RawResponse;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` when the HTTP client cannot be
    /// constructed.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ClientError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> RawResponse {
        let response = match self
            .client
            .get(url.clone())
            .header(ACCEPT_VERSION_HEADER, API_VERSION)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                return RawResponse::transport_failure(format!("request transport failed: {error}"));
            }
        };

        let status = response.status();
        let rate_limit = RateLimitInfo::from_headers(response.headers());

        match response.bytes().await {
            Ok(bytes) => RawResponse::with_status(status, bytes.to_vec()).with_rate_limit(rate_limit),
            Err(error) => RawResponse {
                body: None,
                status: Some(status),
                transport_error: Some(format!("failed to read response body: {error}")),
                rate_limit,
            },
        }
    }
}
