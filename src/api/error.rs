//! Error types exposed by the photo API layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while building requests, talking to the photo API, or
/// decoding its responses.
///
/// None of the variants are retried automatically; callers decide whether to
/// retry by issuing another load.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// No access key was configured, so no request was sent.
    #[error("an access key is required to query the photo API")]
    MissingCredential,

    /// The transport did not deliver a response body.
    #[error("did not receive data: {message}")]
    NoData {
        /// Transport-level error detail.
        message: String,
    },

    /// The API answered 401: the access key was rejected.
    #[error("invalid access key: the photo API returned 401 Unauthorized")]
    Unauthorized,

    /// The API answered 403, most commonly because the rate limit is spent.
    #[error("request forbidden by the photo API (rate limit exceeded?)")]
    Forbidden {
        /// Rate limit headers sent with the refusal, when present.
        rate_limit: Option<RateLimitInfo>,
    },

    /// The API answered 500.
    #[error("the photo API reported an internal server error")]
    ServerError,

    /// The API answered 503.
    #[error("the photo API is temporarily unavailable")]
    ServiceUnavailable,

    /// The payload was readable text but not the expected structure.
    #[error("the data received was not what was expected: {detail}")]
    UnexpectedPayload {
        /// Decoder message followed by a truncated excerpt of the payload.
        detail: String,
    },

    /// The payload could not be read as text at all.
    #[error("failed to parse the response payload: {message}")]
    ParseFailure {
        /// Decoder error detail.
        message: String,
    },

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// Page or page-size parameters were out of range.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Configuration could not be loaded or was inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
