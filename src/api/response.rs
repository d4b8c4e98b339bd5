//! Decoding and failure classification for page responses.
//!
//! Failures are classified before any structural decode is attempted, in a
//! fixed precedence: missing bytes, then the HTTP statuses the API uses to
//! signal authentication, rate limiting, and outages, and only then the
//! payload itself.

use http::StatusCode;

use super::error::ClientError;
use super::models::{ApiSearchResults, Photo};
use super::query::QueryMode;
use super::rate_limit::RateLimitInfo;
use super::transport::RawResponse;

const SNIPPET_CHARS: usize = 160;

/// One decoded page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Photos on this page, in API order.
    pub photos: Vec<Photo>,
    /// Total number of pages; only reported by searches.
    pub total_pages: Option<u32>,
    /// Total number of matching photos; only reported by searches.
    pub total: Option<u64>,
    /// Rate limit headers sent with the page, when present.
    pub rate_limit: Option<RateLimitInfo>,
}

/// Decodes a raw response for `mode` into a page of photos.
///
/// Searches expect the `{ total, total_pages, results }` envelope; the other
/// modes expect a bare array of photos.
///
/// # Errors
///
/// Returns the first matching failure of: `NoData` (no body or a transport
/// failure), `Unauthorized` (401), `Forbidden` (403), `ServerError` (500),
/// `ServiceUnavailable` (503), then `UnexpectedPayload` when the body is
/// text of the wrong shape or `ParseFailure` when it is not text at all.
pub fn parse_page(response: &RawResponse, mode: QueryMode) -> Result<PageResult, ClientError> {
    let body = classify_failure(response)?;

    let decoded = if mode.is_search() {
        serde_json::from_slice::<ApiSearchResults>(body).map(|envelope| PageResult {
            photos: envelope.results,
            total_pages: Some(envelope.total_pages),
            total: Some(envelope.total),
            rate_limit: None,
        })
    } else {
        serde_json::from_slice::<Vec<Photo>>(body).map(|photos| PageResult {
            photos,
            ..PageResult::default()
        })
    };

    decoded
        .map(|page| PageResult {
            rate_limit: response.rate_limit,
            ..page
        })
        .map_err(|error| payload_error(body, &error.to_string()))
}

/// Applies the transport and status checks shared by every request kind,
/// returning the body when none of them match.
///
/// # Errors
///
/// Returns `NoData`, `Unauthorized`, `Forbidden`, `ServerError`, or
/// `ServiceUnavailable` as described on [`parse_page`].
pub fn classify_failure(response: &RawResponse) -> Result<&[u8], ClientError> {
    let body = match (&response.body, &response.transport_error) {
        (Some(body), None) => body.as_slice(),
        (_, Some(message)) => {
            return Err(ClientError::NoData {
                message: message.clone(),
            });
        }
        (None, None) => {
            return Err(ClientError::NoData {
                message: "response carried no body".to_owned(),
            });
        }
    };

    match response.status {
        Some(StatusCode::UNAUTHORIZED) => Err(ClientError::Unauthorized),
        Some(StatusCode::FORBIDDEN) => Err(ClientError::Forbidden {
            rate_limit: response.rate_limit,
        }),
        Some(StatusCode::INTERNAL_SERVER_ERROR) => Err(ClientError::ServerError),
        Some(StatusCode::SERVICE_UNAVAILABLE) => Err(ClientError::ServiceUnavailable),
        _ => Ok(body),
    }
}

fn payload_error(body: &[u8], decode_message: &str) -> ClientError {
    match std::str::from_utf8(body) {
        Ok(text) => ClientError::UnexpectedPayload {
            detail: format!(
                "{decode_message}; payload: {}",
                truncate_for_message(text, SNIPPET_CHARS)
            ),
        },
        Err(error) => ClientError::ParseFailure {
            message: format!("payload is not UTF-8 text: {error}"),
        },
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}
