//! Rate limit information from photo API responses.
//!
//! The API reports its hourly quota through the `X-Ratelimit-Limit` and
//! `X-Ratelimit-Remaining` headers. Capturing them lets the UI explain a 403
//! refusal and warn before the quota runs out.

use http::header::HeaderMap;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Rate limit information extracted from response headers.
///
/// # Example
///
/// ```
/// use photo_picker::api::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(50, 49);
/// assert!(!info.is_exhausted());
/// assert_eq!(info.remaining(), 49);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    limit: u32,
    /// Remaining requests in the current window.
    remaining: u32,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32) -> Self {
        Self { limit, remaining }
    }

    /// Reads the rate limit headers, returning `None` unless both are present
    /// and numeric.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_u32(headers, LIMIT_HEADER)?;
        let remaining = header_u32(headers, REMAINING_HEADER)?;
        Some(Self::new(limit, remaining))
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns true if the rate limit has been exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|raw| raw.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
