//! Photo API client, response decoding, and paginated browsing.
//!
//! Requests are assembled by [`RequestBuilder`], sent through a pluggable
//! [`Transport`], and decoded by [`parse_page`] into typed [`Photo`] values
//! or a classified [`ClientError`]. A [`PaginationController`] accumulates the
//! decoded pages of one collection, and a [`PickerSession`] keeps one
//! controller per [`QueryMode`] for a UI to drive.

pub mod client;
pub mod credential;
pub mod error;
pub mod image_cache;
pub mod models;
pub mod pagination;
pub mod query;
pub mod rate_limit;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::PhotoClient;
pub use credential::AccessKey;
pub use error::ClientError;
pub use image_cache::{ImageCache, ImageLoader, LruImageCache};
pub use models::{HexColor, Photo, PhotoLinks, PhotoUrls, User};
pub use pagination::{Completion, LoadState, PageCursor, PageTicket, PaginationController};
pub use query::{QueryMode, QueryParameters};
pub use rate_limit::RateLimitInfo;
pub use request::{RequestBuilder, append_referral, download_notification_url};
pub use response::{PageResult, parse_page};
pub use session::{FeedSnapshot, PickedPhoto, PickerSession};
pub use transport::{HttpTransport, RawResponse, Transport};

#[cfg(test)]
pub use transport::MockTransport;

#[cfg(test)]
mod tests;
