//! Photo picker library crate for browsing and selecting stock photos.
//!
//! The library builds requests for the photo API, decodes pages of photos
//! into strongly typed values, classifies every failure into a fixed error
//! taxonomy, and accumulates pages per collection behind a small state
//! machine that a UI can drive and render.

pub mod api;
pub mod config;

pub use api::{
    AccessKey, ClientError, HttpTransport, PaginationController, Photo, PhotoClient,
    PickerSession, QueryMode, QueryParameters, RequestBuilder,
};
pub use config::PickerConfig;
