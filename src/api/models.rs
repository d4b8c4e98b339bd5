//! Data models representing photos and photographers returned by the API.
//!
//! The structs decode straight from the API's JSON. Decoding is strict:
//! timestamps must be RFC 3339, dimensions must be positive, and links must
//! be absolute URLs, so a payload that breaks any of these fails as a whole
//! instead of yielding half-valid photos.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::ClientError;

/// A photo listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Photo {
    /// Photo identifier.
    pub id: String,
    /// Publication timestamp.
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    #[serde(with = "rfc3339")]
    pub updated_at: DateTime<Utc>,
    /// Width in pixels.
    pub width: NonZeroU32,
    /// Height in pixels.
    pub height: NonZeroU32,
    /// Dominant colour, shown as a placeholder while the image loads.
    pub color: HexColor,
    /// Optional caption.
    #[serde(default)]
    pub description: Option<String>,
    /// Image URLs at the available sizes.
    pub urls: PhotoUrls,
    /// Related links.
    pub links: PhotoLinks,
    /// Like count.
    pub likes: u32,
    /// Photographer.
    pub user: User,
}

impl Photo {
    /// Returns the pixel dimensions as `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width.get(), self.height.get())
    }

    /// Scales the height to fit `width`, keeping the aspect ratio.
    ///
    /// Used by grid layouts to size cells before the image arrives.
    #[must_use]
    pub fn height_for_width(&self, width: u32) -> u32 {
        let scaled = (u64::from(width) * u64::from(self.height.get()))
            .checked_div(u64::from(self.width.get()))
            .unwrap_or_default();
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// Image URLs for one photo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoUrls {
    /// Original upload.
    pub raw: Url,
    /// Full-size JPEG.
    pub full: Url,
    /// 1080px wide.
    pub regular: Url,
    /// 400px wide; what the picker grid displays.
    pub small: Url,
    /// 200px wide.
    pub thumb: Url,
}

/// Links related to one photo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoLinks {
    /// Photo page on the website.
    pub html: Url,
    /// Direct download of the original.
    pub download: Url,
    /// Endpoint to call when the photo is chosen, to count a download.
    pub download_location: Url,
}

/// The photographer who published a photo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    /// User identifier.
    pub id: String,
    /// Handle.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Personal portfolio site.
    #[serde(default)]
    pub portfolio_url: Option<Url>,
    /// Biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,
    /// Avatar URLs.
    pub profile_image: ProfileImage,
    /// Related links.
    pub links: UserLinks,
}

/// Avatar URLs for a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileImage {
    /// 32px square.
    pub small: Url,
    /// 64px square.
    pub medium: Url,
    /// 128px square.
    pub large: Url,
}

/// Links related to a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserLinks {
    /// Profile page on the website.
    pub html: Url,
}

/// Envelope returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSearchResults {
    pub(super) total: u64,
    pub(super) total_pages: u32,
    pub(super) results: Vec<Photo>,
}

/// An opaque RGB colour decoded from `#RRGGBB` or `#RGB` text.
///
/// # Example
///
/// ```
/// use photo_picker::api::models::HexColor;
///
/// let colour = HexColor::parse("#60544D").expect("valid colour");
/// assert_eq!(colour.rgb(), (0x60, 0x54, 0x4D));
/// assert_eq!(colour.to_string(), "#60544D");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl HexColor {
    /// Creates a colour from its components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#RRGGBB`, `RRGGBB`, `#RGB`, or `RGB` (any case).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnexpectedPayload` when the text is not a hex
    /// colour.
    pub fn parse(value: &str) -> Result<Self, ClientError> {
        let digits = value.trim().trim_start_matches('#');
        let invalid = || ClientError::UnexpectedPayload {
            detail: format!("invalid hex colour `{value}`"),
        };

        if !digits.chars().all(|character| character.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded = match digits.len() {
            6 => digits.to_owned(),
            3 => digits
                .chars()
                .flat_map(|character| [character, character])
                .collect(),
            _ => return Err(invalid()),
        };

        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Returns the `(red, green, blue)` components.
    #[must_use]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

/// Strict RFC 3339 timestamps; chrono's default `FromStr` is more lenient.
mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|error| D::Error::custom(format!("invalid timestamp `{raw}`: {error}")))
    }
}
