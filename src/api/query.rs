//! Page request parameters for the photo listing and search endpoints.

use std::fmt;
use std::str::FromStr;

use super::error::ClientError;

/// Results per page used when the host does not choose a size.
pub const DEFAULT_PER_PAGE: u32 = 40;

/// Collection the picker is browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryMode {
    /// Most recently published photos.
    #[default]
    Recent,
    /// Editorially curated photos.
    Curated,
    /// Photos matching a search phrase.
    Search,
}

impl QueryMode {
    /// All modes, in the order the picker presents them.
    pub const ALL: [Self; 3] = [Self::Recent, Self::Curated, Self::Search];

    /// Returns the API path serving this mode.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Recent => "/photos",
            Self::Curated => "/photos/curated",
            Self::Search => "/search/photos",
        }
    }

    /// Returns the lowercase label for this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Curated => "curated",
            Self::Search => "search",
        }
    }

    /// Returns true for the search endpoint, the only one that reports a
    /// total page count.
    #[must_use]
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::Search)
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "recent" | "new" | "latest" => Ok(Self::Recent),
            "curated" | "popular" => Ok(Self::Curated),
            "search" => Ok(Self::Search),
            other => Err(ClientError::Configuration {
                message: format!("unknown collection mode: {other}"),
            }),
        }
    }
}

/// Describes a single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    /// Collection to query.
    pub mode: QueryMode,
    /// Page number to fetch (1-based).
    pub page: u32,
    /// Results per page, sent verbatim.
    pub per_page: u32,
    /// Search phrase; only sent in [`QueryMode::Search`].
    pub search_phrase: Option<String>,
}

impl QueryParameters {
    /// Creates parameters for the first page of `mode`.
    #[must_use]
    pub const fn new(mode: QueryMode, per_page: u32) -> Self {
        Self {
            mode,
            page: 1,
            per_page,
            search_phrase: None,
        }
    }

    /// Sets the page number.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the search phrase. Blank phrases are treated as absent.
    #[must_use]
    pub fn with_search_phrase(mut self, phrase: Option<&str>) -> Self {
        self.search_phrase = normalise_phrase(phrase);
        self
    }

    /// Checks that the page and page size are usable.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidPagination` when either value is zero.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.page == 0 {
            return Err(ClientError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }

        if self.per_page == 0 {
            return Err(ClientError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        Ok(())
    }
}

/// Trims a phrase, mapping blank input to `None`.
pub(crate) fn normalise_phrase(phrase: Option<&str>) -> Option<String> {
    phrase
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToOwned::to_owned)
}
