//! Request URL construction for the photo API.
//!
//! Everything here is a pure string transform over [`Url`]: no I/O happens
//! and the same inputs always produce the same URL.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use super::credential::AccessKey;
use super::error::ClientError;
use super::query::{QueryMode, QueryParameters};

/// Public API endpoint used when no base is configured.
pub const DEFAULT_API_BASE: &str = "https://api.unsplash.com";

/// Bytes left unescaped in query values: the RFC 3986 unreserved set.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Appends `pairs` after any existing query, percent-encoding each name and
/// value so a space becomes `%20` rather than `+`.
fn append_query_pairs(url: &mut Url, pairs: &[(&str, &str)]) {
    let mut query = url.query().map(ToOwned::to_owned).unwrap_or_default();
    for (name, value) in pairs {
        if !query.is_empty() {
            query.push('&');
        }
        query.extend(utf8_percent_encode(name, QUERY_VALUE));
        query.push('=');
        query.extend(utf8_percent_encode(value, QUERY_VALUE));
    }
    url.set_query(Some(&query));
}

/// Builds page request URLs against a fixed API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    api_base: Url,
}

impl RequestBuilder {
    /// Creates a builder for the given API base.
    #[must_use]
    pub const fn new(api_base: Url) -> Self {
        Self { api_base }
    }

    /// Parses the API base and creates a builder.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` when `api_base` is not an absolute
    /// URL that can carry a path.
    pub fn parse(api_base: &str) -> Result<Self, ClientError> {
        let parsed =
            Url::parse(api_base).map_err(|error| ClientError::InvalidUrl(error.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{api_base} cannot be used as an API base"
            )));
        }
        Ok(Self::new(parsed))
    }

    /// Returns the configured API base.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Builds the URL for one page request.
    ///
    /// Query parameters are emitted in the order `client_id`, `per_page`,
    /// `page`, then `query` for searches that carry a phrase.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MissingCredential` when `credential` is `None`,
    /// whatever the mode, so callers can run without touching the network.
    /// Returns `ClientError::InvalidPagination` for a zero page or page size.
    pub fn build_url(
        &self,
        params: &QueryParameters,
        credential: Option<&AccessKey>,
    ) -> Result<Url, ClientError> {
        let key = credential.ok_or(ClientError::MissingCredential)?;
        params.validate()?;

        let per_page = params.per_page.to_string();
        let page = params.page.to_string();
        let mut pairs = vec![
            ("client_id", key.value()),
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
        ];
        if params.mode.is_search()
            && let Some(phrase) = params.search_phrase.as_deref()
        {
            pairs.push(("query", phrase));
        }

        let mut url = self.endpoint(params.mode);
        append_query_pairs(&mut url, &pairs);
        Ok(url)
    }

    fn endpoint(&self, mode: QueryMode) -> Url {
        let mut url = self.api_base.clone();
        let path = format!(
            "{base}{endpoint}",
            base = self.api_base.path().trim_end_matches('/'),
            endpoint = mode.path()
        );
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

/// Appends the access key to a photo's download-tracking URL.
///
/// The request built from this URL tells the API that the photo was chosen.
/// Existing query pairs on `download_location` are kept.
#[must_use]
pub fn download_notification_url(download_location: &Url, credential: &AccessKey) -> Url {
    let mut url = download_location.clone();
    append_query_pairs(&mut url, &[("client_id", credential.value())]);
    url
}

/// Decorates an outbound link with referral attribution.
///
/// Produces `utm_source=<app_name>&utm_medium=referral` after any existing
/// query pairs, as the API guidelines ask for links back to photos and
/// photographers.
///
/// ```
/// use photo_picker::api::append_referral;
/// use url::Url;
///
/// let link = Url::parse("https://unsplash.com/photos/YNQgPXShu7g").expect("valid link");
/// assert_eq!(
///     append_referral(&link, "Diving Board").as_str(),
///     "https://unsplash.com/photos/YNQgPXShu7g?utm_source=Diving%20Board&utm_medium=referral"
/// );
/// ```
#[must_use]
pub fn append_referral(base: &Url, app_name: &str) -> Url {
    let mut url = base.clone();
    append_query_pairs(
        &mut url,
        &[("utm_source", app_name), ("utm_medium", "referral")],
    );
    url
}
