//! Remote fetch client for photo pages and download notifications.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

use super::credential::AccessKey;
use super::error::ClientError;
use super::models::Photo;
use super::query::QueryParameters;
use super::request::{RequestBuilder, download_notification_url};
use super::response::{PageResult, classify_failure, parse_page};
use super::transport::{RawResponse, Transport};

/// Fetches photo pages through an injected [`Transport`].
///
/// Cloning is cheap; clones share the transport.
pub struct PhotoClient<T: ?Sized> {
    transport: Arc<T>,
    requests: RequestBuilder,
    credential: Option<AccessKey>,
}

impl<T: ?Sized> Clone for PhotoClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            requests: self.requests.clone(),
            credential: self.credential.clone(),
        }
    }
}

impl<T> PhotoClient<T>
where
    T: Transport + ?Sized + 'static,
{
    /// Creates a client.
    ///
    /// A `None` credential is allowed: every page fetch then fails with
    /// `ClientError::MissingCredential` without reaching the transport, which
    /// lets a host exercise its UI offline.
    #[must_use]
    pub const fn new(
        transport: Arc<T>,
        requests: RequestBuilder,
        credential: Option<AccessKey>,
    ) -> Self {
        Self {
            transport,
            requests,
            credential,
        }
    }

    /// Returns the request builder.
    #[must_use]
    pub const fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Returns the configured credential.
    #[must_use]
    pub const fn credential(&self) -> Option<&AccessKey> {
        self.credential.as_ref()
    }

    /// Performs one transport call.
    pub async fn fetch(&self, url: &Url) -> RawResponse {
        tracing::debug!(%url, "fetching");
        self.transport.get(url).await
    }

    /// Builds the URL for `params`, fetches it once, and decodes the page.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MissingCredential` without any transport call
    /// when no credential is configured, and otherwise the classified
    /// failure of the response (see [`parse_page`]).
    pub async fn fetch_page(&self, params: &QueryParameters) -> Result<PageResult, ClientError> {
        let url = self.requests.build_url(params, self.credential.as_ref())?;
        let response = self.fetch(&url).await;
        parse_page(&response, params.mode)
    }

    /// Tells the API that `photo` was chosen, without waiting for the result.
    ///
    /// The request runs on the current Tokio runtime. Failures are logged
    /// and dropped; nothing is retried. Returns `None` when there is no
    /// credential or no runtime to run the request on.
    pub fn notify_download(&self, photo: &Photo) -> Option<JoinHandle<()>> {
        let Some(credential) = self.credential.as_ref() else {
            tracing::debug!(photo = %photo.id, "no access key; skipping download notification");
            return None;
        };
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(photo = %photo.id, "no async runtime; skipping download notification");
            return None;
        };

        let url = download_notification_url(&photo.links.download_location, credential);
        let transport = Arc::clone(&self.transport);
        let photo_id = photo.id.clone();

        Some(runtime.spawn(async move {
            let response = transport.get(&url).await;
            match classify_failure(&response) {
                Ok(_) => tracing::debug!(photo = %photo_id, "download notification sent"),
                Err(error) => {
                    tracing::warn!(photo = %photo_id, %error, "download notification failed");
                }
            }
        }))
    }
}
