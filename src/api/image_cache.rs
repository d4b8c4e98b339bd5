//! Bounded in-memory image cache and the loader that fills it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use http::StatusCode;
use url::Url;

use super::error::ClientError;
use super::response::classify_failure;
use super::transport::Transport;

/// Memory budget used when the host does not choose one (4 MiB).
pub const DEFAULT_CACHE_BYTES: usize = 4 * 1024 * 1024;

/// Storage for downloaded image bytes, keyed by URL.
pub trait ImageCache: Send + Sync {
    /// Returns the cached bytes for `url`, if any.
    fn get(&self, url: &Url) -> Option<Arc<[u8]>>;

    /// Stores `bytes` for `url`.
    fn put(&self, url: &Url, bytes: Arc<[u8]>);
}

#[derive(Debug, Default)]
struct LruState {
    entries: HashMap<Url, Arc<[u8]>>,
    order: VecDeque<Url>,
    size: usize,
}

impl LruState {
    fn touch(&mut self, url: &Url) {
        if let Some(position) = self.order.iter().position(|entry| entry == url)
            && let Some(entry) = self.order.remove(position)
        {
            self.order.push_back(entry);
        }
    }

    fn remove(&mut self, url: &Url) {
        if let Some(bytes) = self.entries.remove(url) {
            self.size = self.size.saturating_sub(bytes.len());
            self.order.retain(|entry| entry != url);
        }
    }
}

/// Least-recently-used cache bounded by the total size of its entries.
#[derive(Debug)]
pub struct LruImageCache {
    capacity: usize,
    state: Mutex<LruState>,
}

impl LruImageCache {
    /// Creates a cache holding at most `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::default(),
        }
    }

    /// Returns the byte budget.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total size of the cached images in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.lock().size
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LruImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_BYTES)
    }
}

impl ImageCache for LruImageCache {
    fn get(&self, url: &Url) -> Option<Arc<[u8]>> {
        let mut state = self.lock();
        let bytes = state.entries.get(url).cloned()?;
        state.touch(url);
        Some(bytes)
    }

    fn put(&self, url: &Url, bytes: Arc<[u8]>) {
        if bytes.len() > self.capacity {
            tracing::debug!(%url, size = bytes.len(), "image larger than cache; not cached");
            return;
        }

        let mut state = self.lock();
        state.remove(url);
        state.size = state.size.saturating_add(bytes.len());
        state.entries.insert(url.clone(), bytes);
        state.order.push_back(url.clone());

        while state.size > self.capacity {
            let Some(oldest) = state.order.front().cloned() else {
                break;
            };
            tracing::debug!(url = %oldest, "evicting cached image");
            state.remove(&oldest);
        }
    }
}

/// Fetches image bytes, serving repeats from an [`ImageCache`].
pub struct ImageLoader<T: ?Sized, C: ?Sized> {
    transport: Arc<T>,
    cache: Arc<C>,
}

impl<T, C> ImageLoader<T, C>
where
    T: Transport + ?Sized,
    C: ImageCache + ?Sized,
{
    /// Creates a loader over `transport` and `cache`.
    #[must_use]
    pub const fn new(transport: Arc<T>, cache: Arc<C>) -> Self {
        Self { transport, cache }
    }

    /// Returns the cache backing this loader.
    #[must_use]
    pub const fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    /// Returns the bytes at `url`, from the cache when possible.
    ///
    /// Only `200 OK` responses are cached.
    ///
    /// # Errors
    ///
    /// Returns the same classified failures as page fetches, and
    /// `ClientError::UnexpectedPayload` for any other unsuccessful status.
    pub async fn load(&self, url: &Url) -> Result<Arc<[u8]>, ClientError> {
        if let Some(bytes) = self.cache.get(url) {
            tracing::debug!(%url, "image cache hit");
            return Ok(bytes);
        }

        let response = self.transport.get(url).await;
        let body = classify_failure(&response)?;
        if let Some(status) = response.status
            && !status.is_success()
        {
            return Err(ClientError::UnexpectedPayload {
                detail: format!("image request returned {status}"),
            });
        }

        let bytes: Arc<[u8]> = Arc::from(body);
        if response.status == Some(StatusCode::OK) {
            self.cache.put(url, Arc::clone(&bytes));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::StatusCode;
    use rstest::rstest;
    use url::Url;

    use super::{ImageCache, ImageLoader, LruImageCache};
    use crate::api::error::ClientError;
    use crate::api::test_support::ScriptedTransport;
    use crate::api::transport::RawResponse;

    fn url(name: &str) -> Url {
        Url::parse(&format!("https://images.example.com/{name}")).expect("test URL should parse")
    }

    fn bytes(len: usize) -> Arc<[u8]> {
        Arc::from(vec![7_u8; len])
    }

    #[rstest]
    fn evicts_least_recently_used_entry() {
        let cache = LruImageCache::new(10);
        cache.put(&url("a"), bytes(4));
        cache.put(&url("b"), bytes(4));
        assert!(cache.get(&url("a")).is_some(), "a should be cached");

        cache.put(&url("c"), bytes(4));

        assert!(cache.get(&url("b")).is_none(), "b was least recently used");
        assert!(cache.get(&url("a")).is_some());
        assert!(cache.get(&url("c")).is_some());
        assert_eq!(cache.size_bytes(), 8);
    }

    #[rstest]
    fn skips_entries_larger_than_capacity() {
        let cache = LruImageCache::new(4);
        cache.put(&url("small"), bytes(2));
        cache.put(&url("huge"), bytes(5));

        assert!(cache.get(&url("huge")).is_none());
        assert!(cache.get(&url("small")).is_some(), "existing entries survive");
    }

    #[rstest]
    fn replacing_an_entry_updates_the_size() {
        let cache = LruImageCache::new(10);
        cache.put(&url("a"), bytes(6));
        cache.put(&url("a"), bytes(3));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.size_bytes(), 3);
    }

    #[rstest]
    fn default_budget_is_four_mebibytes() {
        assert_eq!(LruImageCache::default().capacity(), 4 * 1024 * 1024);
    }

    #[rstest]
    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let transport = Arc::new(ScriptedTransport::new([RawResponse::ok(vec![1, 2, 3])]));
        let loader = ImageLoader::new(Arc::clone(&transport), Arc::new(LruImageCache::default()));

        let first = loader.load(&url("a")).await.expect("first load should succeed");
        let second = loader.load(&url("a")).await.expect("second load should hit cache");

        assert_eq!(first.as_ref(), [1_u8, 2, 3].as_slice());
        assert_eq!(first, second);
        assert_eq!(transport.request_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn only_ok_responses_are_cached() {
        let transport = Arc::new(ScriptedTransport::new([
            RawResponse::with_status(StatusCode::NON_AUTHORITATIVE_INFORMATION, vec![1]),
            RawResponse::ok(vec![2]),
        ]));
        let cache = Arc::new(LruImageCache::default());
        let loader = ImageLoader::new(Arc::clone(&transport), Arc::clone(&cache));

        loader.load(&url("a")).await.expect("203 is still a success");
        assert!(cache.is_empty(), "non-200 responses must not be cached");

        loader.load(&url("a")).await.expect("second load should succeed");
        assert_eq!(transport.request_count(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    #[case::unauthorised(
        RawResponse::with_status(StatusCode::UNAUTHORIZED, "nope"),
        ClientError::Unauthorized
    )]
    #[case::no_data(
        RawResponse::transport_failure("timed out"),
        ClientError::NoData { message: "timed out".to_owned() }
    )]
    #[case::not_found(
        RawResponse::with_status(StatusCode::NOT_FOUND, "missing"),
        ClientError::UnexpectedPayload { detail: "image request returned 404 Not Found".to_owned() }
    )]
    #[tokio::test]
    async fn failures_are_classified(#[case] response: RawResponse, #[case] expected: ClientError) {
        let transport = Arc::new(ScriptedTransport::new([response]));
        let cache = Arc::new(LruImageCache::default());
        let loader = ImageLoader::new(transport, Arc::clone(&cache));

        let result = loader.load(&url("a")).await;

        assert_eq!(result, Err(expected));
        assert!(cache.is_empty());
    }
}
