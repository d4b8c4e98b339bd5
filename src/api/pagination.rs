//! Page cursor and the result-accumulating pagination state machine.
//!
//! A [`PaginationController`] decides which page to request next, merges the
//! decoded pages into one ordered list, and detects the end of a search. It
//! never performs I/O itself: [`PaginationController::load_next`] hands out a
//! [`PageTicket`] describing the single fetch to issue, and the caller reports
//! the outcome back through [`PaginationController::complete`].
//!
//! # Example
//!
//! ```
//! use photo_picker::api::pagination::{Completion, LoadState, PaginationController};
//! use photo_picker::api::query::QueryMode;
//! use photo_picker::api::response::PageResult;
//!
//! let mut controller = PaginationController::new(QueryMode::Curated, 40);
//! let ticket = controller.load_next().expect("idle controller should issue a ticket");
//! assert_eq!(ticket.params().page, 1);
//! assert!(controller.load_next().is_none(), "only one fetch may be in flight");
//!
//! let outcome = controller.complete(&ticket, Ok(PageResult::default()));
//! assert_eq!(outcome, Completion::Merged { appended: 0 });
//! assert_eq!(controller.state(), LoadState::Loaded);
//! ```

use super::error::ClientError;
use super::models::Photo;
use super::query::{QueryMode, QueryParameters, normalise_phrase};
use super::rate_limit::RateLimitInfo;
use super::response::PageResult;

/// Position within a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Next page to fetch (1-based).
    page: u32,
    /// Items per page, fixed for the life of the cursor.
    per_page: u32,
    /// Total number of pages, once a search envelope reported it.
    total_pages: Option<u32>,
}

impl PageCursor {
    /// Creates a cursor positioned on the first page.
    #[must_use]
    pub const fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            total_pages: None,
        }
    }

    /// Returns the next page to fetch (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns the total number of pages if known.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Returns true once the page about to be fetched lies past the known
    /// total.
    #[must_use]
    pub fn is_past_end(&self) -> bool {
        self.total_pages.is_some_and(|total| self.page > total)
    }

    const fn advance(&mut self, fetched: u32, total_pages: Option<u32>) {
        self.page = fetched.saturating_add(1);
        if total_pages.is_some() {
            self.total_pages = total_pages;
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(super::query::DEFAULT_PER_PAGE)
    }
}

/// Load state exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested since creation or the last reset.
    #[default]
    Idle,
    /// A page fetch is in flight.
    Loading,
    /// At least one page merged; more may follow.
    Loaded,
    /// The search reported no further pages.
    Exhausted,
    /// The last fetch failed; the error is retained.
    Failed,
}

impl LoadState {
    /// Returns the lowercase label for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        }
    }
}

/// The single fetch a controller expects to be issued.
///
/// Tickets are tagged with the controller's generation, which every reset
/// bumps, so results for an abandoned query are recognised on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    params: QueryParameters,
}

impl PageTicket {
    /// Returns the parameters of the page to fetch.
    #[must_use]
    pub const fn params(&self) -> &QueryParameters {
        &self.params
    }

    /// Returns the generation the ticket was issued in.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of applying a fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The page was merged; `appended` photos were added.
    Merged {
        /// Number of photos added by this page.
        appended: usize,
    },
    /// The fetch failed and the controller is now `Failed`.
    Failed(ClientError),
    /// The ticket no longer matches the controller and was discarded.
    Stale,
}

/// Accumulates pages of one collection.
#[derive(Debug, Clone)]
pub struct PaginationController {
    mode: QueryMode,
    search_phrase: Option<String>,
    cursor: PageCursor,
    photos: Vec<Photo>,
    state: LoadState,
    error: Option<ClientError>,
    rate_limit: Option<RateLimitInfo>,
    generation: u64,
    pending: Option<PageTicket>,
    resume: Option<(LoadState, Option<ClientError>)>,
}

impl PaginationController {
    /// Creates an idle controller for `mode`.
    #[must_use]
    pub const fn new(mode: QueryMode, per_page: u32) -> Self {
        Self {
            mode,
            search_phrase: None,
            cursor: PageCursor::new(per_page),
            photos: Vec::new(),
            state: LoadState::Idle,
            error: None,
            rate_limit: None,
            generation: 0,
            pending: None,
            resume: None,
        }
    }

    /// Starts over with a new mode and phrase.
    ///
    /// Accumulated photos, the cursor and any error are cleared. A fetch
    /// still in flight becomes stale and its result will be discarded.
    pub fn reset(&mut self, mode: QueryMode, phrase: Option<&str>) {
        self.generation = self.generation.wrapping_add(1);
        self.mode = mode;
        self.search_phrase = normalise_phrase(phrase);
        self.cursor = PageCursor::new(self.cursor.per_page);
        self.photos.clear();
        self.state = LoadState::Idle;
        self.error = None;
        self.pending = None;
        self.resume = None;
        tracing::debug!(
            mode = %self.mode,
            generation = self.generation,
            "pagination reset"
        );
    }

    /// Claims the next page fetch.
    ///
    /// Returns `None` while a fetch is in flight, once a search is
    /// exhausted, and for a search without a phrase. Otherwise the
    /// controller enters [`LoadState::Loading`] and the returned ticket
    /// describes the one request to issue.
    pub fn load_next(&mut self) -> Option<PageTicket> {
        if matches!(self.state, LoadState::Loading | LoadState::Exhausted) {
            return None;
        }
        if self.mode.is_search() && self.search_phrase.is_none() {
            tracing::debug!("search has no phrase; nothing to load");
            return None;
        }

        let params = QueryParameters {
            mode: self.mode,
            page: self.cursor.page,
            per_page: self.cursor.per_page,
            search_phrase: self.search_phrase.clone(),
        };
        let ticket = PageTicket {
            generation: self.generation,
            params,
        };

        self.resume = Some((self.state, self.error.take()));
        self.state = LoadState::Loading;
        self.pending = Some(ticket.clone());
        Some(ticket)
    }

    /// Gives back the fetch described by `ticket` without a result.
    ///
    /// Used when the fetch is cancelled before it completes. The controller
    /// returns to the state it was in before [`Self::load_next`], error
    /// included, so the same page is offered again. Returns false and
    /// changes nothing when `ticket` is not the pending one.
    pub fn abandon(&mut self, ticket: &PageTicket) -> bool {
        if self.state != LoadState::Loading || self.pending.as_ref() != Some(ticket) {
            return false;
        }
        self.pending = None;
        let (state, error) = self.resume.take().unwrap_or_default();
        self.state = state;
        self.error = error;
        tracing::debug!(
            mode = %self.mode,
            page = ticket.params.page,
            state = self.state.as_str(),
            "page fetch abandoned"
        );
        true
    }

    /// Applies the result of the fetch described by `ticket`.
    ///
    /// On success the photos are appended in order and the cursor moves to
    /// the following page. On failure the error is kept and the cursor stays
    /// put, so the next [`Self::load_next`] retries the same page. Tickets
    /// from before a reset, or for a fetch the controller is not waiting on,
    /// leave the controller untouched.
    pub fn complete(
        &mut self,
        ticket: &PageTicket,
        result: Result<PageResult, ClientError>,
    ) -> Completion {
        if self.state != LoadState::Loading || self.pending.as_ref() != Some(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                page = ticket.params.page,
                "discarding stale page"
            );
            return Completion::Stale;
        }
        self.pending = None;
        self.resume = None;

        match result {
            Ok(page) => self.merge(ticket.params.page, page),
            Err(error) => {
                tracing::warn!(
                    mode = %self.mode,
                    page = ticket.params.page,
                    %error,
                    "page fetch failed"
                );
                if let ClientError::Forbidden { rate_limit } = &error {
                    self.rate_limit = rate_limit.or(self.rate_limit);
                }
                self.state = LoadState::Failed;
                self.error = Some(error.clone());
                Completion::Failed(error)
            }
        }
    }

    fn merge(&mut self, fetched: u32, page: PageResult) -> Completion {
        let appended = page.photos.len();
        self.photos.extend(page.photos);
        self.cursor.advance(fetched, page.total_pages);
        if page.rate_limit.is_some() {
            self.rate_limit = page.rate_limit;
        }

        let exhausted = self.mode.is_search() && self.cursor.is_past_end();
        self.state = if exhausted {
            LoadState::Exhausted
        } else {
            LoadState::Loaded
        };

        tracing::info!(
            mode = %self.mode,
            page = fetched,
            appended,
            total = self.photos.len(),
            state = self.state.as_str(),
            "page merged"
        );
        Completion::Merged { appended }
    }

    /// Returns true until a search reports its last page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state != LoadState::Exhausted
    }

    /// Returns every photo merged so far, in page order.
    #[must_use]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Returns the current load state.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Returns the error of the last failed fetch while `Failed`.
    #[must_use]
    pub const fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    /// Returns the page cursor.
    #[must_use]
    pub const fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Returns the collection being browsed.
    #[must_use]
    pub const fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Returns the normalised search phrase, if any.
    #[must_use]
    pub fn search_phrase(&self) -> Option<&str> {
        self.search_phrase.as_deref()
    }

    /// Returns the most recent rate limit report.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<RateLimitInfo> {
        self.rate_limit
    }

    /// Returns the reset generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
