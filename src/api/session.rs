//! Picker session owning one pagination controller per collection.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use super::client::PhotoClient;
use super::error::ClientError;
use super::models::Photo;
use super::pagination::{Completion, LoadState, PageCursor, PageTicket, PaginationController};
use super::query::QueryMode;
use super::response::PageResult;
use super::transport::Transport;

/// Owned copy of a controller's visible state, suitable for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Collection the snapshot was taken from.
    pub mode: QueryMode,
    /// Load state at the time of the snapshot.
    pub state: LoadState,
    /// Accumulated photos in page order.
    pub photos: Vec<Photo>,
    /// Error retained by a failed controller.
    pub error: Option<ClientError>,
    /// Page cursor.
    pub cursor: PageCursor,
    /// Normalised search phrase.
    pub search_phrase: Option<String>,
    /// Whether more pages may be loaded.
    pub has_more: bool,
}

impl FeedSnapshot {
    fn of(controller: &PaginationController) -> Self {
        Self {
            mode: controller.mode(),
            state: controller.state(),
            photos: controller.photos().to_vec(),
            error: controller.error().cloned(),
            cursor: controller.cursor(),
            search_phrase: controller.search_phrase().map(ToOwned::to_owned),
            has_more: controller.has_more(),
        }
    }
}

/// The photo chosen when a session ends.
#[derive(Debug)]
pub struct PickedPhoto {
    /// The selected photo.
    pub photo: Photo,
    /// Handle of the download notification, when one was sent.
    pub notification: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Controllers {
    recent: PaginationController,
    curated: PaginationController,
    search: PaginationController,
}

impl Controllers {
    const fn new(per_page: u32) -> Self {
        Self {
            recent: PaginationController::new(QueryMode::Recent, per_page),
            curated: PaginationController::new(QueryMode::Curated, per_page),
            search: PaginationController::new(QueryMode::Search, per_page),
        }
    }

    const fn get(&self, mode: QueryMode) -> &PaginationController {
        match mode {
            QueryMode::Recent => &self.recent,
            QueryMode::Curated => &self.curated,
            QueryMode::Search => &self.search,
        }
    }

    const fn get_mut(&mut self, mode: QueryMode) -> &mut PaginationController {
        match mode {
            QueryMode::Recent => &mut self.recent,
            QueryMode::Curated => &mut self.curated,
            QueryMode::Search => &mut self.search,
        }
    }
}

type SharedControllers = Arc<Mutex<Controllers>>;

fn with_controller<R>(
    controllers: &Mutex<Controllers>,
    mode: QueryMode,
    action: impl FnOnce(&mut PaginationController) -> R,
) -> R {
    let mut guard = controllers.lock().unwrap_or_else(PoisonError::into_inner);
    action(guard.get_mut(mode))
}

/// Returns an unfinished fetch to its controller when dropped.
///
/// Owned by the load future, so cancelling or never polling that future
/// leaves the controller able to load the same page again.
struct PendingLoad {
    controllers: SharedControllers,
    mode: QueryMode,
    ticket: Option<PageTicket>,
}

impl PendingLoad {
    fn complete(mut self, result: Result<PageResult, ClientError>) -> Completion {
        let Some(ticket) = self.ticket.take() else {
            return Completion::Stale;
        };
        with_controller(&self.controllers, self.mode, |controller| {
            controller.complete(&ticket, result)
        })
    }
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            let released = with_controller(&self.controllers, self.mode, |controller| {
                controller.abandon(&ticket)
            });
            if released {
                tracing::debug!(mode = %self.mode, "load cancelled before completing");
            }
        }
    }
}

/// Browsing state of one picker presentation.
///
/// Each [`QueryMode`] has its own controller, so switching tabs keeps what
/// was already loaded. The controllers sit behind a mutex that is only held
/// for synchronous state transitions, never across a fetch.
pub struct PickerSession<T: ?Sized> {
    client: PhotoClient<T>,
    controllers: SharedControllers,
}

impl<T> PickerSession<T>
where
    T: Transport + ?Sized + 'static,
{
    /// Creates a session with idle controllers for every mode.
    #[must_use]
    pub fn new(client: PhotoClient<T>, per_page: u32) -> Self {
        Self {
            client,
            controllers: Arc::new(Mutex::new(Controllers::new(per_page))),
        }
    }

    /// Returns the client used for fetches.
    #[must_use]
    pub const fn client(&self) -> &PhotoClient<T> {
        &self.client
    }

    /// Resets the controller for `mode`; see [`PaginationController::reset`].
    pub fn reset(&self, mode: QueryMode, phrase: Option<&str>) {
        with_controller(&self.controllers, mode, |controller| {
            controller.reset(mode, phrase);
        });
    }

    /// Starts a new search for `phrase`.
    pub fn search(&self, phrase: &str) {
        self.reset(QueryMode::Search, Some(phrase));
    }

    /// Claims the next page of `mode` and returns the future that fetches
    /// and merges it.
    ///
    /// The ticket is taken before this returns, so a second call made while
    /// the first future is pending returns `None` and no second request is
    /// issued. `None` is also returned for an exhausted search or a search
    /// without a phrase. The future resolves to the [`Completion`] applied to
    /// the controller. Dropping the future before it resolves gives the
    /// ticket back; see [`PaginationController::abandon`].
    pub fn load_next(
        &self,
        mode: QueryMode,
    ) -> Option<impl Future<Output = Completion> + Send + 'static> {
        let ticket = with_controller(&self.controllers, mode, PaginationController::load_next)?;
        let params = ticket.params().clone();
        let client = self.client.clone();
        let pending = PendingLoad {
            controllers: Arc::clone(&self.controllers),
            mode,
            ticket: Some(ticket),
        };

        Some(async move {
            let result = client.fetch_page(&params).await;
            pending.complete(result)
        })
    }

    /// Returns true until the search for `mode` is exhausted.
    #[must_use]
    pub fn has_more(&self, mode: QueryMode) -> bool {
        self.inspect(mode, PaginationController::has_more)
    }

    /// Returns an owned copy of the state of `mode`.
    #[must_use]
    pub fn snapshot(&self, mode: QueryMode) -> FeedSnapshot {
        self.inspect(mode, FeedSnapshot::of)
    }

    /// Runs `view` against the controller of `mode` without copying it.
    pub fn inspect<R>(&self, mode: QueryMode, view: impl FnOnce(&PaginationController) -> R) -> R {
        let guard = self
            .controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        view(guard.get(mode))
    }

    /// Ends the session by choosing the photo at `index` of `mode`.
    ///
    /// The download notification is sent in the background; see
    /// [`PhotoClient::notify_download`]. Returns `None` when `index` is out of
    /// range.
    #[must_use]
    pub fn pick(self, mode: QueryMode, index: usize) -> Option<PickedPhoto> {
        let photo = self.inspect(mode, |controller| controller.photos().get(index).cloned())?;
        tracing::info!(photo = %photo.id, %mode, "photo picked");
        let notification = self.client.notify_download(&photo);
        Some(PickedPhoto {
            photo,
            notification,
        })
    }
}
