//! Mock photo API bundled with the runtime that drives it.

use std::future::Future;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

struct Inner {
    runtime: Runtime,
    server: MockServer,
}

/// A started mock photo API; clones share the same server.
#[derive(Clone)]
pub(crate) struct MockPhotoApi(Rc<Inner>);

impl MockPhotoApi {
    fn start() -> io::Result<Self> {
        let runtime = Runtime::new()?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self(Rc::new(Inner { runtime, server })))
    }

    /// Returns the API stored in `slot`, starting one on first use.
    pub(crate) fn in_slot(slot: &Slot<Self>) -> Self {
        if let Some(api) = slot.get() {
            return api;
        }
        let api = Self::start().unwrap_or_else(|error| panic!("failed to start mock API: {error}"));
        slot.set(api.clone());
        api
    }

    pub(crate) fn uri(&self) -> String {
        self.0.server.uri()
    }

    pub(crate) fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.0.server));
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.runtime.block_on(future)
    }

    /// Number of page and notification requests received so far.
    pub(crate) fn received_request_count(&self) -> usize {
        self.block_on(self.0.server.received_requests())
            .map(|requests| requests.len())
            .unwrap_or_else(|| panic!("mock API is not recording requests"))
    }
}
