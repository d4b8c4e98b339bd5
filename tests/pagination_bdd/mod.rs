//! Support modules for the pagination BDD tests.

pub(crate) mod mock_api;
pub(crate) mod state;

pub(crate) use state::{PagingState, mount, photo_page, run_picker, search_page};
