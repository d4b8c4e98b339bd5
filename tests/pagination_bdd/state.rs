//! Scenario state and helpers for the pagination BDD tests.

use std::sync::Arc;
use std::time::Duration;

use photo_picker::api::test_support::photo_json;
use photo_picker::api::{Completion, FeedSnapshot};
use photo_picker::{AccessKey, HttpTransport, PhotoClient, PickerSession, QueryMode, RequestBuilder};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::{Value, json};
use wiremock::Mock;

use super::mock_api::MockPhotoApi;

#[derive(ScenarioState, Default)]
pub(crate) struct PagingState {
    pub(crate) api: Slot<MockPhotoApi>,
    pub(crate) access_key: Slot<String>,
    pub(crate) per_page: Slot<u32>,
    pub(crate) snapshot: Slot<FeedSnapshot>,
}

/// Starts the mock API on first use and mounts `mock`.
pub(crate) fn mount(paging_state: &PagingState, mock: Mock) {
    MockPhotoApi::in_slot(&paging_state.api).mount(mock);
}

/// Builds page `page` of a listing, numbering photos `p1`, `p2`, … across
/// pages.
pub(crate) fn photo_page(page: u32, per_page: u32) -> Value {
    let start = (page - 1) * per_page;
    Value::Array(
        (1..=per_page)
            .map(|offset| photo_json(&format!("p{}", start + offset)))
            .collect(),
    )
}

/// Builds page `page` of a search envelope with `total_pages` pages.
pub(crate) fn search_page(page: u32, per_page: u32, total_pages: u32) -> Value {
    json!({
        "total": total_pages * per_page,
        "total_pages": total_pages,
        "results": photo_page(page, per_page)
    })
}

/// Runs a fresh picker session against the mock API, loading up to `pages`
/// pages of `mode`, and records the resulting snapshot.
pub(crate) fn run_picker(
    paging_state: &PagingState,
    mode: QueryMode,
    phrase: Option<&str>,
    pages: u32,
) {
    let api = MockPhotoApi::in_slot(&paging_state.api);
    let requests = RequestBuilder::parse(&api.uri())
        .unwrap_or_else(|error| panic!("mock server URL should parse: {error}"));
    let credential = paging_state.access_key.get().map(|key| {
        AccessKey::new(key).unwrap_or_else(|error| panic!("access key should be valid: {error}"))
    });
    let transport = Arc::new(
        HttpTransport::new(Duration::from_secs(5))
            .unwrap_or_else(|error| panic!("transport should build: {error}")),
    );
    let per_page = paging_state.per_page.get().unwrap_or(40);
    let session = PickerSession::new(PhotoClient::new(transport, requests, credential), per_page);

    if let Some(search_phrase) = phrase {
        session.search(search_phrase);
    }

    api.block_on(async {
        for _ in 0..pages {
            let Some(load) = session.load_next(mode) else {
                break;
            };
            match load.await {
                Completion::Merged { appended: 0 } | Completion::Failed(_) => break,
                Completion::Merged { .. } | Completion::Stale => {}
            }
        }
    });

    paging_state.snapshot.set(session.snapshot(mode));
}
