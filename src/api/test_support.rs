//! Fixtures and a scripted transport shared by unit and behavioural tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use url::Url;

use super::models::Photo;
use super::transport::{RawResponse, Transport};

/// Builds the JSON the API returns for one photo.
#[must_use]
pub fn photo_json(id: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2016-05-03T11:00:28-04:00",
        "updated_at": "2016-07-10T11:00:01-05:00",
        "width": 2448,
        "height": 3264,
        "color": "#60544D",
        "description": format!("Photo {id}"),
        "likes": 12,
        "urls": {
            "raw": format!("https://images.example.com/{id}?raw"),
            "full": format!("https://images.example.com/{id}?full"),
            "regular": format!("https://images.example.com/{id}?w=1080"),
            "small": format!("https://images.example.com/{id}?w=400"),
            "thumb": format!("https://images.example.com/{id}?w=200")
        },
        "links": {
            "html": format!("https://example.com/photos/{id}"),
            "download": format!("https://example.com/photos/{id}/download"),
            "download_location": format!("https://api.example.com/photos/{id}/download?ixid=xyz")
        },
        "user": {
            "id": "user-1",
            "username": "jimmy",
            "name": "Jimmy Lens",
            "first_name": "Jimmy",
            "last_name": null,
            "portfolio_url": null,
            "bio": null,
            "location": "Montreal",
            "profile_image": {
                "small": "https://images.example.com/profile-1?w=32",
                "medium": "https://images.example.com/profile-1?w=64",
                "large": "https://images.example.com/profile-1?w=128"
            },
            "links": { "html": "https://example.com/@jimmy" }
        }
    })
}

/// Builds a bare array page of photos with the given identifiers.
#[must_use]
pub fn photo_page_json(ids: &[&str]) -> Value {
    Value::Array(ids.iter().map(|id| photo_json(id)).collect())
}

/// Builds a search envelope holding photos with the given identifiers.
#[must_use]
pub fn search_page_json(ids: &[&str], total: u64, total_pages: u32) -> Value {
    json!({
        "total": total,
        "total_pages": total_pages,
        "results": photo_page_json(ids)
    })
}

/// Decodes [`photo_json`] into a [`Photo`].
///
/// # Panics
///
/// Panics if the fixture no longer matches the model.
#[must_use]
pub fn sample_photo(id: &str) -> Photo {
    serde_json::from_value(photo_json(id))
        .unwrap_or_else(|error| panic!("photo fixture should decode: {error}"))
}

/// Serialises `value` into a `200 OK` response.
#[must_use]
pub fn json_response(value: &Value) -> RawResponse {
    RawResponse::ok(value.to_string())
}

/// Transport replaying canned responses in order and recording every URL.
///
/// A gated transport holds each request until [`ScriptedTransport::release`]
/// hands out a permit, which keeps a fetch in flight for as long as a test
/// needs.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<Url>>,
    gate: Option<Semaphore>,
}

impl ScriptedTransport {
    /// Creates a transport answering immediately.
    #[must_use]
    pub fn new(responses: impl IntoIterator<Item = RawResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::default(),
            gate: None,
        }
    }

    /// Creates a transport whose requests wait for [`Self::release`].
    #[must_use]
    pub fn gated(responses: impl IntoIterator<Item = RawResponse>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(responses)
        }
    }

    /// Queues another response.
    pub fn push(&self, response: RawResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Lets `count` waiting or future requests complete.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Returns every URL requested so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Url> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of requests issued so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> RawResponse {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());

        if let Some(gate) = &self.gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| RawResponse::transport_failure("no scripted response left"))
    }
}
