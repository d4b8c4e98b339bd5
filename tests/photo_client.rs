//! Integration tests for the HTTP transport, client, and image loader
//! against a mock photo API.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use photo_picker::api::test_support::{photo_json, photo_page_json, search_page_json};
use photo_picker::api::{
    ImageLoader, LruImageCache, Photo, QueryParameters, RateLimitInfo, Transport,
};
use photo_picker::{AccessKey, ClientError, HttpTransport, PhotoClient, QueryMode, RequestBuilder};
use rstest::rstest;
use serde_json::Value;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(Duration::from_secs(5)).expect("transport should build"))
}

fn client(server: &MockServer) -> PhotoClient<HttpTransport> {
    let requests = RequestBuilder::parse(&server.uri()).expect("server URI should parse");
    let key = AccessKey::new("ABC").expect("key should be valid");
    PhotoClient::new(transport(), requests, Some(key))
}

fn photo_downloaded_from(server: &MockServer, id: &str) -> Photo {
    let mut value = photo_json(id);
    let location = value
        .pointer_mut("/links/download_location")
        .expect("fixture should carry a download location");
    *location = Value::from(format!("{}/photos/{id}/download?ixid=xyz", server.uri()));
    serde_json::from_value(value).expect("photo fixture should decode")
}

#[tokio::test]
async fn fetch_page_sends_versioned_request_and_decodes_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .and(query_param("client_id", "ABC"))
        .and(query_param("per_page", "2"))
        .and(query_param("page", "1"))
        .and(header("Accept-Version", "v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(photo_page_json(&["a", "b"]))
                .insert_header("X-Ratelimit-Limit", "50")
                .insert_header("X-Ratelimit-Remaining", "48"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .fetch_page(&QueryParameters::new(QueryMode::Recent, 2))
        .await
        .expect("page should decode");

    let ids: Vec<&str> = page.photos.iter().map(|photo| photo.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(page.rate_limit, Some(RateLimitInfo::new(50, 48)));
}

#[tokio::test]
async fn fetch_page_decodes_search_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .and(query_param("query", "red fox"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page_json(&["a", "b", "c"], 9, 3)),
        )
        .mount(&server)
        .await;

    let params = QueryParameters::new(QueryMode::Search, 3).with_search_phrase(Some("red fox"));
    let page = client(&server)
        .fetch_page(&params)
        .await
        .expect("search page should decode");

    assert_eq!(page.photos.len(), 3);
    assert_eq!(page.total_pages, Some(3));
    assert_eq!(page.total, Some(9));
}

#[rstest]
#[case::unauthorised(401, ClientError::Unauthorized)]
#[case::server_error(500, ClientError::ServerError)]
#[case::unavailable(503, ClientError::ServiceUnavailable)]
#[tokio::test]
async fn http_status_is_classified(#[case] status: u16, #[case] expected: ClientError) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_json(photo_page_json(&["a"])))
        .mount(&server)
        .await;

    let result = client(&server)
        .fetch_page(&QueryParameters::new(QueryMode::Curated, 10))
        .await;

    assert_eq!(result, Err(expected));
}

#[tokio::test]
async fn forbidden_reports_rate_limit_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string("Rate Limit Exceeded")
                .insert_header("X-Ratelimit-Limit", "50")
                .insert_header("X-Ratelimit-Remaining", "0"),
        )
        .mount(&server)
        .await;

    let result = client(&server)
        .fetch_page(&QueryParameters::new(QueryMode::Recent, 10))
        .await;

    let Err(ClientError::Forbidden {
        rate_limit: Some(rate_limit),
    }) = result
    else {
        panic!("expected Forbidden with rate limit, got {result:?}");
    };
    assert!(rate_limit.is_exhausted());
}

#[tokio::test]
async fn unreachable_server_is_no_data() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port should bind");
    let address = listener.local_addr().expect("listener should have an address");
    drop(listener);
    let requests =
        RequestBuilder::parse(&format!("http://{address}")).expect("address should parse");
    let key = AccessKey::new("ABC").expect("key should be valid");
    let client = PhotoClient::new(transport(), requests, Some(key));

    let result = client
        .fetch_page(&QueryParameters::new(QueryMode::Recent, 10))
        .await;

    assert!(
        matches!(result, Err(ClientError::NoData { .. })),
        "expected NoData, got {result:?}"
    );
}

#[tokio::test]
async fn download_notification_reaches_tracking_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/a/download"))
        .and(query_param("ixid", "xyz"))
        .and(query_param("client_id", "ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let handle = client(&server)
        .notify_download(&photo_downloaded_from(&server, "a"))
        .expect("notification should be spawned");
    handle.await.expect("notification task should finish");
}

#[tokio::test]
async fn failed_download_notification_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let handle = client(&server)
        .notify_download(&photo_downloaded_from(&server, "a"))
        .expect("notification should be spawned");

    handle.await.expect("a failed notification must not panic");
}

#[tokio::test]
async fn image_loader_serves_repeats_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xd8, 0xff]))
        .expect(1)
        .mount(&server)
        .await;
    let url = Url::parse(&format!("{}/images/a.jpg", server.uri())).expect("URL should parse");
    let cache = Arc::new(LruImageCache::default());
    let loader = ImageLoader::new(transport(), Arc::clone(&cache));

    let first = loader.load(&url).await.expect("first load should succeed");
    let second = loader.load(&url).await.expect("second load should succeed");

    assert_eq!(first.as_ref(), [0xff_u8, 0xd8, 0xff].as_slice());
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn transport_reports_raw_status_for_unlisted_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&server)
        .await;
    let url = Url::parse(&server.uri()).expect("URL should parse");

    let response = transport().get(&url).await;

    assert_eq!(response.status.map(|status| status.as_u16()), Some(404));
    assert_eq!(response.body.as_deref(), Some(b"missing".as_slice()));
    assert_eq!(response.transport_error, None);
}
