//! Unit tests for the photo API module.


use rstest::fixture;

use super::{AccessKey, RequestBuilder};

#[fixture]
fn requests() -> RequestBuilder {
    RequestBuilder::parse("https://api.example.com").expect("test base should parse")
}

fn access_key() -> AccessKey {
    AccessKey::new("ABC").expect("test key should be valid")
}
