//! Mock server helpers for the release feed and artifact downloads

use hazetunnel_update::releases::Release;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Path of the release listing for the default feed
pub const RELEASES_PATH: &str = "/repos/daijro/hazetunnel/releases";

/// Serve `releases` from the release listing endpoint
pub async fn mock_releases(server: &MockServer, releases: &[Release]) {
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(releases))
        .mount(server)
        .await;
}

/// Release listing that fails with `status`
pub async fn mock_releases_failure(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve `content` for `file_name`, asserting the number of requests
pub async fn mock_download(server: &MockServer, file_name: &str, content: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(download_path(file_name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Download that responds only after `delay`
pub async fn mock_slow_download(server: &MockServer, file_name: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(download_path(file_name)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(FAKE_LIBRARY_CONTENT)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Download that always fails with 500
pub async fn mock_failing_download(server: &MockServer, file_name: &str) {
    Mock::given(method("GET"))
        .and(path(download_path(file_name)))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}
