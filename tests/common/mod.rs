//! Shared fixtures for integration tests
//!
//! The client is blocking, so every test drives it from
//! `tokio::task::spawn_blocking` while the `wiremock` server runs on the
//! test runtime.

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipfabric_client::Config;

#[allow(dead_code)]
pub const TOKEN: &str = "test-token";

/// Snapshot listing, newest first: A loaded, U unloaded, B loaded and locked
#[allow(dead_code)]
pub fn snapshot_listing() -> Value {
    json!([
        {
            "id": "snap-a",
            "name": "Nightly",
            "totalDevCount": 640,
            "state": "loaded",
            "locked": false,
            "tsStart": 1634817594941i64,
            "tsEnd": 1634819823513i64
        },
        {
            "id": "snap-u",
            "name": null,
            "totalDevCount": 12,
            "state": "unloaded",
            "locked": true,
            "tsStart": 1634717594941i64,
            "tsEnd": 1634719823513i64
        },
        {
            "id": "snap-b",
            "name": "Baseline 10-21",
            "totalDevCount": 633,
            "state": "loaded",
            "locked": true,
            "tsStart": 1634617594941i64,
            "tsEnd": 1634619823513i64
        }
    ])
}

/// Mount `os/version` and `snapshots`, both requiring the token header
#[allow(dead_code)]
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/os/version"))
        .and(header("X-API-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "4.0.2"})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/snapshots"))
        .and(header("X-API-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_listing()))
        .mount(server)
        .await;
}

/// Numbered rows `start..end`
#[allow(dead_code)]
pub fn rows(start: usize, end: usize) -> Vec<Value> {
    (start..end)
        .map(|i| json!({"id": i.to_string(), "hostname": format!("dev{}", i)}))
        .collect()
}

/// Mount one page of a table with `total` rows, expected exactly once
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, table: &str, start: usize, limit: usize, total: usize) {
    let end = (start + limit).min(total);
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/{}", table)))
        .and(body_partial_json(
            json!({"pagination": {"start": start, "limit": limit}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": rows(start.min(end), end),
            "_meta": {"count": total, "limit": limit, "start": start}
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Configuration pointing at the mock server
#[allow(dead_code)]
pub fn config_for(server_uri: &str) -> Config {
    Config {
        url: Some(server_uri.to_string()),
        token: Some(TOKEN.to_string()),
        timeout_seconds: 5,
        ..Config::default()
    }
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Run blocking client code off the async test runtime
///
/// The client must be created and dropped inside `f`.
#[allow(dead_code)]
pub async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}
