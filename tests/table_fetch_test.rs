//! Table fetch tests against a mock API
//!
//! Covers pagination completeness, abort-on-error, column discovery and
//! the raw query and inventory paths.

mod common;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipfabric_client::{FetchOptions, IpfClient, IpfError, QueryBody, Row};

const TABLE: &str = "tables/inventory/devices";

fn ids(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn expected_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_all_collects_every_page_in_order() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    for start in [0, 10, 20] {
        common::mount_page(&server, TABLE, start, 10, 25).await;
    }

    let config = common::config_for(&server.uri());
    let rows = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.fetch_all(
            TABLE,
            &FetchOptions::new().columns(["id", "hostname"]).limit(10),
        )
    })
    .await
    .expect("fetch_all");

    assert_eq!(rows.len(), 25);
    assert_eq!(ids(&rows), expected_ids(25));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_all_exact_multiple_stops_at_total() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    common::mount_page(&server, TABLE, 0, 5, 10).await;
    common::mount_page(&server, TABLE, 5, 5, 10).await;
    // a third page would start at the total and must never be requested
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/{}", TABLE)))
        .and(body_partial_json(json!({"pagination": {"start": 10}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let rows = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.fetch_all(TABLE, &FetchOptions::new().columns(["id"]).limit(5))
    })
    .await
    .expect("fetch_all");

    assert_eq!(ids(&rows), expected_ids(10));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_all_empty_table_issues_one_request() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    common::mount_page(&server, TABLE, 0, 10_000, 0).await;

    let config = common::config_for(&server.uri());
    let rows = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.fetch_all(TABLE, &FetchOptions::new().columns(["id"]))
    })
    .await
    .expect("fetch_all");

    assert!(rows.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_all_aborts_when_a_page_fails() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    common::mount_page(&server, TABLE, 0, 10, 30).await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/{}", TABLE)))
        .and(body_partial_json(json!({"pagination": {"start": 10}})))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/{}", TABLE)))
        .and(body_partial_json(json!({"pagination": {"start": 20}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let result = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.fetch_all(TABLE, &FetchOptions::new().columns(["id"]).limit(10))
    })
    .await;

    let err = result.expect_err("second page fails");
    match err.downcast_ref::<IpfError>() {
        Some(IpfError::Status { status, body, .. }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_all_sends_snapshot_and_filters() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/{}", TABLE)))
        .and(body_json(json!({
            "columns": ["hostname"],
            "snapshot": "snap-b",
            "filters": {"vendor": ["like", "cisco"]},
            "pagination": {"start": 0, "limit": 10000}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"hostname": "L1R1"}],
            "_meta": {"count": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let rows = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.fetch_all(
            TABLE,
            &FetchOptions::new()
                .columns(["hostname"])
                .filters(json!({"vendor": ["like", "cisco"]}))
                .snapshot("$lastLocked"),
        )
    })
    .await
    .expect("fetch_all");

    assert_eq!(rows[0]["hostname"], "L1R1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_single_page_uses_window() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    common::mount_page(&server, "tables/addressing/arp", 3, 2, 100).await;

    let config = common::config_for(&server.uri());
    let rows = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.fetch(
            "/api/v1/tables/addressing/arp",
            &FetchOptions::new().columns(["id"]).start(3).limit(2),
        )
    })
    .await
    .expect("fetch");

    assert_eq!(ids(&rows), vec!["3", "4"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_columns_discovered_from_422_message() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tables/inventory/sites"))
        .and(body_json(json!({"snapshot": "snap-a", "columns": ["*"]})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{
                "field": "columns[0]",
                "message": "\"columns[0]\" must be one of [colA, colB, colC]"
            }]
        })))
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let columns = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.columns("tables/inventory/sites")
    })
    .await
    .expect("columns");

    assert_eq!(columns, vec!["colA", "colB", "colC"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_column_discovery_success_response_is_protocol_violation() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tables/inventory/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "_meta": {"count": 0}
        })))
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let result = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.columns("tables/inventory/sites")
    })
    .await;

    assert!(matches!(
        result.unwrap_err().downcast_ref::<IpfError>(),
        Some(IpfError::Protocol(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_column_discovery_unexpected_message_is_protocol_violation() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tables/inventory/sites"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{"message": "snapshot is required"}]
        })))
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let result = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.columns("tables/inventory/sites")
    })
    .await;

    assert!(matches!(
        result.unwrap_err().downcast_ref::<IpfError>(),
        Some(IpfError::Protocol(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_column_discovery_without_error_message_is_protocol_violation() {
    for response in [
        ResponseTemplate::new(422).set_body_json(json!({"errors": []})),
        ResponseTemplate::new(422).set_body_string("<html>Unprocessable</html>"),
    ] {
        let server = MockServer::start().await;
        common::mount_session(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tables/inventory/sites"))
            .respond_with(response)
            .expect(1)
            .mount(&server)
            .await;

        let config = common::config_for(&server.uri());
        let result = common::blocking(move || {
            let client = IpfClient::connect(&config)?;
            client.columns("tables/inventory/sites")
        })
        .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<IpfError>(),
            Some(IpfError::Protocol(_))
        ));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_column_discovery_server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tables/inventory/sites"))
        .and(body_partial_json(json!({"columns": ["*"]})))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let result = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        client.fetch_all("tables/inventory/sites", &FetchOptions::new())
    })
    .await;

    let err = result.expect_err("discovery fails");
    match err.downcast_ref::<IpfError>() {
        Some(IpfError::Status { status, body, .. }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "db down");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_rejects_out_of_range_limits_before_posting() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let results = common::blocking(move || {
        let client = IpfClient::connect(&config).expect("connect");
        vec![
            client.fetch(TABLE, &FetchOptions::new().columns(["id"]).limit(0)),
            client.fetch(TABLE, &FetchOptions::new().columns(["id"]).limit(10_001)),
            client.fetch_all(TABLE, &FetchOptions::new().columns(["id"]).limit(10_001)),
            client.fetch_all(TABLE, &FetchOptions::new().limit(0)),
        ]
    })
    .await;

    for result in results {
        assert!(matches!(
            result.unwrap_err().downcast_ref::<IpfError>(),
            Some(IpfError::InvalidArgument(_))
        ));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_inventory_all_discovers_columns_then_pages() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tables/inventory/sites"))
        .and(body_partial_json(json!({"columns": ["*"]})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{"message": "\"columns[0]\" must be one of [id, siteName]"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tables/inventory/sites"))
        .and(body_partial_json(json!({
            "columns": ["id", "siteName"],
            "snapshot": "snap-a",
            "pagination": {"start": 0}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1", "siteName": "L1"}, {"id": "2", "siteName": "L2"}],
            "_meta": {"count": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let (name, rows) = common::blocking(move || {
        let client = IpfClient::connect(&config)?;
        let sites = client.inventory().sites;
        sites.all(None, None).map(|rows| (sites.name().to_string(), rows))
    })
    .await
    .expect("inventory sites");

    assert_eq!(name, "sites");
    assert_eq!(rows[1]["siteName"], "L2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_query_passes_body_through() {
    let server = MockServer::start().await;
    common::mount_session(&server).await;
    let body = json!({
        "columns": ["id", "hostname", "totalVlanCount"],
        "filters": {},
        "pagination": {"limit": 32, "start": 0},
        "snapshot": "snap-a",
        "reports": "/technology/vlans/device-summary"
    });
    Mock::given(method("POST"))
        .and(path("/api/v1/tables/vlan/device-summary"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1119052963", "hostname": "L34AC11", "totalVlanCount": 15}],
            "_meta": {"count": 1}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let text = body.to_string();
    let (from_value, from_text) = common::blocking(move || -> anyhow::Result<(Vec<Row>, Vec<Row>)> {
        let client = IpfClient::connect(&config)?;
        let url = format!("{}/api/v1/tables/vlan/device-summary", config.url.clone().unwrap_or_default());
        let from_value = client.query(&url, QueryBody::Json(body))?;
        let from_text = client.query("tables/vlan/device-summary", QueryBody::Text(text))?;
        Ok((from_value, from_text))
    })
    .await
    .expect("query");

    assert_eq!(from_value, from_text);
    assert_eq!(from_value[0]["totalVlanCount"], Value::from(15));
}
