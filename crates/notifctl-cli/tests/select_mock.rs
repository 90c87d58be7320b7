//! End-to-end `notifctl select` runs against a mocked console.

use std::ops::Range;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FACETS_PATH: &str = "/api/notifications/v1.0/notifications/facets/bundles";
const EVENT_TYPES_PATH: &str = "/api/notifications/v1.0/notifications/eventTypes";
const ENDPOINTS_PATH: &str = "/api/integrations/v1.0/endpoints";

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn event_type_json(i: usize) -> Value {
    json!({
        "id": format!("e-{i:03}"),
        "name": format!("event-{i}"),
        "display_name": format!("Event {i}"),
        "application": {"id": "a1", "name": "advisor", "display_name": "Advisor"}
    })
}

fn page_body(range: Range<usize>, count: usize) -> Value {
    json!({
        "data": range.map(event_type_json).collect::<Vec<_>>(),
        "meta": {"count": count},
        "links": {}
    })
}

async fn mock_console() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FACETS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "b-rhel",
            "name": "rhel",
            "displayName": "Red Hat Enterprise Linux",
            "children": [{"id": "a1", "name": "advisor", "displayName": "Advisor"}]
        }])))
        .mount(&server)
        .await;
    server
}

async fn mount_page(server: &MockServer, offset: u64, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(EVENT_TYPES_PATH))
        .and(query_param("offset", offset.to_string()))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn notifctl(server: &MockServer, args: &[&str]) -> assert_cmd::assert::Assert {
    let home = TempDir::new().unwrap();
    let base_url = server.uri();
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    tokio::task::spawn_blocking(move || {
        let assert = cargo_bin_cmd!("notifctl")
            .env("NOTIFCTL_HOME", home.path())
            .env("NOTIFCTL_BASE_URL", base_url)
            .env("NOTIFCTL_TOKEN", "test-token")
            .env_remove("NOTIFCTL_LOG")
            .env_remove("RUST_LOG")
            .args(&args)
            .assert();
        drop(home);
        assert
    })
    .await
    .unwrap()
}

fn selected_ids(stdout: &[u8]) -> Vec<String> {
    let selected: Vec<Value> = serde_json::from_slice(stdout).unwrap();
    selected
        .iter()
        .map(|event| event["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_select_all_walks_every_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_console().await;
    mount_page(&server, 0, ResponseTemplate::new(200).set_body_json(page_body(0..10, 23))).await;
    mount_page(&server, 10, ResponseTemplate::new(200).set_body_json(page_body(10..20, 23))).await;
    mount_page(&server, 20, ResponseTemplate::new(200).set_body_json(page_body(20..23, 23))).await;

    let assert = notifctl(&server, &["select", "--bundle", "rhel", "--command", "all"])
        .await
        .success();

    let ids = selected_ids(&assert.get_output().stdout);
    assert_eq!(ids.len(), 23);
    assert_eq!(ids.first().map(String::as_str), Some("e-000"));
    assert_eq!(ids.last().map(String::as_str), Some("e-022"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_select_page_only_takes_loaded_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_console().await;
    mount_page(&server, 10, ResponseTemplate::new(200).set_body_json(page_body(10..20, 23))).await;

    let assert = notifctl(
        &server,
        &["select", "-b", "rhel", "-c", "page", "--page", "2", "--toggle", "e-015"],
    )
    .await
    .success();

    let ids = selected_ids(&assert.get_output().stdout);
    assert_eq!(ids.len(), 9);
    assert!(ids.iter().all(|id| id.as_str() >= "e-010" && id.as_str() < "e-020"));
    assert!(!ids.contains(&"e-015".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_select_all_keeps_pages_fetched_before_failure() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_console().await;
    mount_page(&server, 0, ResponseTemplate::new(200).set_body_json(page_body(0..10, 23))).await;
    mount_page(&server, 10, ResponseTemplate::new(500).set_body_string("boom")).await;
    mount_page(&server, 20, ResponseTemplate::new(200).set_body_json(page_body(20..23, 23))).await;

    let assert = notifctl(&server, &["select", "-b", "rhel", "-c", "all"])
        .await
        .success()
        .stderr(predicate::str::contains("stopped at page 2"));

    let ids = selected_ids(&assert.get_output().stdout);
    assert_eq!(ids.len(), 10);
    assert!(ids.iter().all(|id| id.as_str() < "e-010"));
}

fn grouped_event_type(id: &str) -> Value {
    json!({"id": id, "display_name": format!("Grouped {id}")})
}

#[tokio::test(flavor = "multi_thread")]
async fn test_select_seeds_endpoint_event_types_of_the_chosen_bundle() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_console().await;
    Mock::given(method("GET"))
        .and(path(format!("{ENDPOINTS_PATH}/ep-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ep-1",
            "event_types_group_by_bundles_and_applications": [
                {
                    "display_name": "Red Hat Enterprise Linux",
                    "applications": [{
                        "display_name": "Advisor",
                        "event_types": [
                            grouped_event_type("e-003"),
                            grouped_event_type("e-100"),
                            grouped_event_type("e-101")
                        ]
                    }]
                },
                {
                    "display_name": "OpenShift",
                    "applications": [{
                        "display_name": "Cluster Manager",
                        "event_types": [grouped_event_type("o-001")]
                    }]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 0, ResponseTemplate::new(200).set_body_json(page_body(0..10, 23))).await;

    let assert = notifctl(
        &server,
        &[
            "select", "-b", "rhel", "-c", "page", "--endpoint", "ep-1", "--toggle", "e-100",
        ],
    )
    .await
    .success();

    let ids = selected_ids(&assert.get_output().stdout);
    assert_eq!(ids.len(), 11);
    assert!(ids.contains(&"e-003".to_string()));
    assert!(ids.contains(&"e-101".to_string()));
    assert!(!ids.contains(&"e-100".to_string()));
    assert!(!ids.contains(&"o-001".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_select_unknown_bundle_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_console().await;

    notifctl(&server, &["select", "-b", "openshift", "-c", "none"])
        .await
        .failure()
        .stderr(predicate::str::contains("Unknown bundle 'openshift'"));
}
