//! Tests for the export orchestrator and check file writer

use super::*;
use crate::api::{ApiClient, ApiClientConfig};
use crate::tree::layout::{NO_CONTAINER_DIR, UID_KEY};
use crate::types::{IncludeSet, ResourceKind};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_config(ApiClientConfig::new(server.uri(), "t").max_retries(0)).unwrap()
}

fn empty_page() -> Value {
    json!({"items": [], "total": 0, "page": 1, "size": 100})
}

async fn mount_datastore(server: &MockServer, id: i64, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/datastores/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_empty_listings(server: &MockServer, ds_id: i64) {
    for endpoint in ["/containers", "/quality-checks"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("datastore", ds_id.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
            .mount(server)
            .await;
    }
}

fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<String>) {
    if !dir.is_dir() {
        return;
    }
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            out.push(path.strip_prefix(root).unwrap().to_string_lossy().to_string());
        }
    }
}

// ============================================================================
// Check file writer
// ============================================================================

#[test]
fn test_filename_dedup_suffixes() {
    let dir = TempDir::new().unwrap();
    let check = json!({
        "rule_type": "notNull",
        "container": {"name": "users"},
        "fields": [{"name": "email"}]
    });
    let checks = vec![check.clone(), check.clone(), check];

    let exported = export_checks_to_directory(&checks, dir.path()).unwrap();
    assert_eq!(exported, 3);
    assert_eq!(
        list_files(dir.path()),
        vec![
            "users/notnull__email.yaml",
            "users/notnull__email_2.yaml",
            "users/notnull__email_3.yaml"
        ]
    );
}

#[test]
fn test_checks_without_container_use_fallback_dir() {
    let dir = TempDir::new().unwrap();
    let checks = vec![json!({"rule_type": "volumetric"})];

    export_checks_to_directory(&checks, dir.path()).unwrap();
    assert_eq!(
        list_files(dir.path()),
        vec![format!("{NO_CONTAINER_DIR}/volumetric.yaml")]
    );
}

#[test]
fn test_exported_check_carries_uid() {
    let dir = TempDir::new().unwrap();
    let checks = vec![json!({
        "rule_type": "notNull",
        "container": {"name": "orders"},
        "fields": [{"name": "order_id"}]
    })];

    export_checks_to_directory(&checks, dir.path()).unwrap();
    let content = fs::read_to_string(dir.path().join("orders/notnull__order_id.yaml")).unwrap();
    let loaded: Value = serde_yaml::from_str(&content).unwrap();
    assert_eq!(loaded["rule_type"], "notNull");
    assert_eq!(loaded["container"], "orders");
    assert_eq!(loaded["fields"], json!(["order_id"]));
    assert_eq!(
        loaded["additional_metadata"][UID_KEY],
        "orders__notnull__order_id"
    );
}

// ============================================================================
// Export orchestrator
// ============================================================================

#[tokio::test]
async fn test_connection_dedup_across_datastores() {
    let server = MockServer::start().await;
    let shared_conn = json!({"id": 7, "name": "shared-conn", "type": "postgresql", "password": "x"});
    mount_datastore(
        &server,
        1,
        json!({"id": 1, "name": "ds one", "connection": shared_conn}),
    )
    .await;
    mount_datastore(
        &server,
        2,
        json!({"id": 2, "name": "ds two", "connection": shared_conn}),
    )
    .await;
    mount_empty_listings(&server, 1).await;
    mount_empty_listings(&server, 2).await;

    let out = TempDir::new().unwrap();
    let client = client_for(&server);
    let summary = export_config(&client, &[1, 2], out.path(), IncludeSet::all())
        .await
        .unwrap();

    assert_eq!(summary.connections, 1);
    assert_eq!(summary.datastores, 2);
    let files = list_files(out.path());
    assert!(files.contains(&"connections/shared_conn.yaml".to_string()));
    assert_eq!(files.iter().filter(|f| f.starts_with("connections/")).count(), 1);
}

#[tokio::test]
async fn test_enrichment_connection_exported() {
    let server = MockServer::start().await;
    mount_datastore(
        &server,
        1,
        json!({
            "id": 1,
            "name": "main",
            "connection": {"id": 7, "name": "main-conn"},
            "enrichment_datastore": {
                "id": 2,
                "name": "enrich",
                "connection": {"id": 8, "name": "enrich-conn"}
            }
        }),
    )
    .await;
    mount_empty_listings(&server, 1).await;

    let out = TempDir::new().unwrap();
    let client = client_for(&server);
    let summary = export_config(&client, &[1], out.path(), IncludeSet::all())
        .await
        .unwrap();

    assert_eq!(summary.connections, 2);
    let files = list_files(out.path());
    assert!(files.contains(&"connections/main_conn.yaml".to_string()));
    assert!(files.contains(&"connections/enrich_conn.yaml".to_string()));
}

#[tokio::test]
async fn test_include_filtering_writes_only_connections() {
    let server = MockServer::start().await;
    mount_datastore(
        &server,
        1,
        json!({"id": 1, "name": "ds", "connection": {"id": 7, "name": "conn"}}),
    )
    .await;
    // No container/check listing mounts: excluded stages must not call them.

    let out = TempDir::new().unwrap();
    let client = client_for(&server);
    let include = IncludeSet::only(&[ResourceKind::Connections]);
    let summary = export_config(&client, &[1], out.path(), include).await.unwrap();

    assert_eq!(summary.connections, 1);
    assert_eq!(summary.datastores, 0);
    assert_eq!(summary.containers, 0);
    assert_eq!(summary.checks, 0);
    assert!(!out.path().join("datastores").exists());
}

#[tokio::test]
async fn test_computed_containers_only() {
    let server = MockServer::start().await;
    mount_datastore(&server, 1, json!({"id": 1, "name": "ds"})).await;
    Mock::given(method("GET"))
        .and(path("/containers"))
        .and(query_param("datastore", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 10, "name": "orders", "container_type": "table"},
                {"id": 11, "name": "orders_view", "container_type": "computed_table",
                 "query": "select 1"},
            ],
            "total": 2, "page": 1, "size": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/quality-checks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let client = client_for(&server);
    let summary = export_config(&client, &[1], out.path(), IncludeSet::all())
        .await
        .unwrap();

    assert_eq!(summary.containers, 1);
    let files = list_files(out.path());
    assert!(files.contains(&"datastores/ds/containers/orders_view/_container.yaml".to_string()));
    assert!(!files.iter().any(|f| f.contains("containers/orders/")));
}

#[tokio::test]
async fn test_re_export_is_idempotent() {
    let server = MockServer::start().await;
    mount_datastore(
        &server,
        1,
        json!({"id": 1, "name": "ds", "connection": {"id": 7, "name": "conn", "password": "x"}}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/containers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/quality-checks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1, "rule_type": "notNull",
                       "container": {"name": "orders"},
                       "fields": [{"name": "order_id"}]}],
            "total": 1, "page": 1, "size": 100
        })))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let client = client_for(&server);
    export_config(&client, &[1], out.path(), IncludeSet::all())
        .await
        .unwrap();

    let snapshot: Vec<(String, String, std::time::SystemTime)> = list_files(out.path())
        .into_iter()
        .map(|f| {
            let full = out.path().join(&f);
            let content = fs::read_to_string(&full).unwrap();
            let mtime = fs::metadata(&full).unwrap().modified().unwrap();
            (f, content, mtime)
        })
        .collect();

    export_config(&client, &[1], out.path(), IncludeSet::all())
        .await
        .unwrap();

    for (f, content, mtime) in snapshot {
        let full = out.path().join(&f);
        assert_eq!(fs::read_to_string(&full).unwrap(), content, "{f} changed");
        assert_eq!(
            fs::metadata(&full).unwrap().modified().unwrap(),
            mtime,
            "{f} was rewritten"
        );
    }
}
