//! End-to-end export → import round trip against mock servers
//!
//! Exports a datastore (with connection, computed container, and checks)
//! from one deployment into a YAML tree, then applies that tree to a second
//! deployment, verifying secret handling and name/UID-keyed upserts along
//! the way.

use qualibrate::api::{ApiClient, ApiClientConfig};
use qualibrate::export::export_config;
use qualibrate::import::{import_config, ImportOptions};
use qualibrate::secrets::EnvVars;
use qualibrate::types::IncludeSet;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_config(ApiClientConfig::new(server.uri(), "t").max_retries(0)).unwrap()
}

fn page_of(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({"items": items, "total": total, "page": 1, "size": 100})
}

async fn mount_listing(server: &MockServer, endpoint: &str, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(items)))
        .mount(server)
        .await;
}

/// Export fixtures: one datastore with a connection, a catalog table, a
/// computed view on top of it, and a check on each.
async fn start_source_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datastores/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "prod warehouse",
            "type": "jdbc",
            "connection": {
                "id": 7,
                "name": "warehouse",
                "type": "postgresql",
                "host": "db.example.com",
                "password": "hunter2"
            }
        })))
        .mount(&server)
        .await;
    mount_listing(
        &server,
        "/containers",
        vec![
            json!({"id": 10, "name": "orders", "container_type": "table"}),
            json!({
                "id": 11,
                "name": "orders_view",
                "container_type": "computed_table",
                "query": "select * from orders",
                "source_container": {"id": 10, "name": "orders"}
            }),
        ],
    )
    .await;
    mount_listing(
        &server,
        "/quality-checks",
        vec![
            json!({
                "id": 201,
                "rule_type": "notNull",
                "container": {"id": 10, "name": "orders"},
                "fields": [{"name": "order_id"}],
                "description": "order id is mandatory"
            }),
            json!({
                "id": 202,
                "rule_type": "unique",
                "container": {"id": 11, "name": "orders_view"},
                "fields": [{"name": "customer_id"}]
            }),
        ],
    )
    .await;
    server
}

fn read_yaml(root: &Path, rel: &str) -> Value {
    let content = fs::read_to_string(root.join(rel)).unwrap();
    serde_yaml::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    // --- export ---
    let source = start_source_server().await;
    let tree = TempDir::new().unwrap();
    let summary = export_config(&client_for(&source), &[1], tree.path(), IncludeSet::all())
        .await
        .unwrap();

    assert_eq!(summary.connections, 1);
    assert_eq!(summary.datastores, 1);
    assert_eq!(summary.containers, 1);
    assert_eq!(summary.checks, 2);

    let conn = read_yaml(tree.path(), "connections/warehouse.yaml");
    assert_eq!(conn["password"], "${WAREHOUSE_PASSWORD}");
    assert_eq!(conn["host"], "db.example.com");

    let ds = read_yaml(tree.path(), "datastores/prod_warehouse/_datastore.yaml");
    assert_eq!(ds["connection_name"], "warehouse");
    assert!(ds.get("connection").is_none());

    let view = read_yaml(
        tree.path(),
        "datastores/prod_warehouse/containers/orders_view/_container.yaml",
    );
    assert_eq!(view["source_container_name"], "orders");
    assert_eq!(view["datastore_name"], "prod warehouse");

    let check = read_yaml(
        tree.path(),
        "datastores/prod_warehouse/checks/orders/notnull__order_id.yaml",
    );
    assert_eq!(
        check["additional_metadata"]["check_uid"],
        "orders__notnull__order_id"
    );

    // No literal secret anywhere in the tree.
    let conn_text = fs::read_to_string(tree.path().join("connections/warehouse.yaml")).unwrap();
    assert!(!conn_text.contains("hunter2"));

    // --- import into a second deployment ---
    // The target already has the connection, datastore, and containers (a
    // catalog scan created them); checks are absent and get created.
    let target = MockServer::start().await;
    mount_listing(
        &target,
        "/connections",
        vec![json!({"id": 70, "name": "warehouse"})],
    )
    .await;
    mount_listing(
        &target,
        "/datastores",
        vec![json!({"id": 5, "name": "prod warehouse"})],
    )
    .await;
    mount_listing(
        &target,
        "/containers",
        vec![
            json!({"id": 50, "name": "orders", "container_type": "table"}),
            json!({"id": 51, "name": "orders_view", "container_type": "computed_table"}),
        ],
    )
    .await;
    mount_listing(&target, "/quality-checks", vec![]).await;

    Mock::given(method("PUT"))
        .and(path("/connections/70"))
        .and(body_partial_json(json!({"password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 70})))
        .expect(1)
        .mount(&target)
        .await;
    Mock::given(method("PUT"))
        .and(path("/datastores/5"))
        .and(body_partial_json(json!({"connection_id": 70})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&target)
        .await;
    Mock::given(method("PUT"))
        .and(path("/containers/51"))
        .and(body_partial_json(json!({"source_container_id": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 51})))
        .expect(1)
        .mount(&target)
        .await;
    Mock::given(method("POST"))
        .and(path("/quality-checks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 100})))
        .expect(2)
        .mount(&target)
        .await;

    let options = ImportOptions {
        dry_run: false,
        include: IncludeSet::all(),
        env: EnvVars::empty().with("WAREHOUSE_PASSWORD", "s3cret"),
    };
    let summary = import_config(&client_for(&target), tree.path(), &options)
        .await
        .unwrap();

    assert_eq!(summary.connections.updated, 1);
    assert_eq!(summary.datastores.updated, 1);
    assert_eq!(summary.containers.updated, 1);
    assert_eq!(summary.checks.created, 2);
    assert_eq!(summary.total_failed(), 0);
    let errors: Vec<&String> = summary.all_errors().collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[tokio::test]
async fn test_import_missing_directory_is_setup_error() {
    let server = MockServer::start().await;
    let result = import_config(
        &client_for(&server),
        Path::new("/nonexistent/qualibrate-tree"),
        &ImportOptions::default(),
    )
    .await;
    assert!(result.is_err());
}
