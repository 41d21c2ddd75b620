//! Thin per-resource wrappers over the API client
//!
//! Each function shapes query parameters and forwards to an HTTP verb.
//! Listings are paginated `{items, total, page, size}` envelopes; the
//! `list_all_*` helpers loop until every page is fetched. Name lookups
//! return `Option` — not-found is a normal outcome callers branch on to
//! decide create-vs-update.

use super::client::ApiClient;
use super::types::Page;
use crate::error::Result;
use serde_json::{json, Value};

/// Page size for full listings
const LIST_PAGE_SIZE: u64 = 100;

/// Page size for name-lookup scans
const LOOKUP_PAGE_SIZE: u64 = 50;

/// Numeric id of a server object
pub fn id_of(value: &Value) -> Option<i64> {
    value.get("id").and_then(Value::as_i64)
}

/// Name of a server object
pub fn name_of(value: &Value) -> Option<&str> {
    value.get("name").and_then(Value::as_str)
}

/// Fetch every page of a listing endpoint
async fn list_all(client: &ApiClient, path: &str, base_query: &[(&str, String)]) -> Result<Vec<Value>> {
    let mut all = Vec::new();
    let mut page = 1u64;
    loop {
        let mut query: Vec<(&str, String)> = base_query.to_vec();
        query.push(("page", page.to_string()));
        query.push(("size", LIST_PAGE_SIZE.to_string()));
        let data: Page = client.get_json(path, &query).await?;
        let is_last = data.is_last(page, LIST_PAGE_SIZE);
        all.extend(data.items);
        if is_last {
            break;
        }
        page += 1;
    }
    Ok(all)
}

/// Scan a listing endpoint page by page for an object with the given name
async fn find_by_name(client: &ApiClient, path: &str, name: &str) -> Result<Option<Value>> {
    let mut page = 1u64;
    loop {
        let query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("size", LOOKUP_PAGE_SIZE.to_string()),
        ];
        let data: Page = client.get_json(path, &query).await?;
        let count = data.items.len() as u64;
        for item in data.items {
            if name_of(&item) == Some(name) {
                return Ok(Some(item));
            }
        }
        if count < LOOKUP_PAGE_SIZE {
            return Ok(None);
        }
        page += 1;
    }
}

// ============================================================================
// Connections
// ============================================================================

/// Find a connection by exact name via paginated scan
pub async fn get_connection_by_name(client: &ApiClient, name: &str) -> Result<Option<Value>> {
    find_by_name(client, "connections", name).await
}

/// Create a connection; returns the created object
pub async fn create_connection(client: &ApiClient, payload: &Value) -> Result<Value> {
    client.post_json("connections", payload).await
}

/// Full update of a connection
pub async fn update_connection(client: &ApiClient, id: i64, payload: &Value) -> Result<Value> {
    client.put_json(&format!("connections/{id}"), payload).await
}

// ============================================================================
// Datastores
// ============================================================================

/// Get full detail for a datastore, including its nested connection and
/// optional enrichment datastore
pub async fn get_datastore(client: &ApiClient, id: i64) -> Result<Value> {
    client.get_json(&format!("datastores/{id}"), &[]).await
}

/// Find a datastore by exact name via paginated scan
pub async fn get_datastore_by_name(client: &ApiClient, name: &str) -> Result<Option<Value>> {
    find_by_name(client, "datastores", name).await
}

/// Create a datastore; returns the created object
pub async fn create_datastore(client: &ApiClient, payload: &Value) -> Result<Value> {
    client.post_json("datastores", payload).await
}

/// Full update of a datastore
pub async fn update_datastore(client: &ApiClient, id: i64, payload: &Value) -> Result<Value> {
    client.put_json(&format!("datastores/{id}"), payload).await
}

/// Link an enrichment datastore to a datastore
pub async fn connect_enrichment(
    client: &ApiClient,
    datastore_id: i64,
    enrichment_datastore_id: i64,
) -> Result<Value> {
    client
        .put_json(
            &format!("datastores/{datastore_id}/enrichment"),
            &json!({ "enrichment_datastore_id": enrichment_datastore_id }),
        )
        .await
}

// ============================================================================
// Containers
// ============================================================================

/// Fetch every container of a datastore across all pages
pub async fn list_all_containers(client: &ApiClient, datastore_id: i64) -> Result<Vec<Value>> {
    list_all(
        client,
        "containers",
        &[("datastore", datastore_id.to_string())],
    )
    .await
}

/// Find a container by exact name within a datastore
pub async fn get_container_by_name(
    client: &ApiClient,
    datastore_id: i64,
    name: &str,
) -> Result<Option<Value>> {
    let containers = list_all_containers(client, datastore_id).await?;
    Ok(containers.into_iter().find(|c| name_of(c) == Some(name)))
}

/// Create a container; returns the created object
pub async fn create_container(client: &ApiClient, payload: &Value) -> Result<Value> {
    client.post_json("containers", payload).await
}

/// Full update of a container
pub async fn update_container(client: &ApiClient, id: i64, payload: &Value) -> Result<Value> {
    client.put_json(&format!("containers/{id}"), payload).await
}

// ============================================================================
// Quality checks
// ============================================================================

/// Fetch every quality check of a datastore across all pages
pub async fn list_all_quality_checks(client: &ApiClient, datastore_id: i64) -> Result<Vec<Value>> {
    list_all(
        client,
        "quality-checks",
        &[("datastore", datastore_id.to_string())],
    )
    .await
}

/// Create a quality check; returns the created object
pub async fn create_quality_check(client: &ApiClient, payload: &Value) -> Result<Value> {
    client.post_json("quality-checks", payload).await
}

/// Full update of a quality check
pub async fn update_quality_check(client: &ApiClient, id: i64, payload: &Value) -> Result<Value> {
    client
        .put_json(&format!("quality-checks/{id}"), payload)
        .await
}
