//! Portable dict → server payload preparation
//!
//! The pure half of import-side resolution: secret placeholder expansion
//! and payload shaping. Name→id lookups need the API client and live in the
//! import stages; these functions tell the stages which references to
//! resolve.

use super::fields::{CONNECTION_SENSITIVE_FIELDS, DATASTORE_CREATE_ONLY_FIELDS};
use crate::error::Result;
use crate::identity::generate_check_uid;
use crate::secrets::{resolve_placeholders, EnvVars};
use crate::tree::layout::{SOURCE_FILE_KEY, UID_KEY};
use serde_json::{Map, Value};

/// Resolve `${ENV_VAR}` placeholders in a connection's sensitive fields
///
/// Returns a copy with resolved values; fails on any unresolved variable so
/// a placeholder is never sent to the server as literal text.
pub fn resolve_connection_secrets(portable: &Value, env: &EnvVars) -> Result<Value> {
    let mut resolved = portable.clone();
    if let Some(map) = resolved.as_object_mut() {
        for field in CONNECTION_SENSITIVE_FIELDS {
            if let Some(Value::String(value)) = map.get(*field) {
                let expanded = resolve_placeholders(value, env)?;
                map.insert((*field).to_string(), Value::String(expanded));
            }
        }
    }
    Ok(resolved)
}

/// A container name reference awaiting resolution to an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
    /// Payload key to store the resolved id under (e.g. `source_container_id`)
    pub id_key: String,
    /// Referenced container name
    pub name: String,
}

/// Shape a loaded datastore dict into an API payload
///
/// Removes the `connection_name` / `enrichment_datastore_name` references
/// and returns them for the caller to resolve against the live API.
pub fn prepare_datastore_payload(data: &Value) -> (Value, Option<String>, Option<String>) {
    let mut payload = data.clone();
    let (connection_name, enrichment_name) = match payload.as_object_mut() {
        Some(map) => (
            take_string(map, "connection_name"),
            take_string(map, "enrichment_datastore_name"),
        ),
        None => (None, None),
    };
    (payload, connection_name, enrichment_name)
}

/// Drop datastore fields only valid at creation time (before an update)
pub fn strip_create_only_fields(payload: &mut Value) {
    if let Some(map) = payload.as_object_mut() {
        for field in DATASTORE_CREATE_ONLY_FIELDS {
            map.remove(*field);
        }
    }
}

/// Shape a loaded container dict into an API payload
///
/// Removes the export-only `datastore_name` and pops each
/// `*_container_name` reference, returning the refs for the caller to
/// resolve to ids. A reference is skipped when the corresponding id is
/// already present in the payload.
pub fn prepare_container_payload(data: &Value) -> (Value, Vec<ContainerRef>) {
    let mut payload = data.clone();
    let mut refs = Vec::new();
    if let Some(map) = payload.as_object_mut() {
        map.remove("datastore_name");
        for base in ["source_container", "left_container", "right_container"] {
            let name_key = format!("{base}_name");
            let id_key = format!("{base}_id");
            if let Some(name) = take_string(map, &name_key) {
                if !name.is_empty() && !map.contains_key(&id_key) {
                    refs.push(ContainerRef { id_key, name });
                }
            }
        }
    }
    (payload, refs)
}

/// Shape a loaded check dict into an API payload
///
/// Replaces the `container` name reference with the resolved id, strips the
/// loader's provenance key, and pins the UID into `additional_metadata`.
pub fn prepare_check_payload(check: &Value, container_id: i64, uid: &str) -> Value {
    let mut payload = check.clone();
    if let Some(map) = payload.as_object_mut() {
        map.remove("container");
        map.remove(SOURCE_FILE_KEY);
        map.insert("container_id".to_string(), Value::from(container_id));

        let mut metadata = match map.remove("additional_metadata") {
            Some(Value::Object(existing)) => existing,
            _ => Map::new(),
        };
        metadata.insert(UID_KEY.to_string(), Value::String(uid.to_string()));
        map.insert("additional_metadata".to_string(), Value::Object(metadata));
    }
    payload
}

/// The UID recorded inside a check's `additional_metadata`, if any
pub fn check_uid_of(check: &Value) -> Option<String> {
    check
        .get("additional_metadata")?
        .get(UID_KEY)?
        .as_str()
        .map(ToString::to_string)
}

/// The container name a portable check record references (may be empty)
pub fn check_container_name(check: &Value) -> String {
    check
        .get("container")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Compute a portable check record's UID from its identity triple
///
/// Used at import time for records that predate UID stamping.
pub fn derive_check_uid(check: &Value) -> String {
    let container = check_container_name(check);
    let rule_type = check
        .get("rule_type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let fields: Vec<String> = check
        .get("fields")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|f| f.as_str().map(ToString::to_string))
                .collect()
        })
        .unwrap_or_default();
    generate_check_uid(&container, rule_type, &fields)
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}
