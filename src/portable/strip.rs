//! Server object → portable YAML projections
//!
//! Each strip function takes a server JSON response and produces the
//! name-referenced, secret-free dict that gets written to the export tree.
//! Unknown fields pass through untouched; only the blocklists in `fields`
//! are dropped.

use super::fields::{
    CHECK_INTERNAL_FIELDS, CHECK_LEGACY_METADATA_KEYS, CONNECTION_INTERNAL_FIELDS,
    CONNECTION_SENSITIVE_FIELDS, CONTAINER_ID_REF_FIELDS, CONTAINER_INTERNAL_FIELDS,
    DATASTORE_INTERNAL_FIELDS,
};
use crate::identity::{env_var_placeholder, generate_check_uid};
use crate::tree::layout::UID_KEY;
use serde_json::{Map, Value};

/// The `name` of a nested object, if present
fn nested_name(value: &Value) -> Option<String> {
    value.get("name")?.as_str().map(ToString::to_string)
}

/// Flatten a list of `{name, ...}` objects to their name strings
fn names_of(value: &Value) -> Vec<Value> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(Value::String(s.clone())),
                    other => nested_name(other).map(Value::String),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Convert an API connection response into a portable dict
///
/// Sensitive fields are replaced with `${ENV_VAR}` placeholders derived
/// from the connection name; internal fields are dropped.
pub fn strip_connection_for_export(conn: &Value) -> Value {
    let empty = Map::new();
    let source = conn.as_object().unwrap_or(&empty);
    let conn_name = source
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    let mut portable = Map::new();
    for (key, value) in source {
        if CONNECTION_INTERNAL_FIELDS.contains(&key.as_str()) {
            continue;
        }
        if CONNECTION_SENSITIVE_FIELDS.contains(&key.as_str()) {
            portable.insert(
                key.clone(),
                Value::String(env_var_placeholder(conn_name, key)),
            );
            continue;
        }
        portable.insert(key.clone(), value.clone());
    }
    Value::Object(portable)
}

/// Convert an API datastore response into a portable dict
///
/// The nested `connection` object becomes a `connection_name` reference and
/// the nested `enrichment_datastore` becomes `enrichment_datastore_name`.
pub fn strip_datastore_for_export(ds: &Value) -> Value {
    let empty = Map::new();
    let source = ds.as_object().unwrap_or(&empty);

    let mut portable = Map::new();
    if let Some(name) = source.get("connection").and_then(|c| nested_name(c)) {
        portable.insert("connection_name".to_string(), Value::String(name));
    }
    if let Some(name) = source
        .get("enrichment_datastore")
        .and_then(|e| nested_name(e))
    {
        portable.insert("enrichment_datastore_name".to_string(), Value::String(name));
    }

    for (key, value) in source {
        if DATASTORE_INTERNAL_FIELDS.contains(&key.as_str()) || key == "enrichment_datastore" {
            continue;
        }
        portable.insert(key.clone(), value.clone());
    }
    Value::Object(portable)
}

/// Convert an API container response into a portable dict
///
/// Only called for computed container types. Nested container references
/// become `*_name` fields, raw `*_id` references are dropped, and the
/// owning datastore is recorded by name.
pub fn strip_container_for_export(container: &Value, datastore_name: &str) -> Value {
    let empty = Map::new();
    let source = container.as_object().unwrap_or(&empty);

    let mut portable = Map::new();
    for (key, value) in source {
        if CONTAINER_INTERNAL_FIELDS.contains(&key.as_str())
            || CONTAINER_ID_REF_FIELDS.contains(&key.as_str())
        {
            continue;
        }
        match key.as_str() {
            "source_container" | "left_container" | "right_container" if value.is_object() => {
                let name = nested_name(value).unwrap_or_default();
                portable.insert(format!("{key}_name"), Value::String(name));
            }
            _ => {
                portable.insert(key.clone(), value.clone());
            }
        }
    }
    portable.insert(
        "datastore_name".to_string(),
        Value::String(datastore_name.to_string()),
    );
    Value::Object(portable)
}

/// Convert an API quality check response into a portable dict
///
/// Flattens the nested `container` to its name (empty string when absent),
/// `fields` to a list of field names, and `global_tags` to a `tags` list.
/// The check's stable UID is injected into `additional_metadata` so the
/// record can be upserted idempotently on import.
pub fn strip_check_for_export(check: &Value) -> Value {
    let empty = Map::new();
    let source = check.as_object().unwrap_or(&empty);

    let container_name = source
        .get("container")
        .and_then(|c| nested_name(c))
        .unwrap_or_default();
    let field_values = source.get("fields").map(names_of).unwrap_or_default();
    let field_names: Vec<String> = field_values
        .iter()
        .filter_map(|v| v.as_str().map(ToString::to_string))
        .collect();
    let rule_type = source
        .get("rule_type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let uid = generate_check_uid(&container_name, rule_type, &field_names);

    let mut portable = Map::new();
    for (key, value) in source {
        if CHECK_INTERNAL_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match key.as_str() {
            "container" => {
                portable.insert(key.clone(), Value::String(container_name.clone()));
            }
            "fields" => {
                portable.insert(key.clone(), Value::Array(field_values.clone()));
            }
            "global_tags" => {
                portable.insert("tags".to_string(), Value::Array(names_of(value)));
            }
            "additional_metadata" => {
                portable.insert(
                    key.clone(),
                    portable_metadata(value.as_object().unwrap_or(&empty), &uid),
                );
            }
            _ => {
                portable.insert(key.clone(), value.clone());
            }
        }
    }

    // The identity triple and UID are always present in the export, even
    // when the server omitted the source fields.
    if !portable.contains_key("container") {
        portable.insert("container".to_string(), Value::String(container_name));
    }
    if !portable.contains_key("fields") {
        portable.insert("fields".to_string(), Value::Array(field_values));
    }
    if !portable.contains_key("additional_metadata") {
        portable.insert(
            "additional_metadata".to_string(),
            portable_metadata(&empty, &uid),
        );
    }
    Value::Object(portable)
}

/// User metadata minus legacy tracking keys, with the UID injected
fn portable_metadata(metadata: &Map<String, Value>, uid: &str) -> Value {
    let mut out = Map::new();
    for (key, value) in metadata {
        if CHECK_LEGACY_METADATA_KEYS.contains(&key.as_str()) {
            continue;
        }
        out.insert(key.clone(), value.clone());
    }
    out.insert(UID_KEY.to_string(), Value::String(uid.to_string()));
    Value::Object(out)
}
