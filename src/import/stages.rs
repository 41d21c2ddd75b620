//! Per-resource import stages: connections, datastores, containers
//!
//! Every stage upserts by name (update when an object with the same name
//! exists, create otherwise) and records per-entity failures without
//! aborting the batch. Dry runs perform the existence lookups but never
//! call a mutating endpoint.

use crate::api::{resources, ApiClient};
use crate::error::Result;
use crate::portable::fields::is_computed_container_type;
use crate::portable::{
    prepare_container_payload, prepare_datastore_payload, resolve_connection_secrets,
    strip_create_only_fields,
};
use crate::secrets::EnvVars;
use crate::tree::layout::{CONTAINER_FILE, DATASTORE_FILE};
use crate::types::StageSummary;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parse a YAML file into a JSON object value
fn load_yaml_object(path: &Path) -> Result<Option<Value>> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_yaml::from_str(&content)?;
    Ok(parsed.is_object().then_some(parsed))
}

/// Sorted `*.yaml` files directly under `dir`
fn sorted_yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "yaml" || ext == "yml"))
        .collect();
    files.sort();
    Ok(files)
}

/// Sorted subdirectories of `dir`
pub fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Connections
// ============================================================================

/// Import every connection YAML under `connections_dir`
///
/// Secret placeholders are resolved from `env` before any payload is sent;
/// an unresolved placeholder fails that one connection, never the batch.
pub async fn import_connections(
    client: &ApiClient,
    connections_dir: &Path,
    dry_run: bool,
    env: &EnvVars,
) -> StageSummary {
    let mut summary = StageSummary::new();
    if !connections_dir.is_dir() {
        return summary;
    }
    let files = match sorted_yaml_files(connections_dir) {
        Ok(files) => files,
        Err(e) => {
            summary.record_error(format!("Failed to read {}: {e}", connections_dir.display()));
            return summary;
        }
    };

    for file in files {
        let label = file_label(&file);
        if let Err(e) = import_one_connection(client, &file, dry_run, env, &mut summary).await {
            summary.record_failure(format!("{label}: {e}"));
        }
    }
    summary
}

async fn import_one_connection(
    client: &ApiClient,
    file: &Path,
    dry_run: bool,
    env: &EnvVars,
    summary: &mut StageSummary,
) -> Result<()> {
    let label = file_label(file);
    let Some(data) = load_yaml_object(file)? else {
        summary.record_failure(format!("Skipped {label}: not a YAML mapping"));
        return Ok(());
    };
    let Some(name) = data.get("name").and_then(Value::as_str).map(ToString::to_string) else {
        summary.record_failure(format!("Skipped {label}: no 'name' field"));
        return Ok(());
    };

    if dry_run {
        let existing = resources::get_connection_by_name(client, &name).await?;
        if existing.is_some() {
            summary.updated += 1;
        } else {
            summary.created += 1;
        }
        return Ok(());
    }

    let resolved = match resolve_connection_secrets(&data, env) {
        Ok(resolved) => resolved,
        Err(e) => {
            summary.record_failure(format!("{label}: {e}"));
            return Ok(());
        }
    };

    match resources::get_connection_by_name(client, &name).await? {
        Some(existing) => {
            let id = resources::id_of(&existing)
                .ok_or_else(|| crate::error::Error::other("connection listing item has no id"))?;
            resources::update_connection(client, id, &resolved).await?;
            summary.updated += 1;
            debug!("updated connection '{name}'");
        }
        None => {
            resources::create_connection(client, &resolved).await?;
            summary.created += 1;
            debug!("created connection '{name}'");
        }
    }
    Ok(())
}

// ============================================================================
// Datastores
// ============================================================================

/// Outcome of importing one datastore directory
#[derive(Debug, Default)]
pub struct DatastoreImport {
    /// Counters and errors for this datastore
    pub summary: StageSummary,
    /// Resolved or created datastore id; needed by the container and check
    /// stages even when this stage itself is a dry run
    pub datastore_id: Option<i64>,
}

/// Import `<ds_dir>/_datastore.yaml`, upserting by name
pub async fn import_datastore(client: &ApiClient, ds_dir: &Path, dry_run: bool) -> DatastoreImport {
    let mut result = DatastoreImport::default();
    let ds_file = ds_dir.join(DATASTORE_FILE);
    if !ds_file.exists() {
        return result;
    }
    let label = file_label(ds_dir);
    if let Err(e) = import_one_datastore(client, &ds_file, dry_run, &mut result).await {
        result.summary.record_failure(format!("{label}: {e}"));
    }
    result
}

async fn import_one_datastore(
    client: &ApiClient,
    ds_file: &Path,
    dry_run: bool,
    result: &mut DatastoreImport,
) -> Result<()> {
    let Some(data) = load_yaml_object(ds_file)? else {
        result
            .summary
            .record_failure(format!("Skipped {}: not a YAML mapping", ds_file.display()));
        return Ok(());
    };
    let Some(ds_name) = data.get("name").and_then(Value::as_str).map(ToString::to_string) else {
        result
            .summary
            .record_failure(format!("Skipped {}: no 'name' field", ds_file.display()));
        return Ok(());
    };

    let (mut payload, connection_name, enrichment_name) = prepare_datastore_payload(&data);

    // Resolve connection_name -> connection_id unless the file pins an id.
    if let Some(conn_name) = connection_name {
        if payload.get("connection_id").is_none() {
            match resources::get_connection_by_name(client, &conn_name).await? {
                Some(conn) => {
                    let conn_id = resources::id_of(&conn).ok_or_else(|| {
                        crate::error::Error::other("connection listing item has no id")
                    })?;
                    if let Some(map) = payload.as_object_mut() {
                        map.insert("connection_id".to_string(), Value::from(conn_id));
                    }
                }
                None => {
                    result.summary.record_failure(format!(
                        "Connection '{conn_name}' not found for datastore '{ds_name}'"
                    ));
                    return Ok(());
                }
            }
        }
    }

    if dry_run {
        let existing = resources::get_datastore_by_name(client, &ds_name).await?;
        match existing {
            Some(existing) => {
                result.summary.updated += 1;
                result.datastore_id = resources::id_of(&existing);
            }
            None => result.summary.created += 1,
        }
        return Ok(());
    }

    let ds_id = match resources::get_datastore_by_name(client, &ds_name).await? {
        Some(existing) => {
            let id = resources::id_of(&existing)
                .ok_or_else(|| crate::error::Error::other("datastore listing item has no id"))?;
            strip_create_only_fields(&mut payload);
            resources::update_datastore(client, id, &payload).await?;
            result.summary.updated += 1;
            info!("updated datastore '{ds_name}' (id {id})");
            id
        }
        None => {
            let created = resources::create_datastore(client, &payload).await?;
            let id = resources::id_of(&created)
                .ok_or_else(|| crate::error::Error::other("create datastore returned no id"))?;
            result.summary.created += 1;
            info!("created datastore '{ds_name}' (id {id})");
            id
        }
    };
    result.datastore_id = Some(ds_id);

    // Best-effort enrichment link; the datastore itself already succeeded.
    if let Some(enrichment) = enrichment_name {
        match resources::get_datastore_by_name(client, &enrichment).await {
            Ok(Some(enr_ds)) => {
                if let Some(enr_id) = resources::id_of(&enr_ds) {
                    if let Err(e) = resources::connect_enrichment(client, ds_id, enr_id).await {
                        result
                            .summary
                            .record_error(format!("Failed to link enrichment '{enrichment}': {e}"));
                    }
                }
            }
            Ok(None) => {
                result
                    .summary
                    .record_error(format!("Enrichment datastore '{enrichment}' not found"));
            }
            Err(e) => {
                result
                    .summary
                    .record_error(format!("Failed to link enrichment '{enrichment}': {e}"));
            }
        }
    }
    Ok(())
}

/// Resolve a datastore directory to a live id by a read-only name lookup
///
/// Used when the datastores stage is excluded but containers or checks
/// still need the id of an already-existing datastore.
pub async fn resolve_datastore_id(client: &ApiClient, ds_dir: &Path) -> Result<Option<i64>> {
    let ds_file = ds_dir.join(DATASTORE_FILE);
    if !ds_file.exists() {
        return Ok(None);
    }
    let Some(data) = load_yaml_object(&ds_file)? else {
        return Ok(None);
    };
    let Some(name) = data.get("name").and_then(Value::as_str) else {
        return Ok(None);
    };
    let existing = resources::get_datastore_by_name(client, name).await?;
    Ok(existing.as_ref().and_then(resources::id_of))
}

// ============================================================================
// Containers
// ============================================================================

/// Import every `containers/<name>/_container.yaml` under `ds_dir`
pub async fn import_containers(
    client: &ApiClient,
    ds_dir: &Path,
    datastore_id: i64,
    dry_run: bool,
) -> StageSummary {
    let mut summary = StageSummary::new();
    let containers_dir = ds_dir.join(crate::tree::layout::CONTAINERS_DIR);
    if !containers_dir.is_dir() {
        return summary;
    }
    let dirs = match sorted_subdirs(&containers_dir) {
        Ok(dirs) => dirs,
        Err(e) => {
            summary.record_error(format!("Failed to read {}: {e}", containers_dir.display()));
            return summary;
        }
    };

    for container_dir in dirs {
        let yaml_file = container_dir.join(CONTAINER_FILE);
        if !yaml_file.exists() {
            continue;
        }
        let label = file_label(&container_dir);
        if let Err(e) =
            import_one_container(client, &yaml_file, datastore_id, dry_run, &mut summary).await
        {
            summary.record_failure(format!("{label}: {e}"));
        }
    }
    summary
}

async fn import_one_container(
    client: &ApiClient,
    yaml_file: &Path,
    datastore_id: i64,
    dry_run: bool,
    summary: &mut StageSummary,
) -> Result<()> {
    let label = file_label(yaml_file.parent().unwrap_or(yaml_file));
    let Some(data) = load_yaml_object(yaml_file)? else {
        summary.record_failure(format!("Skipped {label}: not a YAML mapping"));
        return Ok(());
    };
    let Some(name) = data.get("name").and_then(Value::as_str).map(ToString::to_string) else {
        summary.record_failure(format!("Skipped {label}: no 'name' field"));
        return Ok(());
    };

    let container_type = data
        .get("container_type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !is_computed_container_type(container_type) {
        // Exported trees never contain these, but a hand-edited file must
        // not crash the import.
        warn!("skipping container '{name}': type '{container_type}' is not computed");
        return Ok(());
    }

    let (mut payload, refs) = prepare_container_payload(&data);
    for container_ref in refs {
        match resources::get_container_by_name(client, datastore_id, &container_ref.name).await? {
            Some(referenced) => {
                let referenced_id = resources::id_of(&referenced).ok_or_else(|| {
                    crate::error::Error::other("container listing item has no id")
                })?;
                if let Some(map) = payload.as_object_mut() {
                    map.insert(container_ref.id_key, Value::from(referenced_id));
                }
            }
            None => {
                summary.record_failure(format!(
                    "{label}: referenced container '{}' not found in datastore",
                    container_ref.name
                ));
                return Ok(());
            }
        }
    }

    if dry_run {
        let existing = resources::get_container_by_name(client, datastore_id, &name).await?;
        if existing.is_some() {
            summary.updated += 1;
        } else {
            summary.created += 1;
        }
        return Ok(());
    }

    match resources::get_container_by_name(client, datastore_id, &name).await? {
        Some(existing) => {
            let id = resources::id_of(&existing)
                .ok_or_else(|| crate::error::Error::other("container listing item has no id"))?;
            resources::update_container(client, id, &payload).await?;
            summary.updated += 1;
            debug!("updated container '{name}'");
        }
        None => {
            if let Some(map) = payload.as_object_mut() {
                map.insert("datastore_id".to_string(), Value::from(datastore_id));
            }
            resources::create_container(client, &payload).await?;
            summary.created += 1;
            debug!("created container '{name}'");
        }
    }
    Ok(())
}
