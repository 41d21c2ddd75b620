//! Export orchestrator
//!
//! Walks the requested datastores and writes the portable configuration
//! tree. Safe to re-run against an unchanged server with zero file
//! modifications thanks to the idempotent writer.

use super::checks::export_checks_to_directory;
use crate::api::{resources, ApiClient};
use crate::error::Result;
use crate::identity::slugify;
use crate::portable::{
    strip_connection_for_export, strip_container_for_export, strip_datastore_for_export,
};
use crate::portable::fields::is_computed_container_type;
use crate::tree::layout;
use crate::tree::write_yaml;
use crate::types::{ExportSummary, IncludeSet, ResourceKind};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Export connections, datastores, computed containers, and quality checks
/// for the given datastore ids into a folder tree under `output_dir`
///
/// Datastores are processed in input order. A connection referenced by
/// several datastores is written exactly once; the dedup set is scoped to
/// the whole run. `include` restricts which resource kinds are written.
pub async fn export_config(
    client: &ApiClient,
    datastore_ids: &[i64],
    output_dir: &Path,
    include: IncludeSet,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();
    let mut seen_connections: HashSet<String> = HashSet::new();

    for &ds_id in datastore_ids {
        let ds = resources::get_datastore(client, ds_id).await?;
        let ds_name = resources::name_of(&ds)
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("datastore_{ds_id}"));
        info!("exporting datastore '{ds_name}' (id {ds_id})");

        if include.contains(ResourceKind::Connections) {
            summary.connections +=
                export_datastore_connections(output_dir, &ds, &mut seen_connections)?;
        }

        if include.contains(ResourceKind::Datastores) {
            let portable = strip_datastore_for_export(&ds);
            write_yaml(&layout::datastore_path(output_dir, &ds_name), &portable)?;
            summary.datastores += 1;
        }

        if include.contains(ResourceKind::Containers) {
            summary.containers +=
                export_computed_containers(client, output_dir, ds_id, &ds_name).await?;
        }

        if include.contains(ResourceKind::Checks) {
            let checks = resources::list_all_quality_checks(client, ds_id).await?;
            if !checks.is_empty() {
                let checks_dir = layout::checks_dir(output_dir, &ds_name);
                summary.checks += export_checks_to_directory(&checks, &checks_dir)?;
            }
        }
    }

    Ok(summary)
}

/// Write the datastore's connection (and its enrichment datastore's
/// connection) unless already written in this run
fn export_datastore_connections(
    output_dir: &Path,
    ds: &Value,
    seen: &mut HashSet<String>,
) -> Result<usize> {
    let mut written = 0;
    let enrichment_conn = ds
        .get("enrichment_datastore")
        .and_then(|e| e.get("connection"));
    for conn in [ds.get("connection"), enrichment_conn].into_iter().flatten() {
        if !conn.is_object() {
            continue;
        }
        let Some(name) = resources::name_of(conn).filter(|n| !n.is_empty()) else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            debug!("connection '{name}' already exported in this run");
            continue;
        }
        let portable = strip_connection_for_export(conn);
        write_yaml(&layout::connection_path(output_dir, name), &portable)?;
        written += 1;
    }
    Ok(written)
}

/// Write every computed container of the datastore; catalog-discovered
/// container types are skipped
async fn export_computed_containers(
    client: &ApiClient,
    output_dir: &Path,
    ds_id: i64,
    ds_name: &str,
) -> Result<usize> {
    let containers = resources::list_all_containers(client, ds_id).await?;
    let mut written = 0;
    for container in &containers {
        let container_type = container
            .get("container_type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !is_computed_container_type(container_type) {
            continue;
        }
        let slug = match resources::name_of(container).filter(|n| !n.is_empty()) {
            Some(name) => slugify(name),
            None => format!(
                "container_{}",
                resources::id_of(container).unwrap_or_default()
            ),
        };
        let portable = strip_container_for_export(container, ds_name);
        write_yaml(&layout::container_path(output_dir, ds_name, &slug), &portable)?;
        written += 1;
    }
    Ok(written)
}
