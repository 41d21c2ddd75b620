//! Import orchestrator
//!
//! Applies a portable configuration tree in dependency order: connections,
//! then per-datastore directory its datastore file, containers, and quality
//! checks. Per-entity failures are recorded in the summary and never abort
//! the run; only setup problems (missing input directory) fail fast.

use super::checks::import_checks_to_datastore;
use super::stages::{
    import_connections, import_containers, import_datastore, resolve_datastore_id, sorted_subdirs,
};
use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::secrets::EnvVars;
use crate::tree::layout::{CHECKS_DIR, CONNECTIONS_DIR, DATASTORES_DIR};
use crate::tree::load_checks_from_directory;
use crate::types::{ImportSummary, IncludeSet, ResourceKind};
use std::path::Path;
use tracing::{info, warn};

/// Options controlling an import run
#[derive(Debug)]
pub struct ImportOptions {
    /// Report what would happen without calling any mutating endpoint
    pub dry_run: bool,
    /// Which resource kinds to apply
    pub include: IncludeSet,
    /// Environment for secret placeholder resolution
    pub env: EnvVars,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            include: IncludeSet::all(),
            env: EnvVars::process(),
        }
    }
}

/// Import a configuration tree rooted at `input_dir`
///
/// Stage order is fixed so references resolve: connections before the
/// datastores that name them, datastores before their containers, and
/// containers before the checks that attach to them. When the datastores
/// stage is excluded, each datastore directory is resolved to a live id by
/// name lookup instead.
pub async fn import_config(
    client: &ApiClient,
    input_dir: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    if !input_dir.is_dir() {
        return Err(Error::config(format!(
            "Input directory does not exist: {}",
            input_dir.display()
        )));
    }
    let mut summary = ImportSummary::default();

    if options.include.contains(ResourceKind::Connections) {
        let connections_dir = input_dir.join(CONNECTIONS_DIR);
        summary.connections = import_connections(
            client,
            &connections_dir,
            options.dry_run,
            &options.env,
        )
        .await;
    }

    let datastores_dir = input_dir.join(DATASTORES_DIR);
    if !datastores_dir.is_dir() {
        return Ok(summary);
    }

    for ds_dir in sorted_subdirs(&datastores_dir)? {
        let dir_name = ds_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| ds_dir.display().to_string());
        info!("importing datastore directory '{dir_name}'");

        let datastore_id = if options.include.contains(ResourceKind::Datastores) {
            let result = import_datastore(client, &ds_dir, options.dry_run).await;
            summary.datastores.merge(result.summary);
            result.datastore_id
        } else {
            match resolve_datastore_id(client, &ds_dir).await {
                Ok(id) => id,
                Err(e) => {
                    summary
                        .datastores
                        .record_error(format!("Failed to look up datastore for '{dir_name}': {e}"));
                    None
                }
            }
        };

        let Some(datastore_id) = datastore_id else {
            // A dry run that would create the datastore has no id to hang
            // containers or checks on; anything else is a real problem.
            let message = format!("Could not resolve datastore ID for '{dir_name}'");
            if options.dry_run {
                warn!("{message}; skipping containers and checks");
            } else {
                summary.datastores.record_error(message);
            }
            continue;
        };

        if options.include.contains(ResourceKind::Containers) {
            summary
                .containers
                .merge(import_containers(client, &ds_dir, datastore_id, options.dry_run).await);
        }

        if options.include.contains(ResourceKind::Checks) {
            let checks_dir = ds_dir.join(CHECKS_DIR);
            if checks_dir.is_dir() {
                let checks = load_checks_from_directory(&checks_dir)?;
                summary.checks.merge(
                    import_checks_to_datastore(client, datastore_id, &checks, options.dry_run)
                        .await,
                );
            }
        }
    }

    Ok(summary)
}
