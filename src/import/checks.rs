//! Quality check import: UID-keyed upsert into one datastore
//!
//! Checks carry no stable server id across environments; identity is the
//! UID stamped into `additional_metadata` at export time. The importer
//! builds a UID → id registry from the live datastore once, then decides
//! create-vs-update per check against that registry.

use crate::api::{resources, ApiClient};
use crate::error::Result;
use crate::portable::{check_container_name, check_uid_of, derive_check_uid, prepare_check_payload};
use crate::tree::layout::SOURCE_FILE_KEY;
use crate::types::StageSummary;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Placeholder id registered for checks created during a dry run, so a
/// later in-batch duplicate of the same UID still counts as an update.
const DRY_RUN_ID: i64 = 0;

/// Import portable check records into a datastore, upserting by UID
///
/// Resolves the datastore's container name → id table and UID registry
/// once up front; a failure there fails the whole batch with a single
/// shared error. Individual check failures are recorded and skipped.
pub async fn import_checks_to_datastore(
    client: &ApiClient,
    datastore_id: i64,
    checks: &[Value],
    dry_run: bool,
) -> StageSummary {
    let mut summary = StageSummary::new();
    if checks.is_empty() {
        return summary;
    }

    let (containers, mut registry) = match load_datastore_state(client, datastore_id).await {
        Ok(state) => state,
        Err(e) => {
            summary.failed += checks.len();
            summary
                .errors
                .push(format!("Failed to resolve containers for datastore {datastore_id}: {e}"));
            return summary;
        }
    };
    info!(
        "importing {} checks into datastore {datastore_id} ({} existing UIDs)",
        checks.len(),
        registry.len()
    );

    for check in checks {
        let label = check_label(check);
        let container_name = check_container_name(check);
        let Some(&container_id) = containers.get(&container_name) else {
            summary.record_failure(format!(
                "{label}: container '{container_name}' not found in datastore {datastore_id}"
            ));
            continue;
        };

        let uid = check_uid_of(check).unwrap_or_else(|| derive_check_uid(check));
        let payload = prepare_check_payload(check, container_id, &uid);

        match registry.get(&uid) {
            Some(&existing_id) => {
                if dry_run {
                    summary.updated += 1;
                    continue;
                }
                match resources::update_quality_check(client, existing_id, &payload).await {
                    Ok(_) => {
                        summary.updated += 1;
                        debug!("updated check '{uid}' (id {existing_id})");
                    }
                    Err(e) => summary.record_failure(format!("{label}: {e}")),
                }
            }
            None => {
                if dry_run {
                    summary.created += 1;
                    registry.insert(uid, DRY_RUN_ID);
                    continue;
                }
                match resources::create_quality_check(client, &payload).await {
                    Ok(created) => {
                        summary.created += 1;
                        // Register immediately: a duplicate UID later in
                        // this batch must update, not create twice.
                        let new_id = resources::id_of(&created).unwrap_or(DRY_RUN_ID);
                        debug!("created check '{uid}' (id {new_id})");
                        registry.insert(uid, new_id);
                    }
                    Err(e) => summary.record_failure(format!("{label}: {e}")),
                }
            }
        }
    }
    summary
}

/// Container name → id table and UID → check id registry for a datastore
async fn load_datastore_state(
    client: &ApiClient,
    datastore_id: i64,
) -> Result<(HashMap<String, i64>, HashMap<String, i64>)> {
    let containers = resources::list_all_containers(client, datastore_id)
        .await?
        .into_iter()
        .filter_map(|c| {
            let name = resources::name_of(&c)?.to_string();
            Some((name, resources::id_of(&c)?))
        })
        .collect();

    let registry = resources::list_all_quality_checks(client, datastore_id)
        .await?
        .into_iter()
        .filter_map(|check| {
            let uid = check
                .get("additional_metadata")?
                .get(crate::tree::layout::UID_KEY)?
                .as_str()?
                .to_string();
            Some((uid, resources::id_of(&check)?))
        })
        .collect();

    Ok((containers, registry))
}

/// Human-readable handle for error messages: source file when known,
/// otherwise the identity triple
fn check_label(check: &Value) -> String {
    check
        .get(SOURCE_FILE_KEY)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .unwrap_or_else(|| derive_check_uid(check))
}
