//! Config-as-code import
//!
//! Applies a YAML tree produced by export (or hand-written in the same
//! shape) to a live server: name-keyed upsert for connections, datastores,
//! and containers, UID-keyed upsert for quality checks, with record-and-
//! continue error handling throughout.

mod checks;
mod orchestrator;
mod stages;

pub use checks::import_checks_to_datastore;
pub use orchestrator::{import_config, ImportOptions};
