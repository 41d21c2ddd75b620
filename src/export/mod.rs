//! Config-as-code export
//!
//! Maps the server's id-based object graph to a human-editable, name-based
//! YAML file tree. Re-running export against an unchanged server produces
//! zero diff.

mod checks;
mod orchestrator;

pub use checks::export_checks_to_directory;
pub use orchestrator::export_config;

#[cfg(test)]
mod tests;
