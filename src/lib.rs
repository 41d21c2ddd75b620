//! # Qualibrate
//!
//! Config-as-code tooling for a Qualytics data quality deployment: export
//! connections, datastores, computed containers, and quality checks as a
//! reviewable YAML file tree, and apply such a tree back through the REST
//! API with idempotent, name- and UID-keyed upserts.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qualibrate::api::{ApiClient, ApiClientConfig};
//! use qualibrate::export::export_config;
//! use qualibrate::types::IncludeSet;
//!
//! #[tokio::main]
//! async fn main() -> qualibrate::Result<()> {
//!     let client = ApiClient::with_config(ApiClientConfig::new(
//!         "https://acme.qualytics.io/api",
//!         std::env::var("QUALIBRATE_TOKEN").unwrap(),
//!     ))?;
//!     let summary =
//!         export_config(&client, &[42], "qualytics-config".as_ref(), IncludeSet::all()).await?;
//!     println!("exported {} checks", summary.checks);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types shared across the pipeline
pub mod types;

/// Slug and UID generation
pub mod identity;

/// Environment variable placeholder resolution
pub mod secrets;

/// REST API client and per-resource wrappers
pub mod api;

/// Portable representation: strip for export, prepare for import
pub mod portable;

/// YAML file tree layout, loader, and idempotent writer
pub mod tree;

/// Export orchestration
pub mod export;

/// Import orchestration
pub mod import;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::{ExportSummary, ImportSummary, IncludeSet, ResourceKind, StageSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
