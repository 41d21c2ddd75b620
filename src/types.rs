//! Common types shared by the export and import orchestrators

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource kinds handled by the config-as-code pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Connections (credentials to external warehouses)
    Connections,
    /// Datastores
    Datastores,
    /// Computed containers
    Containers,
    /// Quality checks
    Checks,
}

impl ResourceKind {
    /// All resource kinds in dependency order
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Connections,
        ResourceKind::Datastores,
        ResourceKind::Containers,
        ResourceKind::Checks,
    ];

    /// The token used on the CLI and in summaries
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Connections => "connections",
            ResourceKind::Datastores => "datastores",
            ResourceKind::Containers => "containers",
            ResourceKind::Checks => "checks",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "connections" => Ok(ResourceKind::Connections),
            "datastores" => Ok(ResourceKind::Datastores),
            "containers" => Ok(ResourceKind::Containers),
            "checks" => Ok(ResourceKind::Checks),
            other => Err(Error::config(format!(
                "Invalid resource type '{other}'. Valid: checks, connections, containers, datastores"
            ))),
        }
    }
}

/// Which resource kinds an export/import run should touch
///
/// Defaults to all four kinds. Parsed from the CLI `--include` flag as a
/// comma-separated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeSet {
    connections: bool,
    datastores: bool,
    containers: bool,
    checks: bool,
}

impl Default for IncludeSet {
    fn default() -> Self {
        Self::all()
    }
}

impl IncludeSet {
    /// Include every resource kind
    pub fn all() -> Self {
        Self {
            connections: true,
            datastores: true,
            containers: true,
            checks: true,
        }
    }

    /// Include nothing (combine with `with`)
    pub fn none() -> Self {
        Self {
            connections: false,
            datastores: false,
            containers: false,
            checks: false,
        }
    }

    /// Include only the given kinds
    pub fn only(kinds: &[ResourceKind]) -> Self {
        let mut set = Self::none();
        for kind in kinds {
            set = set.with(*kind);
        }
        set
    }

    /// Add a kind to the set
    #[must_use]
    pub fn with(mut self, kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Connections => self.connections = true,
            ResourceKind::Datastores => self.datastores = true,
            ResourceKind::Containers => self.containers = true,
            ResourceKind::Checks => self.checks = true,
        }
        self
    }

    /// Check whether a kind is included
    pub fn contains(self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Connections => self.connections,
            ResourceKind::Datastores => self.datastores,
            ResourceKind::Containers => self.containers,
            ResourceKind::Checks => self.checks,
        }
    }

    /// Parse a comma-separated list of resource kinds, `None` meaning all
    pub fn parse(value: Option<&str>) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::all());
        };
        let mut set = Self::none();
        let mut seen_any = false;
        for token in value.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            set = set.with(token.parse()?);
            seen_any = true;
        }
        if !seen_any {
            return Err(Error::config("--include given but no resource types listed"));
        }
        Ok(set)
    }
}

/// Per-kind counters for an import stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageSummary {
    /// Entities created on the server
    pub created: usize,
    /// Entities updated in place
    pub updated: usize,
    /// Entities skipped because of an error
    pub failed: usize,
    /// Human-readable error strings identifying the offending file or entity
    pub errors: Vec<String>,
}

impl StageSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a per-entity failure
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(message.into());
    }

    /// Record an error that does not fail an entity (e.g. enrichment link)
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Fold another stage summary into this one
    pub fn merge(&mut self, other: StageSummary) {
        self.created += other.created;
        self.updated += other.updated;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }
}

/// Aggregate counts produced by `export_config`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Connection files written (deduplicated by name)
    pub connections: usize,
    /// Datastore files written
    pub datastores: usize,
    /// Computed container files written
    pub containers: usize,
    /// Quality check files written
    pub checks: usize,
}

impl ExportSummary {
    /// Count for a given resource kind
    pub fn count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Connections => self.connections,
            ResourceKind::Datastores => self.datastores,
            ResourceKind::Containers => self.containers,
            ResourceKind::Checks => self.checks,
        }
    }
}

/// Per-kind summaries produced by `import_config`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Connections stage
    pub connections: StageSummary,
    /// Datastores stage
    pub datastores: StageSummary,
    /// Containers stage
    pub containers: StageSummary,
    /// Checks stage
    pub checks: StageSummary,
}

impl ImportSummary {
    /// Stage summary for a given resource kind
    pub fn stage(&self, kind: ResourceKind) -> &StageSummary {
        match kind {
            ResourceKind::Connections => &self.connections,
            ResourceKind::Datastores => &self.datastores,
            ResourceKind::Containers => &self.containers,
            ResourceKind::Checks => &self.checks,
        }
    }

    /// All error strings across every stage
    pub fn all_errors(&self) -> impl Iterator<Item = &String> {
        ResourceKind::ALL
            .iter()
            .flat_map(|kind| self.stage(*kind).errors.iter())
    }

    /// Total failed entities across every stage
    pub fn total_failed(&self) -> usize {
        ResourceKind::ALL
            .iter()
            .map(|kind| self.stage(*kind).failed)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_set_default_is_all() {
        let set = IncludeSet::parse(None).unwrap();
        for kind in ResourceKind::ALL {
            assert!(set.contains(kind));
        }
    }

    #[test]
    fn test_include_set_parse_subset() {
        let set = IncludeSet::parse(Some("connections, checks")).unwrap();
        assert!(set.contains(ResourceKind::Connections));
        assert!(set.contains(ResourceKind::Checks));
        assert!(!set.contains(ResourceKind::Datastores));
        assert!(!set.contains(ResourceKind::Containers));
    }

    #[test]
    fn test_include_set_parse_invalid_token() {
        let err = IncludeSet::parse(Some("connections,widgets")).unwrap_err();
        assert!(err.to_string().contains("widgets"));
    }

    #[test]
    fn test_include_set_parse_empty() {
        assert!(IncludeSet::parse(Some("  ,  ")).is_err());
    }

    #[test]
    fn test_stage_summary_merge() {
        let mut a = StageSummary {
            created: 1,
            updated: 2,
            failed: 0,
            errors: vec![],
        };
        let mut b = StageSummary::new();
        b.record_failure("bad file");
        a.merge(b);
        assert_eq!(a.created, 1);
        assert_eq!(a.updated, 2);
        assert_eq!(a.failed, 1);
        assert_eq!(a.errors, vec!["bad file".to_string()]);
    }

    #[test]
    fn test_import_summary_totals() {
        let mut summary = ImportSummary::default();
        summary.connections.record_failure("conn broke");
        summary.checks.record_failure("check broke");
        assert_eq!(summary.total_failed(), 2);
        assert_eq!(summary.all_errors().count(), 2);
    }
}
