//! Executes parsed commands against a live deployment

use super::commands::{Cli, Command, ConfigCommand, ExportArgs, ImportArgs};
use crate::api::{ApiClient, ApiClientConfig};
use crate::error::{Error, Result};
use crate::export::export_config;
use crate::import::{import_config, ImportOptions};
use crate::secrets::EnvVars;
use crate::types::{ImportSummary, IncludeSet, ResourceKind};
use tracing::info;

/// Runs CLI commands; owns the API client
pub struct Runner {
    client: ApiClient,
}

impl Runner {
    /// Build a runner from the global CLI options
    ///
    /// Fails when base URL or token are missing from both flags and
    /// environment; those are setup errors and abort before any work.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let base_url = cli
            .base_url
            .as_deref()
            .ok_or_else(|| Error::config("Missing --base-url (or QUALIBRATE_BASE_URL)"))?;
        let token = cli
            .token
            .as_deref()
            .ok_or_else(|| Error::config("Missing --token (or QUALIBRATE_TOKEN)"))?;
        let client = ApiClient::with_config(ApiClientConfig::new(base_url, token))?;
        Ok(Self { client })
    }

    /// Execute the parsed command
    pub async fn run(&self, command: &Command) -> Result<()> {
        match command {
            Command::Config(ConfigCommand::Export(args)) => self.run_export(args).await,
            Command::Config(ConfigCommand::Import(args)) => self.run_import(args).await,
        }
    }

    async fn run_export(&self, args: &ExportArgs) -> Result<()> {
        let include = IncludeSet::parse(args.include.as_deref())?;
        info!(
            "exporting {} datastore(s) to {}",
            args.datastore_ids.len(),
            args.output.display()
        );
        let summary =
            export_config(&self.client, &args.datastore_ids, &args.output, include).await?;

        println!("Export complete: {}", args.output.display());
        for kind in ResourceKind::ALL {
            println!("  {:>4} {kind}", summary.count(kind));
        }
        Ok(())
    }

    async fn run_import(&self, args: &ImportArgs) -> Result<()> {
        let options = ImportOptions {
            dry_run: args.dry_run,
            include: IncludeSet::parse(args.include.as_deref())?,
            env: EnvVars::process(),
        };
        info!(
            "importing from {} (dry run: {})",
            args.input.display(),
            args.dry_run
        );
        let summary = import_config(&self.client, &args.input, &options).await?;
        print_import_summary(&summary, args.dry_run);
        Ok(())
    }
}

fn print_import_summary(summary: &ImportSummary, dry_run: bool) {
    if dry_run {
        println!("Import plan (dry run, nothing was modified):");
    } else {
        println!("Import summary:");
    }
    for kind in ResourceKind::ALL {
        let stage = summary.stage(kind);
        println!(
            "  {kind:<12} {} created, {} updated, {} failed",
            stage.created, stage.updated, stage.failed
        );
    }
    let errors: Vec<&String> = summary.all_errors().collect();
    if !errors.is_empty() {
        println!("Errors:");
        for error in errors {
            println!("  - {error}");
        }
    }
}
