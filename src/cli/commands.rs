//! Command-line definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Config-as-code tooling for a Qualytics deployment
#[derive(Debug, Parser)]
#[command(name = "qualibrate", version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the API, e.g. https://acme.qualytics.io/api
    #[arg(long, global = true, env = "QUALIBRATE_BASE_URL")]
    pub base_url: Option<String>,

    /// Personal API token
    #[arg(long, global = true, env = "QUALIBRATE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export and import configuration as a YAML file tree
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Config-as-code subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Export datastore configuration into a folder tree
    Export(ExportArgs),
    /// Apply a configuration folder tree to the server
    Import(ImportArgs),
}

/// Arguments for `config export`
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Datastore id to export; repeat for several datastores
    #[arg(long = "datastore-id", required = true)]
    pub datastore_ids: Vec<i64>,

    /// Directory the tree is written into
    #[arg(long, default_value = "qualibrate-export")]
    pub output: PathBuf,

    /// Comma-separated subset of connections, datastores, containers, checks
    #[arg(long)]
    pub include: Option<String>,
}

/// Arguments for `config import`
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Directory holding the configuration tree
    #[arg(long, default_value = "qualibrate-export")]
    pub input: PathBuf,

    /// Resolve and report every decision without modifying the server
    #[arg(long)]
    pub dry_run: bool,

    /// Comma-separated subset of connections, datastores, containers, checks
    #[arg(long)]
    pub include: Option<String>,
}
