//! Command-line interface

mod commands;
mod runner;

pub use commands::{Cli, Command, ConfigCommand, ExportArgs, ImportArgs};
pub use runner::Runner;
