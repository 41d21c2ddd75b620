//! Qualibrate CLI
//!
//! Command-line entry point for config export and import

use clap::Parser;
use qualibrate::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let runner = match Runner::from_cli(&cli) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runner.run(&cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
