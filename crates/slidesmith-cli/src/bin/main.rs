//! slidesmith CLI binary entry point
//!
//! This is a thin wrapper that installs logging and calls the library's
//! `run_cli()` function.

use anyhow::Result;
use slidesmith_cli::run_cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
