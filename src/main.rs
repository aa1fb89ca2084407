//! VisitScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use visit_scribe::cli::{app, Cli};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    app::run(cli).await
}

/// Diagnostics go to stderr and stay quiet unless asked for
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("VISIT_SCRIBE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
