//! kpod CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kpod_cli::commands::{dispatch, Cli};
use kpod_core::KpodError;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        eprintln!("Error: {e}");
        let code = e
            .downcast_ref::<KpodError>()
            .map(KpodError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
