//! kpod REST API entry point.
//!
//! To test: `curl localhost:8080/images` and
//! `curl 'localhost:8080/image?id=599aae32efb4'`.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kpod_core::KpodConfig;
use kpod_restapi::{ApiServer, ServerConfig};
use kpod_runtime::{RuntimeAccessor, RuntimeOptions};

/// kpod REST API: read-only image queries over HTTP.
#[derive(Parser)]
#[command(name = "kpod-restapi", version, about)]
struct Args {
    /// Configuration file (default: ~/.kpod/config.yaml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the configuration file)
    #[arg(long, env = "KPOD_LISTEN_ADDR", value_name = "ADDR")]
    listen: Option<SocketAddr>,

    /// Image storage root (overrides the configuration file)
    #[arg(long = "storage-root", value_name = "DIR")]
    storage_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = match KpodConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(root) = args.storage_root {
        config.storage_root = root;
    }

    // Initialize the runtime before accepting any request; failure exits.
    let accessor = RuntimeAccessor::new(RuntimeOptions::from(&config));
    let runtime = accessor.get().await;

    let server = ApiServer::new(ServerConfig::from(&config), runtime);
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "REST API failed");
        std::process::exit(1);
    }
}
