//! CLI command definitions and dispatch.

pub mod build;
mod images;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kpod_core::KpodConfig;

/// kpod: build images with buildah and inspect local images.
#[derive(Parser)]
#[command(name = "kpod", version, about)]
pub struct Cli {
    /// Configuration file (default: ~/.kpod/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Image storage root (overrides the configuration file)
    #[arg(long = "storage-root", global = true, value_name = "DIR")]
    pub storage_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Build an image using instructions in a Dockerfile
    #[command(name = "build-using-dockerfile", visible_alias = "build")]
    Build(build::BuildArgs),
    /// List local images
    Images(images::ImagesArgs),
}

/// Load configuration and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<KpodConfig, Box<dyn std::error::Error>> {
    let mut config = KpodConfig::load(cli.config.as_deref())?;
    if let Some(root) = &cli.storage_root {
        config.storage_root = root.clone();
    }
    Ok(config)
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Build(args) => build::execute(args, &config).await,
        Command::Images(args) => images::execute(args, &config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_alias() {
        let cli = Cli::try_parse_from(["kpod", "build", "-t", "app:1", "."]).unwrap();
        assert!(matches!(cli.command, Command::Build(ref a) if a.context == vec![".".to_string()]));

        let cli = Cli::try_parse_from(["kpod", "build-using-dockerfile", "."]).unwrap();
        assert!(matches!(cli.command, Command::Build(_)));
    }

    #[test]
    fn test_storage_root_override() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "storage_root: /from/file\nbuild_tool: podman-build\n").unwrap();

        let cli = Cli::try_parse_from([
            "kpod",
            "--config",
            config_path.to_str().unwrap(),
            "images",
            "--storage-root",
            "/from/flag",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/from/flag"));
        assert_eq!(config.build_tool, "podman-build");
    }

    #[test]
    fn test_images_format() {
        let cli = Cli::try_parse_from(["kpod", "images", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Images(ref a) if a.format == images::ImagesFormat::Json
        ));
    }
}
