//! kpod configuration.
//!
//! Loaded from a YAML file (`~/.kpod/config.yaml` unless a path is given).
//! Every field has a default, so a missing file or a partial file is valid.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KpodError, Result};

/// Default external build tool.
pub const DEFAULT_BUILD_TOOL: &str = "buildah";

/// Default REST listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default per-request timeout for the REST service, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// kpod configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpodConfig {
    /// Root directory of the image store
    pub storage_root: PathBuf,

    /// Program name or path of the external build tool
    pub build_tool: String,

    /// Address the REST service listens on
    pub listen_addr: SocketAddr,

    /// Upper bound on a single REST request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for KpodConfig {
    fn default() -> Self {
        Self {
            storage_root: kpod_home().join("storage"),
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080))),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl KpodConfig {
    /// Load configuration from an explicit path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            KpodError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&data)
            .map_err(|e| KpodError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(data).map_err(|e| KpodError::ConfigError(e.to_string()))
    }

    /// Load configuration from `path` if given, otherwise from the default
    /// location if that file exists, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = default_config_path();
        if default_path.exists() {
            tracing::debug!(path = %default_path.display(), "Loading config");
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Return the kpod home directory (~/.kpod).
pub fn kpod_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".kpod"))
        .unwrap_or_else(|| PathBuf::from(".kpod"))
}

/// Return the default configuration file path (~/.kpod/config.yaml).
pub fn default_config_path() -> PathBuf {
    kpod_home().join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = KpodConfig::default();
        assert_eq!(config.build_tool, "buildah");
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.storage_root.ends_with(".kpod/storage"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = KpodConfig::from_yaml("build_tool: /usr/local/bin/buildah\n").unwrap();
        assert_eq!(config.build_tool, "/usr/local/bin/buildah");
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
storage_root: /var/lib/kpod
build_tool: buildah
listen_addr: 127.0.0.1:9090
request_timeout_secs: 5
"#;
        let config = KpodConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/var/lib/kpod"));
        assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(KpodConfig::from_yaml("").unwrap(), KpodConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = KpodConfig::from_yaml("listen_addr: not-an-address\n");
        assert!(matches!(result, Err(KpodError::ConfigError(_))));
    }

    #[test]
    fn test_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "request_timeout_secs: 2\n").unwrap();

        let config = KpodConfig::load(Some(&path)).unwrap();
        assert_eq!(config.request_timeout_secs, 2);
    }

    #[test]
    fn test_from_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = KpodConfig::load(Some(&tmp.path().join("nope.yaml")));
        assert!(matches!(result, Err(KpodError::ConfigError(_))));
    }
}
