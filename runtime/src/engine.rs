//! Runtime handle construction.

use std::path::PathBuf;

use kpod_core::error::{KpodError, Result};
use kpod_core::KpodConfig;

use crate::images::{ImageRuntime, ImageStore};

/// Options for constructing a [`Runtime`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeOptions {
    /// Root directory of the image store
    pub storage_root: PathBuf,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self::from(&KpodConfig::default())
    }
}

impl From<&KpodConfig> for RuntimeOptions {
    fn from(config: &KpodConfig) -> Self {
        Self {
            storage_root: config.storage_root.clone(),
        }
    }
}

/// Handle to the container-image runtime.
pub struct Runtime {
    options: RuntimeOptions,
    images: ImageRuntime,
}

impl Runtime {
    /// Open the runtime's storage.
    pub fn new(options: RuntimeOptions) -> Result<Self> {
        let store = ImageStore::new(&options.storage_root)
            .map_err(|e| KpodError::RuntimeInit(e.to_string()))?;

        tracing::info!(storage_root = %options.storage_root.display(), "Runtime initialized");

        Ok(Self {
            options,
            images: ImageRuntime::new(store),
        })
    }

    /// Image query surface.
    pub fn image_runtime(&self) -> &ImageRuntime {
        &self.images
    }

    /// Options this runtime was built with.
    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_new_opens_empty_store() {
        let tmp = TempDir::new().unwrap();
        let runtime = Runtime::new(RuntimeOptions {
            storage_root: tmp.path().join("storage"),
        })
        .unwrap();

        assert!(runtime.options().storage_root.exists());
        assert!(runtime.image_runtime().get_images().await.unwrap().is_empty());
    }

    #[test]
    fn test_new_fails_on_unusable_root() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let result = Runtime::new(RuntimeOptions {
            storage_root: file.join("storage"),
        });
        assert!(matches!(result, Err(KpodError::RuntimeInit(_))));
    }

    #[test]
    fn test_options_from_config() {
        let config = KpodConfig {
            storage_root: PathBuf::from("/srv/kpod"),
            ..Default::default()
        };
        assert_eq!(
            RuntimeOptions::from(&config).storage_root,
            PathBuf::from("/srv/kpod")
        );
    }
}
