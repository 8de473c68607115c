//! Image handles.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kpod_core::error::{KpodError, Result};

use super::store::StoredImage;

/// Read access to a single image in the runtime's inventory.
///
/// Identity fields are always available; the size lookup touches storage
/// and may fail independently of the rest.
#[async_trait]
pub trait ImageHandle: Send + Sync {
    /// Content-addressable image ID.
    fn id(&self) -> &str;

    /// Human-readable names, possibly empty.
    fn names(&self) -> &[String];

    /// Content digest.
    fn digest(&self) -> &str;

    /// Creation time.
    fn created(&self) -> DateTime<Utc>;

    /// Total on-disk size in bytes.
    async fn size(&self) -> Result<u64>;
}

/// An image resolved from the local store.
#[derive(Debug, Clone)]
pub struct Image {
    stored: StoredImage,
}

impl Image {
    pub(crate) fn new(stored: StoredImage) -> Self {
        Self { stored }
    }
}

#[async_trait]
impl ImageHandle for Image {
    fn id(&self) -> &str {
        &self.stored.id
    }

    fn names(&self) -> &[String] {
        &self.stored.names
    }

    fn digest(&self) -> &str {
        &self.stored.digest
    }

    fn created(&self) -> DateTime<Utc> {
        self.stored.created
    }

    async fn size(&self) -> Result<u64> {
        let path = self.stored.path.clone();
        tokio::task::spawn_blocking(move || dir_size(&path))
            .await
            .map_err(|e| KpodError::StorageError(format!("Size lookup panicked: {}", e)))?
            .map_err(|e| {
                KpodError::StorageError(format!(
                    "Failed to compute size of image {}: {}",
                    self.stored.id, e
                ))
            })
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = if self.stored.names.is_empty() {
            "<none>".to_string()
        } else {
            self.stored.names.join(", ")
        };
        write!(
            f,
            "Image {} (names: {}; digest: {}; created: {})",
            self.stored.id,
            names,
            self.stored.digest,
            self.stored.created.to_rfc3339()
        )
    }
}

/// Calculate total size of a directory recursively.
///
/// Unlike a best-effort walk, a missing or unreadable directory is an error.
fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_dir() {
            total += dir_size(&entry.path())?;
        } else {
            total += meta.len();
        }
    }
    Ok(total)
}
