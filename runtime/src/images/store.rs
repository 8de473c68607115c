//! Disk-based image store.
//!
//! Images live on disk under `sha256/<id>/` with an index backed by a
//! persistent `index.json` file. The external build tool writes to the same
//! storage root, so the index is re-read from disk before every query.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kpod_core::error::{KpodError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Minimum length of an ID prefix accepted as a reference.
const MIN_ID_PREFIX_LEN: usize = 3;

/// Metadata for a stored image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Content-addressable image ID (hex, no algorithm prefix)
    pub id: String,
    /// Human-readable names (e.g., "docker.io/library/alpine:3.18")
    #[serde(default)]
    pub names: Vec<String>,
    /// Content digest (e.g., "sha256:abc123...")
    pub digest: String,
    /// When the image was created
    pub created: DateTime<Utc>,
    /// Path to the image layout on disk
    pub path: PathBuf,
}

/// Persistent index stored as JSON on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreIndex {
    images: Vec<StoredImage>,
}

/// Disk-based image store with an in-memory index.
pub struct ImageStore {
    /// Root directory for image storage
    store_dir: PathBuf,
    /// In-memory index: id → StoredImage
    index: Arc<RwLock<HashMap<String, StoredImage>>>,
}

impl ImageStore {
    /// Create a new image store.
    ///
    /// Creates the store directory if it doesn't exist and loads
    /// any existing index from disk.
    pub fn new(store_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(store_dir).map_err(|e| {
            KpodError::StorageError(format!(
                "Failed to create image store directory {}: {}",
                store_dir.display(),
                e
            ))
        })?;

        let index = read_index(store_dir)?;

        Ok(Self {
            store_dir: store_dir.to_path_buf(),
            index: Arc::new(RwLock::new(index)),
        })
    }

    /// List all stored images, newest first.
    pub async fn list(&self) -> Result<Vec<StoredImage>> {
        self.refresh().await?;

        let index = self.index.read().await;
        let mut images: Vec<StoredImage> = index.values().cloned().collect();
        drop(index);

        images.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.id.cmp(&b.id)));
        Ok(images)
    }

    /// Resolve a reference to a stored image.
    ///
    /// Tried in order: full ID (with or without `sha256:`), name, name with an
    /// implied `:latest` tag, name without registry/namespace, digest, and
    /// finally a unique ID prefix.
    pub async fn get(&self, reference: &str) -> Result<StoredImage> {
        self.refresh().await?;

        let reference = reference.trim();
        if reference.is_empty() {
            return Err(KpodError::ImageNotFound(String::new()));
        }

        let index = self.index.read().await;
        let id_ref = reference.strip_prefix("sha256:").unwrap_or(reference);

        if let Some(image) = index.get(id_ref) {
            return Ok(image.clone());
        }

        let tagged = with_default_tag(reference);
        if let Some(image) = index
            .values()
            .find(|img| img.names.iter().any(|n| name_matches(n, &tagged)))
        {
            return Ok(image.clone());
        }

        if let Some(image) = index.values().find(|img| img.digest == reference) {
            return Ok(image.clone());
        }

        if id_ref.len() >= MIN_ID_PREFIX_LEN {
            let mut matches = index.values().filter(|img| img.id.starts_with(id_ref));
            if let Some(first) = matches.next() {
                if matches.next().is_some() {
                    return Err(KpodError::AmbiguousReference(reference.to_string()));
                }
                return Ok(first.clone());
            }
        }

        Err(KpodError::ImageNotFound(reference.to_string()))
    }

    /// Store an image from a source directory.
    ///
    /// Copies the image layout from `source_dir` into the store under
    /// `sha256/<id>/`. Storing an ID that already exists merges the names.
    /// A name moves to this image if another image held it.
    pub async fn put(
        &self,
        id: &str,
        names: &[String],
        digest: &str,
        source_dir: &Path,
    ) -> Result<StoredImage> {
        let target_dir = self.store_dir.join("sha256").join(id);

        if !target_dir.exists() {
            copy_dir_recursive(source_dir, &target_dir).map_err(|e| {
                KpodError::StorageError(format!("Failed to copy image to store: {}", e))
            })?;
        }

        // Held until the index is written so entries added on disk since the
        // last read are merged, not overwritten.
        let mut index = self.index.write().await;
        *index = self.load_index().await?;

        for (other_id, other) in index.iter_mut() {
            if other_id != id {
                other.names.retain(|n| !names.contains(n));
            }
        }

        let stored = match index.get_mut(id) {
            Some(existing) => {
                for name in names {
                    if !existing.names.contains(name) {
                        existing.names.push(name.clone());
                    }
                }
                existing.clone()
            }
            None => {
                let stored = StoredImage {
                    id: id.to_string(),
                    names: names.to_vec(),
                    digest: digest.to_string(),
                    created: Utc::now(),
                    path: target_dir,
                };
                index.insert(id.to_string(), stored.clone());
                stored
            }
        };

        self.save_index(&index).await?;
        drop(index);

        Ok(stored)
    }

    /// Reload the index from disk.
    async fn refresh(&self) -> Result<()> {
        let fresh = self.load_index().await?;
        *self.index.write().await = fresh;
        Ok(())
    }

    /// Read the on-disk index on the blocking pool.
    async fn load_index(&self) -> Result<HashMap<String, StoredImage>> {
        let store_dir = self.store_dir.clone();
        tokio::task::spawn_blocking(move || read_index(&store_dir))
            .await
            .map_err(|e| KpodError::StorageError(format!("Index reader panicked: {}", e)))?
    }

    /// Save index to disk.
    async fn save_index(&self, index: &HashMap<String, StoredImage>) -> Result<()> {
        let store_index = StoreIndex {
            images: index.values().cloned().collect(),
        };

        let data = serde_json::to_string_pretty(&store_index)?;
        let index_path = self.store_dir.join("index.json");

        tokio::fs::write(&index_path, data).await.map_err(|e| {
            KpodError::StorageError(format!(
                "Failed to write image store index {}: {}",
                index_path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// Read `index.json` from a store directory.
///
/// A missing index is an empty store. Entries whose image directory no
/// longer exists are dropped.
fn read_index(store_dir: &Path) -> Result<HashMap<String, StoredImage>> {
    let index_path = store_dir.join("index.json");
    if !index_path.exists() {
        return Ok(HashMap::new());
    }

    let data = std::fs::read_to_string(&index_path).map_err(|e| {
        KpodError::StorageError(format!(
            "Failed to read image store index {}: {}",
            index_path.display(),
            e
        ))
    })?;

    let store_index: StoreIndex = serde_json::from_str(&data).map_err(|e| {
        KpodError::StorageError(format!("Failed to parse image store index: {}", e))
    })?;

    let mut index = HashMap::new();
    for image in store_index.images {
        if image.path.exists() {
            index.insert(image.id.clone(), image);
        } else {
            tracing::debug!(id = %image.id, path = %image.path.display(), "Skipping image with missing directory");
        }
    }
    Ok(index)
}

/// Append `:latest` to a reference that carries neither tag nor digest.
fn with_default_tag(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    if last.contains(':') || last.contains('@') {
        reference.to_string()
    } else {
        format!("{reference}:latest")
    }
}

/// Whether a stored name matches a (tagged) reference, either fully or
/// after stripping the registry and namespace from the stored name.
fn name_matches(name: &str, reference: &str) -> bool {
    name == reference
        || name
            .strip_suffix(reference)
            .is_some_and(|prefix| prefix.ends_with('/'))
}

/// Recursively copy a directory.
fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
