//! Image inventory access.
//!
//! [`ImageRuntime`] is the query surface the CLI and the REST service use:
//! list every stored image, or resolve one reference to an [`Image`].

mod image;
pub mod store;

pub use image::{Image, ImageHandle};
pub use store::{ImageStore, StoredImage};

use kpod_core::error::Result;

/// Read-only view over the local image store.
pub struct ImageRuntime {
    store: ImageStore,
}

impl ImageRuntime {
    pub(crate) fn new(store: ImageStore) -> Self {
        Self { store }
    }

    /// Return handles for every stored image, newest first.
    pub async fn get_images(&self) -> Result<Vec<Image>> {
        let images = self.store.list().await?;
        tracing::debug!(count = images.len(), "Listed images");
        Ok(images.into_iter().map(Image::new).collect())
    }

    /// Resolve a local image by ID, ID prefix, name or digest.
    pub async fn new_from_local(&self, reference: &str) -> Result<Image> {
        let stored = self.store.get(reference).await?;
        tracing::debug!(reference, id = %stored.id, "Resolved image");
        Ok(Image::new(stored))
    }

    /// The underlying store.
    pub fn store(&self) -> &ImageStore {
        &self.store
    }
}
