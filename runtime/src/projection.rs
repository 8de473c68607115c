//! Image projection: image handles to wire-ready records.
//!
//! A failed size lookup is absorbed into `size: None` so one bad image never
//! takes down the whole listing.

use chrono::{DateTime, Utc};
use kpod_core::error::{KpodError, Result};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::images::ImageHandle;

/// Flattened, serialization-ready view of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub names: Vec<String>,
    pub digest: String,
    pub created: DateTime<Utc>,
    pub size: Option<u64>,
}

impl ImageRecord {
    /// Project a single handle, looking up its size.
    pub async fn from_handle<H: ImageHandle + ?Sized>(image: &H) -> Self {
        let size = match image.size().await {
            Ok(size) => Some(size),
            Err(e) => {
                tracing::debug!(id = image.id(), error = %e, "Image size unavailable");
                None
            }
        };

        Self {
            id: image.id().to_string(),
            names: image.names().to_vec(),
            digest: image.digest().to_string(),
            created: image.created(),
            size,
        }
    }
}

/// Project every handle, preserving input order.
///
/// Returns [`KpodError::Cancelled`] as soon as `cancel` fires; in-flight
/// size lookups are abandoned.
pub async fn project_images<H: ImageHandle>(
    images: &[H],
    cancel: &CancellationToken,
) -> Result<Vec<ImageRecord>> {
    let mut records = Vec::with_capacity(images.len());
    for image in images {
        let record = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(KpodError::Cancelled),
            record = ImageRecord::from_handle(image) => record,
        };
        records.push(record);
    }
    Ok(records)
}
