//! kpod Runtime - local image inventory.
//!
//! Provides the image store, image handles, the one-time runtime accessor
//! and the projection of images into wire records.

pub mod accessor;
pub mod engine;
pub mod images;
pub mod projection;

// Re-export common types
pub use accessor::RuntimeAccessor;
pub use engine::{Runtime, RuntimeOptions};
pub use images::{Image, ImageHandle, ImageRuntime, ImageStore, StoredImage};
pub use projection::{project_images, ImageRecord};

/// kpod Runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
