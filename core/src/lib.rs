//! kpod Core - Foundational Types
//!
//! Error taxonomy and configuration shared by the `kpod` CLI, the image
//! runtime and the REST query service.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::KpodConfig;
pub use error::{KpodError, Result};

/// kpod version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
