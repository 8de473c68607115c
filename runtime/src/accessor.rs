//! One-time runtime initialization.
//!
//! The runtime handle is built at most once per process and then shared.
//! Concurrent first callers wait on the same initialization instead of
//! racing to build their own.

use std::sync::Arc;

use kpod_core::error::Result;
use tokio::sync::OnceCell;

use crate::engine::{Runtime, RuntimeOptions};

/// Lazily constructs and holds the process-wide [`Runtime`].
pub struct RuntimeAccessor {
    options: RuntimeOptions,
    cell: OnceCell<Arc<Runtime>>,
}

impl RuntimeAccessor {
    /// Create an accessor; nothing is opened until the first `get`.
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            options,
            cell: OnceCell::new(),
        }
    }

    /// Return the runtime, constructing it on first use.
    ///
    /// A failed construction is not cached; the next call tries again.
    pub async fn try_get(&self) -> Result<Arc<Runtime>> {
        self.cell
            .get_or_try_init(|| async { Runtime::new(self.options.clone()).map(Arc::new) })
            .await
            .cloned()
    }

    /// Return the runtime, terminating the process if it cannot be built.
    ///
    /// Nothing useful can be served without the runtime, so construction
    /// failure is fatal.
    pub async fn get(&self) -> Arc<Runtime> {
        match self.try_get().await {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(error = %e, "Unable to initialize runtime");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    /// Whether the runtime has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
