//! REST API router.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use kpod_runtime::Runtime;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Image runtime, initialized before the listener starts.
    pub runtime: Arc<Runtime>,
    /// Upper bound on a single request.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(runtime: Arc<Runtime>, request_timeout: Duration) -> Self {
        Self {
            runtime,
            request_timeout,
        }
    }
}

/// Creates the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/images", get(handlers::list_images))
        .route("/image", get(handlers::get_image))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
