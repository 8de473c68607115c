//! Request handlers.
//!
//! Both endpoints are read-only: they query the runtime and reshape the
//! result, never mutating storage.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kpod_runtime::project_images;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::api::AppState;
use crate::error::{ApiError, Result};

/// List all images.
///
/// Responds `204 No Content` with no body when the store is empty.
pub async fn list_images(State(state): State<AppState>) -> Result<Response> {
    let images = state
        .runtime
        .image_runtime()
        .get_images()
        .await
        .map_err(|e| ApiError::lookup("unable to get images", e))?;

    if images.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    // Cancelled when the deadline passes or the client goes away and the
    // handler future is dropped.
    let cancel = CancellationToken::new();
    let _on_drop = cancel.clone().drop_guard();

    let records = tokio::select! {
        result = project_images(&images, &cancel) => {
            result.map_err(|e| ApiError::lookup("unable to get images", e))?
        }
        _ = tokio::time::sleep(state.request_timeout) => {
            cancel.cancel();
            return Err(ApiError::Timeout(format!(
                "listing {} images exceeded {:?}",
                images.len(),
                state.request_timeout
            )));
        }
    };

    tracing::debug!(count = records.len(), "Listed images");
    Ok(Json(records).into_response())
}

/// Query parameters for [`get_image`].
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub id: Option<String>,
}

/// Describe a single image.
pub async fn get_image(
    State(state): State<AppState>,
    query: std::result::Result<Query<ImageQuery>, QueryRejection>,
) -> Result<Json<String>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidParameter(e.body_text()))?;

    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidParameter("missing required query parameter 'id'".into()))?;

    let image = state
        .runtime
        .image_runtime()
        .new_from_local(&id)
        .await
        .map_err(|e| ApiError::lookup("unable to get image", e))?;

    Ok(Json(image.to_string()))
}
