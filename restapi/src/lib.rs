//! # kpod-restapi
//!
//! Read-only HTTP view of the local image inventory.
//!
//! ## Endpoints
//!
//! - `GET /images`: every image as a JSON array of records
//!   (`id`, `names`, `digest`, `created`, `size`); `204` when there are none
//! - `GET /image?id=<reference>`: textual description of one image
//!
//! Errors carry a 4xx/5xx status and a `{"message": "..."}` body.

pub mod api;
pub mod error;
pub mod handlers;
pub mod server;

pub use api::{create_router, AppState};
pub use error::{ApiError, Result};
pub use server::{ApiServer, ServerConfig};
