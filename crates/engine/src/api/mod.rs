//! API layer - HTTP entry points.

mod adventure_routes;
mod character_routes;
pub mod http;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::app::App;

pub use http::ApiError;

/// The JSON API, with every other path served from `static_dir`.
pub fn router(app: Arc<App>, static_dir: &Path) -> Router {
    http::routes()
        .with_state(app)
        .fallback_service(ServeDir::new(static_dir))
}
