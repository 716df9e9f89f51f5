//! Route table

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use crate::AppState;

/// Uploads are size-advised, not size-enforced; this only guards memory
const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/styles", get(handlers::list_styles))
        .route("/api/workflow", get(handlers::get_workflow))
        .route("/api/workflow/images", post(handlers::upload_images))
        .route("/api/workflow/images/:index", delete(handlers::remove_image))
        .route("/api/workflow/style", put(handlers::set_style))
        .route("/api/workflow/instructions", put(handlers::set_instructions))
        .route("/api/workflow/generate", post(handlers::generate))
        .route("/api/workflow/upscale", post(handlers::upscale))
        .route("/api/workflow/download", get(handlers::download))
        .route("/api/workflow/export", post(handlers::export))
        .route("/api/workflow/reset", post(handlers::reset))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
