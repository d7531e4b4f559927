//! API routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))

        // Explore view params
        .route("/api/v1/explore/params", get(handlers::resolve_params))
        .route("/api/v1/explore/params/defaults", get(handlers::default_params))
        .route("/api/v1/explore/params/encode", post(handlers::encode_params))
        .route("/api/v1/explore/params/update", post(handlers::update_params))

        .with_state(state)
}
