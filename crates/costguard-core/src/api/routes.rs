//! API routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/events", post(handlers::handle_event))
        .route("/classify", post(handlers::classify_event))
        .with_state(state)
}
