//! API handlers for the HTTP surface

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::alerting::EventHandler;
use crate::error::Error;
use crate::models::{ActivityEvent, Decision, HandlerStatus};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Handler shared by every request
    pub handler: Arc<EventHandler>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Classify an event and dispatch an alert if needed
pub async fn handle_event(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<HandlerStatus>, (StatusCode, String)> {
    state
        .handler
        .handle_value(body)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Classify an event without dispatching anything
pub async fn classify_event(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Decision>, (StatusCode, String)> {
    let event = ActivityEvent::from_value(body).map_err(error_response)?;
    Ok(Json(state.handler.classifier().classify(&event)))
}

fn error_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::InvalidEvent(_) | Error::Serialization(_) => StatusCode::BAD_REQUEST,
        Error::Notification(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status != StatusCode::BAD_REQUEST {
        error!(error = %err, "Event handling failed");
    }

    (status, err.to_string())
}
