//! Liveness endpoint.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::{Envelope, HealthResponse};

/// `GET /api/health`: version and database reachability.
pub async fn health_handler(State(state): State<AppState>) -> Json<Envelope<HealthResponse>> {
    let db_connected = state.terms.store_reachable().await;
    Json(Envelope::ok(HealthResponse {
        version: skymates_core::version().to_string(),
        db_connected,
    }))
}
