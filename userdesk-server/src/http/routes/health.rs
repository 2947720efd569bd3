//! Liveness endpoint reporting the database connection

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize, PartialEq)]
pub struct HealthReport {
    pub status: &'static str,
    pub database: String,
    pub connected: bool,
}

/// GET /health - 200 once the connection is open, 503 before that
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let connected = state.users.is_connected();
    let (code, status) = if connected {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    let report = HealthReport {
        status,
        database: state.users.database_kind().to_string(),
        connected,
    };
    (code, Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
