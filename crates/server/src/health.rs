//! Liveness probe

use api_types::health::Health;
use axum::{Json, extract::State};

use crate::server::ServerState;

pub async fn check(State(state): State<ServerState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        backend: state.engine.backend().to_string(),
    })
}
