//! `GET /api/health`

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use twosum_core_resilience::CircuitState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakerHealth {
    pub state: String,
    pub consecutive_failures: usize,
    pub threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// `ok`, or `degraded` while the breaker rejects requests
    pub status: String,
    pub service: String,
    pub version: String,
    pub breaker: BreakerHealth,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.resolver.breaker().snapshot().await;

    let status = match snapshot.state {
        CircuitState::Closed => "ok",
        CircuitState::Open { .. } => "degraded",
    };

    Json(HealthResponse {
        status: status.to_string(),
        service: "twosum-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        breaker: BreakerHealth {
            state: snapshot.state.as_str().to_string(),
            consecutive_failures: snapshot.consecutive_failures,
            threshold: snapshot.failure_threshold,
        },
    })
}
