//! `POST /two_sum`

use crate::error::{ApiError, ApiResult};
use crate::resolver::{TwoSumRequest, TwoSumResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

/// Find two elements that add up to the target
///
/// Malformed bodies are answered with the same `{error}` shape as every
/// other rejection rather than axum's plain-text default.
pub async fn two_sum(
    State(state): State<AppState>,
    body: Result<Json<TwoSumRequest>, JsonRejection>,
) -> ApiResult<Json<TwoSumResponse>> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unparseable two_sum body");
        ApiError::validation("Invalid JSON body")
    })?;

    let response = state.resolver.resolve(request).await?;
    Ok(Json(response))
}
