//! Health check handler

use crate::{state::AppState, Error, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Liveness plus a cheap database round-trip (GET /health)
pub async fn health_check(State(state): State<AppState>) -> Result<Response> {
    sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .map_err(Error::Database)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "database": "reachable",
        })),
    )
        .into_response())
}
