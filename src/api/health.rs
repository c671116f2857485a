//! Health check endpoint.

use crate::api::AppState;
use crate::errors::Result;
use axum::Json;
use axum::extract::State;

/// `GET /healthcheck` - verifies the database connection is alive.
pub async fn healthcheck(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    state.db.ping().await?;
    Ok(Json(
        serde_json::json!({ "status": "OK", "database": "connected" }),
    ))
}
