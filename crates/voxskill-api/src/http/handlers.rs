//! Request handlers for the skill endpoint.

use axum::extract::State;
use axum::Json;

use voxskill_types::envelope::RequestEnvelope;
use voxskill_types::response::ResponseEnvelope;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /skill - Serve one platform event.
pub async fn invoke_skill(
    State(state): State<AppState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let response = state.skill.invoke(envelope).await?;
    Ok(Json(response))
}

/// GET /health - Liveness probe.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
