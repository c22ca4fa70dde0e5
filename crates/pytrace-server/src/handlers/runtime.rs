//! Runtime lifecycle handlers.

use axum::extract::State;
use axum::Json;

use pytrace_host::RuntimeStatus;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::state::AppState;

/// Reports whether the Python runtime has been initialized. Never starts it.
///
/// `GET /runtime`
pub async fn runtime_status(State(state): State<AppState>) -> Json<ApiResponse<RuntimeStatus>> {
    Json(ApiResponse::ok(state.tracer.host().status()))
}

/// Initializes the runtime ahead of the first trace.
///
/// `POST /runtime/init`
pub async fn init_runtime(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RuntimeStatus>>, ApiError> {
    let host = state.tracer.host();
    host.ensure_ready().await?;
    Ok(Json(ApiResponse::ok(host.status())))
}
