//! Trace and lint handlers.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use pytrace_core::analyzer;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::trace::{TraceRequest, TraceResponse, ValidateRequest, ValidateResponse};
use crate::state::AppState;

/// Traces one call of a function defined in the posted snippet.
///
/// `POST /trace`
pub async fn trace(
    State(state): State<AppState>,
    Json(req): Json<TraceRequest>,
) -> Result<Json<ApiResponse<TraceResponse>>, ApiError> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("trace_run", %run_id, function = %req.function_name);

    let started = Instant::now();
    let config = req.config();
    let outcome = state
        .tracer
        .run(&req.code, &config)
        .instrument(span)
        .await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::ok(TraceResponse::from_outcome(
        run_id, outcome, elapsed_ms,
    ))))
}

/// Runs the denylist scan without executing anything.
///
/// `POST /validate`
pub async fn validate(Json(req): Json<ValidateRequest>) -> Json<ApiResponse<ValidateResponse>> {
    let matched = analyzer::forbidden_matches(&req.code);
    Json(ApiResponse::ok(ValidateResponse {
        valid: matched.is_empty(),
        matched,
    }))
}
