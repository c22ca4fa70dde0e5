//! Trace and lint request/response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pytrace_core::{ExecutionConfig, TraceOutcome, TraceStep};

/// Request to trace one function call.
///
/// Missing fields default to empty strings so they are reported by the
/// request guards with their usual messages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRequest {
    /// Snippet source text.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub function_name: String,
    /// Argument literal, spliced into the call as source.
    #[serde(default)]
    pub parameter_value: String,
}

impl TraceRequest {
    pub fn config(&self) -> ExecutionConfig {
        ExecutionConfig::new(self.function_name.clone(), self.parameter_value.clone())
    }
}

/// A finished trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceResponse {
    /// Identifier for correlating this run with server logs.
    pub run_id: Uuid,
    /// Steps in execution order.
    pub steps: Vec<TraceStep>,
    /// Return value of the traced function.
    pub result: serde_json::Value,
    /// Output the snippet printed while running.
    pub stdout: String,
    /// Wall-clock time of the whole run in milliseconds.
    pub elapsed_ms: u64,
}

impl TraceResponse {
    pub fn from_outcome(run_id: Uuid, outcome: TraceOutcome, elapsed_ms: u64) -> Self {
        TraceResponse {
            run_id,
            steps: outcome.steps,
            result: outcome.result,
            stdout: outcome.stdout,
            elapsed_ms,
        }
    }
}

/// Request to lint a snippet against the denylist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub code: String,
}

/// Denylist verdict. Advisory only; passing it says nothing about safety.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    /// Forbidden patterns found in the snippet.
    pub matched: Vec<&'static str>,
}
