//! Trace data model.
//!
//! A [`TraceStep`] is one line event captured by the line hook just before
//! the line executes. Steps are immutable once decoded; a run produces a
//! fresh [`TraceResult`] (or the richer [`TraceOutcome`]) and nothing is
//! kept between runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Local variables of the traced frame, in the order the runtime bound them.
///
/// Values are plain JSON. A value that could not survive JSON encoding in the
/// runtime arrives as a string holding its `repr`.
pub type Variables = IndexMap<String, serde_json::Value>;

/// Source text used for lines the runtime reports outside the snippet.
pub fn out_of_bounds_placeholder(line: u32) -> String {
    format!("Line number out of bounds (line: {})", line)
}

/// One recorded line event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// 0-based sequence index, equal to the step's position in the trace.
    pub step: u32,
    /// 1-based source line number as reported by the runtime.
    pub line: u32,
    /// Trimmed source text of `line`.
    pub code: String,
    /// Snapshot of the frame's locals before the line ran.
    pub variables: Variables,
}

/// Per-run user input: which function to call and with what.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionConfig {
    /// Name of the function defined in the snippet.
    pub function_name: String,
    /// Literal argument text, inserted into the generated call as source.
    pub parameter_value: String,
}

impl ExecutionConfig {
    pub fn new(function_name: impl Into<String>, parameter_value: impl Into<String>) -> Self {
        ExecutionConfig {
            function_name: function_name.into(),
            parameter_value: parameter_value.into(),
        }
    }
}

/// The ordered steps of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    pub steps: Vec<TraceStep>,
}

/// Everything a run produced: the steps plus the traced function's return
/// value and whatever the snippet wrote to stdout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceOutcome {
    /// Return value of the traced function (`null` for `None`).
    pub result: serde_json::Value,
    pub steps: Vec<TraceStep>,
    /// Captured standard output of the run.
    #[serde(default)]
    pub stdout: String,
}

impl TraceOutcome {
    /// Drops the return value and captured output, keeping the steps.
    pub fn into_result(self) -> TraceResult {
        TraceResult { steps: self.steps }
    }

    /// Lines in execution order, handy for comparing runs.
    pub fn line_sequence(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.line).collect()
    }
}
