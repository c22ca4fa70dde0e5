//! Error kinds for a trace run.
//!
//! Uses `thiserror` for structured, matchable variants. Every kind displays
//! as the single flat message shown to the user; nothing below the
//! orchestration boundary recovers from these.

use std::time::Duration;

use thiserror::Error;

/// A request rejected before anything was executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The source contains a denylisted pattern.
    #[error("Code contains forbidden operations")]
    ForbiddenOperation { patterns: Vec<&'static str> },

    /// The source is still the editor's placeholder snippet.
    #[error("Please enter your Python code")]
    PlaceholderSource,

    /// No function definition keyword anywhere in the source.
    #[error("Function definition not found in the code")]
    MissingDefinition,

    #[error("Function name is required")]
    EmptyFunctionName,

    #[error("Parameter value is required")]
    EmptyParameterValue,

    /// The named function is not defined in the source.
    #[error("Function \"{name}\" not found in the code")]
    FunctionNotFound { name: String },
}

/// Errors produced by a trace run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The runtime failed to compile or run the generated program.
    #[error("Failed to trace the code: {0}")]
    Execution(String),

    /// The transport string could not be decoded into steps.
    #[error("Failed to read the trace output: {0}")]
    Parse(String),

    /// The run did not finish before its deadline.
    #[error("Execution timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("An unexpected error occurred: {0}")]
    Unknown(String),
}

impl TraceError {
    /// Machine-readable kind, stable across message changes.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceError::Validation(_) => "validation",
            TraceError::Execution(_) => "execution",
            TraceError::Parse(_) => "parse",
            TraceError::Timeout(_) => "timeout",
            TraceError::Unknown(_) => "unknown",
        }
    }
}

impl From<serde_json::Error> for TraceError {
    fn from(err: serde_json::Error) -> Self {
        TraceError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        let err: TraceError = ValidationError::FunctionNotFound {
            name: "foo".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Function \"foo\" not found in the code");
        assert_eq!(err.kind(), "validation");

        let err = ValidationError::ForbiddenOperation {
            patterns: vec!["import os"],
        };
        assert_eq!(err.to_string(), "Code contains forbidden operations");
    }

    #[test]
    fn execution_message_wraps_runtime_text() {
        let err = TraceError::Execution("NameError: name 'x' is not defined".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to trace the code: NameError: name 'x' is not defined"
        );
    }

    #[test]
    fn timeout_reports_milliseconds() {
        let err = TraceError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Execution timed out after 1500 ms");
        assert_eq!(err.kind(), "timeout");
    }
}
