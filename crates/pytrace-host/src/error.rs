//! Host error types covering runtime discovery and program execution.

use std::time::Duration;

use pytrace_core::TraceError;

/// Errors raised while locating the Python runtime or running a program in it.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// None of the candidate executables could be started.
    #[error("no Python runtime found (tried: {})", .tried.join(", "))]
    RuntimeNotFound { tried: Vec<String> },

    /// The runtime started but is too old to run the trace bootstrap.
    #[error("unsupported Python runtime {version} at {executable}")]
    UnsupportedRuntime { executable: String, version: String },

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The runtime process could not be spawned.
    #[error("failed to start {executable}: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipe I/O with the runtime process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The program did not finish before the deadline; the process was killed.
    #[error("execution exceeded {} ms", .limit.as_millis())]
    Timeout { limit: Duration },

    /// The runtime raised while compiling or running the program.
    #[error("{message}")]
    Execution { message: String },

    /// The runtime exited without a readable result envelope.
    #[error("malformed runtime output: {0}")]
    MalformedOutput(String),
}

impl From<HostError> for TraceError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Timeout { limit } => TraceError::Timeout(limit),
            HostError::Execution { message } => TraceError::Execution(message),
            HostError::RuntimeNotFound { .. }
            | HostError::UnsupportedRuntime { .. }
            | HostError::Spawn { .. } => TraceError::Execution(err.to_string()),
            HostError::InvalidConfig(_) | HostError::Io(_) | HostError::MalformedOutput(_) => {
                TraceError::Unknown(err.to_string())
            }
        }
    }
}
