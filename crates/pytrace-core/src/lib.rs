//! Core model and pure pipeline stages for pytrace.
//!
//! Everything in this crate is free of I/O: the static analyzer, the request
//! guards, the trace script synthesizer and the transport parser. The crate
//! that owns the Python runtime (`pytrace-host`) strings these stages
//! together around an actual execution.

pub mod analyzer;
pub mod error;
pub mod guard;
pub mod step;
pub mod synth;
pub mod transport;

// Re-export commonly used types
pub use error::{TraceError, ValidationError};
pub use step::{ExecutionConfig, TraceOutcome, TraceResult, TraceStep, Variables};
