//! Python runtime host and trace orchestration.
//!
//! - [`InterpreterHost`] owns the lazily-initialized runtime handle and runs
//!   generated programs under a deadline.
//! - [`Tracer`] strings the pure stages from `pytrace-core` around a host
//!   run and reports failures with the phase they happened in.
//! - [`HostConfig`] carries interpreter and deadline settings, usually read
//!   from the environment.

pub mod config;
pub mod error;
pub mod host;
pub mod tracer;

pub use config::HostConfig;
pub use error::HostError;
pub use host::{InterpreterHost, RawOutput, RuntimeHandle, RuntimeStatus};
pub use tracer::{TraceFailure, TracePhase, Tracer};
