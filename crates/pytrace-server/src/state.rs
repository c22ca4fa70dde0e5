//! Application state shared by all handlers.
//!
//! [`AppState`] holds the [`Tracer`], which in turn holds the single
//! `InterpreterHost` behind an `Arc`. Cloning the state per request only
//! clones that `Arc`; the host itself serializes program runs.

use pytrace_host::{HostConfig, Tracer};

use crate::error::ApiError;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrates trace runs against the shared interpreter host.
    pub tracer: Tracer,
}

impl AppState {
    /// Creates a new `AppState` whose host uses `config`.
    pub fn new(config: HostConfig) -> Self {
        AppState {
            tracer: Tracer::new(config),
        }
    }

    /// Creates a new `AppState` from `PYTRACE_PYTHON` and `PYTRACE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = HostConfig::from_env().map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(AppState::new(config))
    }
}
