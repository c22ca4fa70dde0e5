//! HTTP handler modules for the pytrace API.
//!
//! Handlers parse requests, delegate to the shared `Tracer` or its host, and
//! return JSON responses. No tracing logic lives in handlers.

pub mod runtime;
pub mod trace;
