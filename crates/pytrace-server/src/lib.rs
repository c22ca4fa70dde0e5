//! HTTP/JSON API for tracing Python snippets.
//!
//! A front end posts a snippet, a function name and an argument literal and
//! gets back the per-line execution trace. This crate contains the API
//! schema types, error mapping, shared state and route definitions; the
//! tracing itself lives in `pytrace-host`.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
