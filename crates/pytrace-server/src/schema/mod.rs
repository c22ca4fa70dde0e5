//! API schema types for request/response definitions.
//!
//! Types use serde derives for JSON serialization/deserialization. Runtime
//! status responses reuse `pytrace_host::RuntimeStatus` directly.

pub mod common;
pub mod trace;
