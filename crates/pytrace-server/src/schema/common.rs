//! Common API response wrapper types.
//!
//! [`ApiResponse`] provides the standard envelope for all successful API
//! responses. Error responses are produced by `ApiError` with the same
//! `success` flag set to `false`.

use serde::Serialize;

/// Standard API response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true` for successful responses.
    pub success: bool,
    /// Response payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data,
        }
    }
}
