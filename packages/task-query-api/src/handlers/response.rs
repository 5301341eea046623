//! Problem bodies returned for every failed request.

use serde::Serialize;

/// Error description inside a problem body
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// HTTP status code as string
    pub code: String,
    /// Stable error identifier, e.g. `InvalidPageRequest`
    pub kind: String,
    /// Error message
    pub message: String,
    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Uniform problem body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

/// Helper to create a problem body
pub fn error_response(
    code: u16,
    kind: &str,
    message: String,
    details: Option<String>,
) -> ErrorResponse {
    ErrorResponse {
        error: ApiError {
            code: code.to_string(),
            kind: kind.to_string(),
            message,
            details,
        },
    }
}
