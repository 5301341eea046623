//! Query error types.

use thiserror::Error;

/// Errors raised while answering a variable query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Malformed or conflicting pagination parameters
    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    /// Task identifier is empty or malformed
    #[error("Invalid task id: {0}")]
    InvalidTaskId(String),

    /// Security gate rejected the caller
    #[error("Access denied to variables of task '{task_id}'")]
    AccessDenied { task_id: String },

    /// Backend failure in the variable store
    #[error("Variable store unavailable: {0}")]
    StoreUnavailable(String),

    /// Unknown task, for stores able to tell it apart from an empty result
    #[error("Task '{task_id}' not found")]
    NotFound { task_id: String },

    /// Variable value does not match its declared type
    #[error("Type mismatch for variable '{name}': declared {declared}, got {got}")]
    TypeMismatch {
        name: String,
        declared: String,
        got: String,
    },

    /// None of the accepted media types can be produced
    #[error("None of the accepted media types are supported: {0}")]
    NotAcceptable(String),
}

impl QueryError {
    /// Stable identifier of the error variant, used in problem bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::InvalidPageRequest(_) => "InvalidPageRequest",
            QueryError::InvalidTaskId(_) => "InvalidTaskId",
            QueryError::AccessDenied { .. } => "AccessDenied",
            QueryError::StoreUnavailable(_) => "StoreUnavailable",
            QueryError::NotFound { .. } => "NotFound",
            QueryError::TypeMismatch { .. } => "TypeMismatch",
            QueryError::NotAcceptable(_) => "NotAcceptable",
        }
    }
}
