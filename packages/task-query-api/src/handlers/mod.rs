//! HTTP endpoint implementations.

pub mod envelope;
pub mod negotiation;
pub mod request_utils;
pub mod response;
pub mod variable_handlers;

pub use response::error_response;
pub use variable_handlers::list_task_variables;
