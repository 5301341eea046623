//! REST API server for task variable queries.
//!
//! Provides the `GET /v1/tasks/{taskId}/variables` endpoint with
//! content negotiation between the flat and linked envelopes.

pub mod handlers;
pub mod router;
pub mod server;
