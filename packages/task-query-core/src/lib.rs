//! Core of the task variable query service.
//!
//! Provides the variable model, pagination normalization, the store and
//! security-gate seams, and the query orchestration used by the REST layer.

pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod security;
pub mod service;
pub mod store;

pub use config::{QueryConfig, ResponseFormat};
pub use error::QueryError;
pub use model::{TaskFilter, TaskId, VariableRecord, VariableType};
pub use pagination::{PageQuery, PageRequest, PageResult, Sort, SortDirection, SortField};
pub use security::{CallerContext, PermitAll, SecurityGate, TaskAccess, TaskLookupRestriction};
pub use service::VariableQueryService;
pub use store::{InMemoryVariableStore, VariableStore};
