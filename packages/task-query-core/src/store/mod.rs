//! Variable store seam and the in-memory implementation.

mod memory;

pub use memory::InMemoryVariableStore;

use crate::error::QueryError;
use crate::model::{TaskFilter, VariableRecord};
use crate::pagination::{PageQuery, PageResult};

/// Source of variable records.
///
/// Implementations must tolerate concurrent readers. Backend failures are
/// reported as `QueryError::StoreUnavailable`; retries, if any, belong here
/// rather than in the caller.
pub trait VariableStore: Send + Sync {
    /// Returns the window `query` of the variables matching `filter`, with the
    /// total number of matches.
    fn find_all(
        &self,
        filter: &TaskFilter,
        query: &PageQuery,
    ) -> Result<PageResult<VariableRecord>, QueryError>;
}
