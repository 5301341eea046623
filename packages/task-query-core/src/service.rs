//! Query orchestration: validate, authorize, then read from the store.

use std::sync::Arc;

use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::model::{TaskFilter, TaskId, VariableRecord};
use crate::pagination::{PageQuery, PageRequest, PageResult, Sort};
use crate::security::{CallerContext, SecurityGate};
use crate::store::VariableStore;

/// Answers "list the variables of task X" for a caller.
///
/// Holds no mutable state; a single instance is shared by all requests.
#[derive(Clone)]
pub struct VariableQueryService {
    store: Arc<dyn VariableStore>,
    gate: Arc<dyn SecurityGate>,
    config: Arc<QueryConfig>,
}

impl VariableQueryService {
    pub fn new(
        store: Arc<dyn VariableStore>,
        gate: Arc<dyn SecurityGate>,
        config: Arc<QueryConfig>,
    ) -> Self {
        Self {
            store,
            gate,
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Lists one page of the variables attached to `task_id`.
    ///
    /// An unknown task yields an empty page rather than an error.
    ///
    /// # Errors
    /// - `InvalidTaskId` if `task_id` is blank or malformed
    /// - `InvalidPageRequest` if the window cannot be normalized
    /// - `AccessDenied` if the security gate rejects the caller
    /// - `StoreUnavailable` if the store fails
    pub fn list_task_variables(
        &self,
        caller: &CallerContext,
        task_id: &str,
        request: PageRequest,
        sort: Option<Sort>,
    ) -> Result<PageResult<VariableRecord>, QueryError> {
        let task_id = TaskId::parse(task_id)?;
        let query = PageQuery::normalize(request, sort, &self.config)?;

        if let Err(e) = self.gate.authorize(caller, &task_id) {
            tracing::warn!(
                "Denied variables of task {} to {}",
                task_id,
                caller.user_id.as_deref().unwrap_or("anonymous")
            );
            return Err(e);
        }

        let page = self
            .store
            .find_all(&TaskFilter::for_task(task_id.clone()), &query)
            .inspect_err(|e| tracing::warn!("Variable lookup for task {} failed: {}", task_id, e))?;

        tracing::debug!(
            task_id = %task_id,
            offset = query.offset,
            limit = query.limit,
            count = page.count(),
            total = page.total_items(),
            "Listed task variables"
        );
        Ok(page)
    }
}
