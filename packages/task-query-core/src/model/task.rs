//! Task identifiers and store filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Validated, non-empty task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Parses a task identifier, rejecting blank ids and control characters.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        if raw.trim().is_empty() {
            return Err(QueryError::InvalidTaskId(
                "task id must not be empty".to_string(),
            ));
        }
        if raw.chars().any(|c| c.is_control()) {
            return Err(QueryError::InvalidTaskId(format!(
                "task id '{}' contains control characters",
                raw.escape_debug()
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TaskId::parse(&value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

/// Restriction handed to the variable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub task_id: TaskId,
}

impl TaskFilter {
    pub fn for_task(task_id: TaskId) -> Self {
        Self { task_id }
    }

    /// Returns true if a variable belonging to `task_id` passes the filter.
    pub fn matches(&self, task_id: &TaskId) -> bool {
        &self.task_id == task_id
    }
}
