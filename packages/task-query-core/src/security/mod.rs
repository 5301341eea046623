//! Security gate seam: decides which callers may read a task's variables.

mod restriction;

pub use restriction::{TaskAccess, TaskLookupRestriction};

use crate::error::QueryError;
use crate::model::TaskId;

/// Identity of the caller as asserted by the upstream gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: Option<String>,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Authorizes access to the variables of a task.
pub trait SecurityGate: Send + Sync {
    /// # Errors
    /// `QueryError::AccessDenied` when `caller` may not see `task_id`.
    fn authorize(&self, caller: &CallerContext, task_id: &TaskId) -> Result<(), QueryError>;
}

/// Gate that lets every caller through.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermitAll;

impl SecurityGate for PermitAll {
    fn authorize(&self, _caller: &CallerContext, _task_id: &TaskId) -> Result<(), QueryError> {
        Ok(())
    }
}
