//! Task lookup restriction based on assignee and candidate lists.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Deserialize;

use super::{CallerContext, SecurityGate};
use crate::error::QueryError;
use crate::model::TaskId;

/// Who is involved in a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskAccess {
    pub assignee: Option<String>,
    pub candidate_users: Vec<String>,
    pub candidate_groups: Vec<String>,
}

impl TaskAccess {
    pub fn assigned_to(user: impl Into<String>) -> Self {
        Self {
            assignee: Some(user.into()),
            ..Self::default()
        }
    }

    /// Returns true if `caller` is the assignee, a candidate user, or in a
    /// candidate group.
    pub fn involves(&self, caller: &CallerContext) -> bool {
        if let Some(user) = caller.user_id.as_deref() {
            if self.assignee.as_deref() == Some(user)
                || self.candidate_users.iter().any(|u| u == user)
            {
                return true;
            }
        }
        caller
            .groups
            .iter()
            .any(|g| self.candidate_groups.contains(g))
    }
}

/// Restricts variable lookups to callers involved in the task.
///
/// Callers holding an admin role see every task. Tasks with no registered
/// access list are denied to everyone else, so their existence is not
/// revealed.
#[derive(Debug)]
pub struct TaskLookupRestriction {
    access: ArcSwap<HashMap<TaskId, TaskAccess>>,
    admin_roles: Vec<String>,
}

impl TaskLookupRestriction {
    pub fn new(admin_roles: Vec<String>) -> Self {
        Self {
            access: ArcSwap::from_pointee(HashMap::new()),
            admin_roles,
        }
    }

    /// Reads a JSON object mapping task ids to access lists.
    pub fn load_json_file(
        path: impl AsRef<Path>,
        admin_roles: Vec<String>,
    ) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            QueryError::StoreUnavailable(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let access: HashMap<TaskId, TaskAccess> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                QueryError::StoreUnavailable(format!("Failed to parse {}: {}", path.display(), e))
            })?;
        tracing::info!(
            "Loaded access lists for {} tasks from {}",
            access.len(),
            path.display()
        );
        let restriction = Self::new(admin_roles);
        restriction.access.store(Arc::new(access));
        Ok(restriction)
    }

    /// Registers or replaces the access list of a task.
    pub fn register(&self, task_id: TaskId, access: TaskAccess) {
        self.access.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(task_id.clone(), access.clone());
            next
        });
    }

    fn is_admin(&self, caller: &CallerContext) -> bool {
        self.admin_roles.iter().any(|role| caller.has_role(role))
    }
}

impl SecurityGate for TaskLookupRestriction {
    fn authorize(&self, caller: &CallerContext, task_id: &TaskId) -> Result<(), QueryError> {
        if self.is_admin(caller) {
            return Ok(());
        }
        let allowed = self
            .access
            .load()
            .get(task_id)
            .is_some_and(|access| access.involves(caller));
        if allowed {
            Ok(())
        } else {
            Err(QueryError::AccessDenied {
                task_id: task_id.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str) -> TaskId {
        TaskId::parse(id).unwrap()
    }

    fn restriction() -> TaskLookupRestriction {
        let gate = TaskLookupRestriction::new(vec!["ACTIVITI_ADMIN".to_string()]);
        gate.register(task("assigned"), TaskAccess::assigned_to("alice"));
        gate.register(
            task("pooled"),
            TaskAccess {
                assignee: None,
                candidate_users: vec!["bob".to_string()],
                candidate_groups: vec!["hr".to_string()],
            },
        );
        gate
    }

    #[test]
    fn test_assignee_and_candidates_allowed() {
        let gate = restriction();
        assert!(gate
            .authorize(&CallerContext::user("alice"), &task("assigned"))
            .is_ok());
        assert!(gate
            .authorize(&CallerContext::user("bob"), &task("pooled"))
            .is_ok());
        assert!(gate
            .authorize(
                &CallerContext::user("carol").with_groups(["hr"]),
                &task("pooled")
            )
            .is_ok());
    }

    #[test]
    fn test_uninvolved_caller_denied() {
        let gate = restriction();
        let err = gate
            .authorize(&CallerContext::user("bob"), &task("assigned"))
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::AccessDenied {
                task_id: "assigned".to_string()
            }
        );
        assert!(gate
            .authorize(&CallerContext::anonymous(), &task("pooled"))
            .is_err());
        assert!(gate
            .authorize(&CallerContext::user("alice"), &task("unknown"))
            .is_err());
    }

    #[test]
    fn test_admin_sees_everything() {
        let gate = restriction();
        let admin = CallerContext::user("root").with_roles(["ACTIVITI_ADMIN"]);
        assert!(gate.authorize(&admin, &task("assigned")).is_ok());
        assert!(gate.authorize(&admin, &task("unknown")).is_ok());
    }

    #[test]
    fn test_permit_all() {
        assert!(crate::security::PermitAll
            .authorize(&CallerContext::anonymous(), &task("any"))
            .is_ok());
    }
}
