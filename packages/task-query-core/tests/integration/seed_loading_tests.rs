//! Loading stores and access lists from JSON files.

use std::fs;

use serde_json::json;
use tempfile::tempdir;

use task_query_core::{
    CallerContext, InMemoryVariableStore, QueryError, SecurityGate, TaskLookupRestriction,
};

use super::helpers::task;

#[test]
fn test_load_variables_from_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("variables.json");
    fs::write(
        &path,
        serde_json::to_vec(&json!([
            {
                "id": 1,
                "type": "java.lang.String",
                "name": "firstName",
                "processInstanceId": "p-1",
                "appName": "My app",
                "appVersion": "1",
                "taskId": "t-1",
                "createTime": "2024-05-01T10:00:00Z",
                "lastUpdatedTime": "2024-05-02T10:00:00Z",
                "executionId": "e-1",
                "value": "John"
            },
            {
                "id": 2,
                "type": "boolean",
                "name": "approved",
                "taskId": "t-1",
                "value": true
            },
            {
                "id": 3,
                "type": "integer",
                "name": "amount",
                "taskId": "t-2",
                "value": 10
            }
        ]))?,
    )?;

    let store = InMemoryVariableStore::load_json_file(&path)?;
    assert_eq!(store.len(), 3);
    Ok(())
}

#[test]
fn test_load_rejects_mistyped_value() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("variables.json");
    fs::write(
        &path,
        r#"[{"id": 1, "type": "boolean", "name": "approved", "taskId": "t-1", "value": "yes"}]"#,
    )?;

    let err = InMemoryVariableStore::load_json_file(&path).unwrap_err();
    assert!(matches!(err, QueryError::StoreUnavailable(_)));
    assert!(err.to_string().contains("Type mismatch"));
    Ok(())
}

#[test]
fn test_load_missing_file() {
    let err = InMemoryVariableStore::load_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, QueryError::StoreUnavailable(_)));
}

#[test]
fn test_load_access_lists() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("access.json");
    fs::write(
        &path,
        serde_json::to_vec(&json!({
            "t-1": { "assignee": "alice" },
            "t-2": { "candidateGroups": ["hr"] }
        }))?,
    )?;

    let gate = TaskLookupRestriction::load_json_file(&path, vec!["ACTIVITI_ADMIN".to_string()])?;
    assert!(gate.authorize(&CallerContext::user("alice"), &task("t-1")).is_ok());
    assert!(gate.authorize(&CallerContext::user("alice"), &task("t-2")).is_err());
    assert!(gate
        .authorize(&CallerContext::user("dave").with_groups(["hr"]), &task("t-2"))
        .is_ok());
    Ok(())
}
