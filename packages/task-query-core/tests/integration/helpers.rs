//! Shared fixtures.

use std::sync::Arc;

use serde_json::json;

use task_query_core::{
    InMemoryVariableStore, PermitAll, QueryConfig, TaskId, VariableQueryService, VariableRecord,
};

pub fn task(id: &str) -> TaskId {
    TaskId::parse(id).unwrap()
}

/// Store with `count` string variables on `task_id`, ids starting at 1.
pub fn store_with(task_id: &str, count: u64) -> InMemoryVariableStore {
    let task_id = task(task_id);
    InMemoryVariableStore::from_records((1..=count).map(|i| {
        VariableRecord::new(
            i,
            "java.lang.String",
            format!("var{:03}", i),
            task_id.clone(),
            json!(format!("value {}", i)),
        )
        .unwrap()
        .with_app("My app", "1")
    }))
}

pub fn open_service(store: InMemoryVariableStore) -> VariableQueryService {
    VariableQueryService::new(
        Arc::new(store),
        Arc::new(PermitAll),
        Arc::new(QueryConfig::default()),
    )
}
