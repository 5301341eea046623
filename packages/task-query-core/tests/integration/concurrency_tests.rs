//! Concurrent readers against a store being reseeded.

use std::sync::Arc;
use std::thread;

use ntest::timeout;
use serde_json::json;

use task_query_core::{
    CallerContext, InMemoryVariableStore, PageRequest, PermitAll, QueryConfig,
    VariableQueryService, VariableRecord,
};

use super::helpers::{store_with, task};

#[timeout(5000)]
#[test]
fn test_concurrent_reads_see_consistent_pages() {
    let store = Arc::new(store_with("t1", 50));
    let service = VariableQueryService::new(
        store.clone(),
        Arc::new(PermitAll),
        Arc::new(QueryConfig::default()),
    );

    let readers: Vec<_> = (0..8)
        .map(|n| {
            let service = service.clone();
            thread::spawn(move || {
                for i in 0..200u64 {
                    let page = service
                        .list_task_variables(
                            &CallerContext::anonymous(),
                            "t1",
                            PageRequest::SkipCount {
                                skip_count: Some((i + n) % 60),
                                max_items: Some(10),
                            },
                            None,
                        )
                        .unwrap();
                    assert!(page.count() <= 10);
                    let ids: Vec<u64> = page.items().iter().map(|v| v.id()).collect();
                    assert!(ids.windows(2).all(|w| w[0] < w[1]));
                }
            })
        })
        .collect();

    for i in 51..=100u64 {
        store.insert(
            VariableRecord::new(i, "long", format!("late{}", i), task("t1"), json!(i)).unwrap(),
        );
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.len(), 100);
}

#[test]
fn test_store_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InMemoryVariableStore>();
    assert_send_sync::<VariableQueryService>();
}
