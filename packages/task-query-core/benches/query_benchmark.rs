//! Query benchmarks for the in-memory variable store.
//!
//! Measures windowed lookups on a task with many variables, for both
//! pagination styles and for a sorted query.

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use task_query_core::{
    CallerContext, InMemoryVariableStore, PageRequest, PermitAll, QueryConfig, Sort, TaskId,
    VariableQueryService, VariableRecord,
};

/// Builds a service over `tasks` tasks with `per_task` variables each.
fn create_service(tasks: u64, per_task: u64) -> VariableQueryService {
    let records = (0..tasks).flat_map(|t| {
        let task_id = TaskId::parse(&format!("task-{}", t)).unwrap();
        (0..per_task).map(move |i| {
            VariableRecord::new(
                t * per_task + i,
                "java.lang.String",
                format!("var{:05}", per_task - i),
                task_id.clone(),
                json!(format!("value {}", i)),
            )
            .unwrap()
        })
    });
    VariableQueryService::new(
        Arc::new(InMemoryVariableStore::from_records(records)),
        Arc::new(PermitAll),
        Arc::new(QueryConfig::default()),
    )
}

/// Benchmark: windowed lookups at increasing offsets
fn benchmark_windowed_lookup(c: &mut Criterion) {
    let service = create_service(100, 1_000);
    let caller = CallerContext::anonymous();
    let mut group = c.benchmark_group("windowed_lookup");

    for skip_count in [0u64, 500, 990] {
        group.bench_with_input(
            BenchmarkId::new("skip_count", skip_count),
            &skip_count,
            |b, &skip_count| {
                b.iter(|| {
                    let page = service
                        .list_task_variables(
                            &caller,
                            "task-42",
                            PageRequest::SkipCount {
                                skip_count: Some(skip_count),
                                max_items: Some(10),
                            },
                            None,
                        )
                        .unwrap();
                    black_box(page);
                })
            },
        );
    }

    group.bench_function("page_sorted_by_name", |b| {
        let sort = Sort::parse("name,asc").unwrap();
        b.iter(|| {
            let page = service
                .list_task_variables(
                    &caller,
                    "task-7",
                    PageRequest::PageNumber {
                        page: Some(3),
                        size: Some(50),
                    },
                    Some(sort),
                )
                .unwrap();
            black_box(page);
        })
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .sample_size(50)
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3));
    targets = benchmark_windowed_lookup
);
criterion_main!(benches);
