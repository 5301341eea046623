//! Pagination properties over the in-memory store.

use task_query_core::{CallerContext, PageRequest};

use super::helpers::{open_service, store_with};

/// Every valid window returns at most `limit` entries and the right flags.
#[test]
fn test_windows_respect_limit_and_has_more_items() {
    let service = open_service(store_with("t1", 37));
    let caller = CallerContext::anonymous();

    for offset in [0u64, 1, 9, 10, 36, 37, 40] {
        for limit in [1u32, 5, 10, 37, 50] {
            let page = service
                .list_task_variables(
                    &caller,
                    "t1",
                    PageRequest::SkipCount {
                        skip_count: Some(offset),
                        max_items: Some(limit),
                    },
                    None,
                )
                .unwrap();

            assert!(page.count() <= u64::from(limit));
            assert!(page.total_items() >= page.count());
            assert_eq!(page.total_items(), 37);
            assert_eq!(
                page.has_more_items(),
                offset + page.count() < page.total_items(),
                "offset={} limit={}",
                offset,
                limit
            );
            let expected = 37u64.saturating_sub(offset).min(u64::from(limit));
            assert_eq!(page.count(), expected);
        }
    }
}

/// Walking all pages in page/size style visits every variable exactly once, in order.
#[test]
fn test_page_walk_covers_all_records() {
    let service = open_service(store_with("t1", 23));
    let caller = CallerContext::anonymous();

    let mut seen = Vec::new();
    let mut page_index = 0;
    loop {
        let page = service
            .list_task_variables(
                &caller,
                "t1",
                PageRequest::PageNumber {
                    page: Some(page_index),
                    size: Some(10),
                },
                None,
            )
            .unwrap();
        assert_eq!(page.page_number(), page_index);
        assert_eq!(page.total_pages(), 3);
        seen.extend(page.items().iter().map(|v| v.id()));
        if !page.has_more_items() {
            break;
        }
        page_index += 1;
    }

    assert_eq!(seen, (1..=23).collect::<Vec<_>>());
}

/// The documented scenario: skipCount=11, maxItems=10 over 12 variables.
#[test]
fn test_skip_count_scenario() {
    let service = open_service(store_with("t1", 12));
    let page = service
        .list_task_variables(
            &CallerContext::anonymous(),
            "t1",
            PageRequest::SkipCount {
                skip_count: Some(11),
                max_items: Some(10),
            },
            None,
        )
        .unwrap();

    assert_eq!(page.offset(), 11);
    assert_eq!(page.limit(), 10);
    assert_eq!(page.count(), 1);
    assert_eq!(page.total_items(), 12);
    assert!(!page.has_more_items());
}
