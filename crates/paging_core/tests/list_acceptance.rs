use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use paging_core::{
    page_fn, search_fn, FetchOutcome, ListConfig, ListEvent, PaginatedList,
};
use shared::{
    domain::{FetchMode, PageRequest, SearchRequest},
    error::SourceError,
};

const CATALOG_SIZE: usize = 23;

fn catalog() -> Arc<Vec<String>> {
    Arc::new((1..=CATALOG_SIZE).map(|i| format!("item {i}")).collect())
}

fn page_of(entries: &[String], page: u32, page_size: u32) -> Vec<String> {
    let request = PageRequest::new(page, page_size);
    entries
        .iter()
        .skip(request.offset())
        .take(page_size as usize)
        .cloned()
        .collect()
}

#[tokio::test(start_paused = true)]
async fn scrolling_and_searching_a_finite_catalog() {
    let entries = catalog();
    let page_calls = Arc::new(AtomicUsize::new(0));
    let search_calls = Arc::new(AtomicUsize::new(0));

    let list = PaginatedList::new(ListConfig::default())
        .expect("list")
        .with_page_source(page_fn({
            let entries = Arc::clone(&entries);
            let calls = Arc::clone(&page_calls);
            move |request: PageRequest| {
                calls.fetch_add(1, Ordering::SeqCst);
                let page = page_of(&entries, request.page, request.page_size);
                async move { Ok::<_, anyhow::Error>(page) }
            }
        }))
        .with_search_source(search_fn({
            let entries = Arc::clone(&entries);
            let calls = Arc::clone(&search_calls);
            move |request: SearchRequest| {
                calls.fetch_add(1, Ordering::SeqCst);
                let hits: Vec<String> = entries
                    .iter()
                    .filter(|entry| entry.contains(&request.query))
                    .cloned()
                    .collect();
                let page = page_of(&hits, request.page, request.page_size);
                async move { Ok::<_, anyhow::Error>(page) }
            }
        }));
    let mut events = list.subscribe();

    assert_eq!(
        list.fetch_items(false).await,
        FetchOutcome::Loaded { page: 1, count: 10 }
    );
    assert_eq!(
        list.load_more_if_needed(9).await,
        FetchOutcome::Loaded { page: 2, count: 10 }
    );
    assert_eq!(
        list.load_more_if_needed(19).await,
        FetchOutcome::Loaded { page: 3, count: 3 }
    );
    assert_eq!(list.load_more_if_needed(22).await, FetchOutcome::Skipped);
    assert!(!list.can_load_more());
    assert_eq!(list.len(), CATALOG_SIZE);
    assert_eq!(page_calls.load(Ordering::SeqCst), 3);

    for partial in ["i", "it", "item 1"] {
        list.update_search_query(partial);
    }
    tokio::time::sleep(Duration::from_millis(350)).await;

    let snapshot = list.snapshot();
    assert!(snapshot.can_load_more);
    assert_eq!(snapshot.mode, FetchMode::Search);
    assert_eq!(snapshot.search_query, "item 1");
    // 11 hits: "item 1" and "item 10" through "item 19"
    assert_eq!(snapshot.len(), 10);
    assert_eq!(search_calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        list.load_more_if_needed(9).await,
        FetchOutcome::Loaded { page: 2, count: 1 }
    );
    assert_eq!(list.len(), 11);
    assert_eq!(list.load_more_if_needed(10).await, FetchOutcome::Skipped);

    let mut queries = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ListEvent::QueryChanged(query) = event {
            queries.push(query);
        }
    }
    assert_eq!(queries, vec!["i", "it", "item 1"]);
}

#[tokio::test]
async fn typed_source_errors_are_rendered_into_error_message() {
    let list = PaginatedList::<String>::new(ListConfig::default().with_page_size(5))
        .expect("list")
        .with_page_source(page_fn(|_request: PageRequest| async {
            Err::<Vec<String>, _>(anyhow::Error::new(SourceError::unavailable(
                "catalog offline",
            )))
        }));

    let outcome = list.fetch_items(true).await;

    assert_eq!(
        outcome,
        FetchOutcome::Failed("Failed to load items: catalog offline (Unavailable)".into())
    );
    let snapshot = list.snapshot();
    assert!(snapshot.is_empty());
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.page_size, 5);
}
