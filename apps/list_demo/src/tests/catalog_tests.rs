use super::*;

#[test]
fn generates_numbered_titles() {
    let catalog = MockCatalog::generate(20);
    assert_eq!(catalog.len(), 20);
    assert_eq!(catalog.entries[0].title, "Amber Anchor #1");
    assert_eq!(catalog.entries[8].title, "Amber Beacon #9");
    assert_eq!(catalog.entries[19].id, 20);
}

#[tokio::test]
async fn pages_through_entries_until_empty() {
    let catalog = MockCatalog::generate(23);

    let first = catalog
        .fetch_page(PageRequest::new(1, 10))
        .await
        .expect("page 1");
    let last = catalog
        .fetch_page(PageRequest::new(3, 10))
        .await
        .expect("page 3");
    let past_end = catalog
        .fetch_page(PageRequest::new(4, 10))
        .await
        .expect("page 4");

    assert_eq!(first.len(), 10);
    assert_eq!(first[0].id, 1);
    assert_eq!(last.len(), 3);
    assert_eq!(last[2].id, 23);
    assert!(past_end.is_empty());
    assert_eq!(catalog.request_count(), 3);
}

#[tokio::test]
async fn search_is_case_insensitive_and_paginated() {
    let catalog = MockCatalog::generate(96);

    let hits = catalog
        .search(SearchRequest::new("golden", 1, 5))
        .await
        .expect("search");
    assert_eq!(hits.len(), 5);
    assert!(hits.iter().all(|item| item.title.starts_with("Golden")));

    // 96 entries over 8 adjectives: 12 "Golden" titles.
    let rest = catalog
        .search(SearchRequest::new("GOLDEN", 3, 5))
        .await
        .expect("search page 3");
    assert_eq!(rest.len(), 2);
}

#[tokio::test]
async fn injects_failures_on_every_nth_request() {
    let catalog = MockCatalog::generate(10).with_fail_every(Some(2));

    catalog
        .fetch_page(PageRequest::new(1, 5))
        .await
        .expect("first request succeeds");
    let err = catalog
        .fetch_page(PageRequest::new(2, 5))
        .await
        .expect_err("second request fails");
    assert!(err.to_string().contains("request #2"));

    let source_error = err.downcast_ref::<SourceError>().expect("typed error");
    assert!(source_error.code.is_transient());
}

#[test]
fn zero_fail_every_disables_injection() {
    let catalog = MockCatalog::generate(1).with_fail_every(Some(0));
    assert_eq!(catalog.fail_every, None);
}

#[tokio::test(start_paused = true)]
async fn latency_delays_response() {
    let catalog = MockCatalog::generate(5).with_latency(Duration::from_millis(150));
    let started = tokio::time::Instant::now();

    catalog
        .fetch_page(PageRequest::new(1, 5))
        .await
        .expect("page");

    assert!(started.elapsed() >= Duration::from_millis(150));
}
