//! Data-source seams the list controller pages through.

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{PageRequest, SearchRequest};

/// Produces pages of the default (unfiltered) list.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<T>>;
}

/// Produces pages of results for a non-empty search query.
#[async_trait]
pub trait SearchSource<T>: Send + Sync {
    async fn search(&self, request: SearchRequest) -> Result<Vec<T>>;
}

/// Adapter returned by [`page_fn`].
pub struct PageFn<F> {
    f: F,
}

/// Wraps an async closure `Fn(PageRequest) -> Future<Result<Vec<T>>>` as a
/// [`PageSource`].
pub fn page_fn<F>(f: F) -> PageFn<F> {
    PageFn { f }
}

#[async_trait]
impl<T, F, Fut> PageSource<T> for PageFn<F>
where
    T: Send + 'static,
    F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<T>> {
        (self.f)(request).await
    }
}

/// Adapter returned by [`search_fn`].
pub struct SearchFn<F> {
    f: F,
}

/// Wraps an async closure `Fn(SearchRequest) -> Future<Result<Vec<T>>>` as a
/// [`SearchSource`].
pub fn search_fn<F>(f: F) -> SearchFn<F> {
    SearchFn { f }
}

#[async_trait]
impl<T, F, Fut> SearchSource<T> for SearchFn<F>
where
    T: Send + 'static,
    F: Fn(SearchRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    async fn search(&self, request: SearchRequest) -> Result<Vec<T>> {
        (self.f)(request).await
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
