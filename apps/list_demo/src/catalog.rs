//! In-memory catalog standing in for a remote data source.

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;
use paging_core::{PageSource, SearchSource};
use serde::Serialize;
use shared::{
    domain::{PageRequest, SearchRequest},
    error::SourceError,
};
use tracing::debug;

const ADJECTIVES: &[&str] = &[
    "Amber", "Brisk", "Copper", "Dusty", "Electric", "Frosted", "Golden", "Hollow",
];
const NOUNS: &[&str] = &[
    "Anchor", "Beacon", "Canyon", "Delta", "Ember", "Falcon", "Glacier", "Harbor", "Island",
    "Juniper", "Kestrel", "Lantern",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: u32,
    pub title: String,
}

/// Clones share the same entries and request counter.
#[derive(Clone)]
pub struct MockCatalog {
    entries: Arc<Vec<CatalogItem>>,
    latency: Duration,
    fail_every: Option<u32>,
    requests: Arc<AtomicU32>,
}

impl MockCatalog {
    pub fn generate(size: usize) -> Self {
        let entries = (0..size)
            .map(|i| {
                let adjective = ADJECTIVES[i % ADJECTIVES.len()];
                let noun = NOUNS[(i / ADJECTIVES.len()) % NOUNS.len()];
                CatalogItem {
                    id: i as u32 + 1,
                    title: format!("{adjective} {noun} #{}", i + 1),
                }
            })
            .collect();
        Self {
            entries: Arc::new(entries),
            latency: Duration::ZERO,
            fail_every: None,
            requests: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every `n`th request fails. `None` or `Some(0)` disables injection.
    pub fn with_fail_every(mut self, fail_every: Option<u32>) -> Self {
        self.fail_every = fail_every.filter(|n| *n > 0);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    async fn round_trip(&self) -> Result<()> {
        let request_no = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(n) = self.fail_every {
            if request_no % n == 0 {
                debug!(request_no, "catalog: injecting failure");
                return Err(SourceError::unavailable(format!(
                    "mock catalog dropped request #{request_no}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

fn page_of<'a>(
    entries: impl Iterator<Item = &'a CatalogItem>,
    request: PageRequest,
) -> Vec<CatalogItem> {
    entries
        .skip(request.offset())
        .take(request.page_size as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl PageSource<CatalogItem> for MockCatalog {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CatalogItem>> {
        self.round_trip().await?;
        Ok(page_of(self.entries.iter(), request))
    }
}

#[async_trait]
impl SearchSource<CatalogItem> for MockCatalog {
    async fn search(&self, request: SearchRequest) -> Result<Vec<CatalogItem>> {
        self.round_trip().await?;
        let needle = request.query.to_lowercase();
        let hits = self
            .entries
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&needle));
        Ok(page_of(hits, request.page_request()))
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
