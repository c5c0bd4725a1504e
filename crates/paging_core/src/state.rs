use std::sync::Arc;

use shared::domain::{FetchMode, PageRequest, SearchRequest};
use tokio::task::JoinHandle;

use crate::{
    config::LoadMorePolicy,
    event::{FetchOutcome, ListSnapshot},
    source::{PageSource, SearchSource},
};

pub(crate) struct SearchTask {
    pub(crate) generation: u64,
    pub(crate) handle: JoinHandle<()>,
}

impl SearchTask {
    pub(crate) fn abort(&self) {
        self.handle.abort();
    }
}

pub(crate) enum SourceCall<T> {
    Page(Arc<dyn PageSource<T>>, PageRequest),
    Search(Arc<dyn SearchSource<T>>, SearchRequest),
}

pub(crate) struct ListState<T> {
    pub(crate) items: Vec<T>,
    pub(crate) is_loading: bool,
    pub(crate) error_message: Option<String>,
    pub(crate) search_query: String,
    pub(crate) current_page: u32,
    pub(crate) can_load_more: bool,
    pub(crate) last_fetch_count: Option<usize>,
    pub(crate) generation: u64,
    pub(crate) search_task: Option<SearchTask>,
    pub(crate) page_source: Option<Arc<dyn PageSource<T>>>,
    pub(crate) search_source: Option<Arc<dyn SearchSource<T>>>,
}

impl<T: Clone> ListState<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error_message: None,
            search_query: String::new(),
            current_page: 1,
            can_load_more: true,
            last_fetch_count: None,
            generation: 0,
            search_task: None,
            page_source: None,
            search_source: None,
        }
    }

    pub(crate) fn mode(&self) -> FetchMode {
        FetchMode::for_query(&self.search_query)
    }

    pub(crate) fn reset(&mut self) {
        self.current_page = 1;
        self.can_load_more = true;
        self.items.clear();
        self.last_fetch_count = None;
        self.generation += 1;
    }

    /// Builds the source call for the active mode, or `None` when that
    /// mode's source has not been set.
    pub(crate) fn source_call(&self, page_size: u32) -> Option<SourceCall<T>> {
        match self.mode() {
            FetchMode::Default => self.page_source.as_ref().map(|source| {
                SourceCall::Page(
                    Arc::clone(source),
                    PageRequest::new(self.current_page, page_size),
                )
            }),
            FetchMode::Search => self.search_source.as_ref().map(|source| {
                SourceCall::Search(
                    Arc::clone(source),
                    SearchRequest::new(self.search_query.clone(), self.current_page, page_size),
                )
            }),
        }
    }

    /// Applies a successful response. Must only be called when the
    /// response's generation is still current.
    ///
    /// Under [`LoadMorePolicy::FullPage`] a short page is the last one, so
    /// it is appended and paging stops.
    pub(crate) fn apply_page(
        &mut self,
        new_items: Vec<T>,
        page_size: u32,
        policy: LoadMorePolicy,
    ) -> FetchOutcome {
        self.last_fetch_count = Some(new_items.len());
        self.error_message = None;
        if new_items.is_empty() {
            self.can_load_more = false;
            return FetchOutcome::Exhausted;
        }

        let page = self.current_page;
        let count = new_items.len();
        if policy == LoadMorePolicy::FullPage && count < page_size as usize {
            self.can_load_more = false;
        }
        self.items.extend(new_items);
        self.current_page += 1;
        FetchOutcome::Loaded { page, count }
    }

    pub(crate) fn apply_failure(&mut self, reason: &anyhow::Error) -> FetchOutcome {
        let message = format!("Failed to load items: {reason:#}");
        self.error_message = Some(message.clone());
        FetchOutcome::Failed(message)
    }

    pub(crate) fn should_load_more(
        &self,
        current_index: usize,
        page_size: u32,
        policy: LoadMorePolicy,
    ) -> bool {
        if !self.can_load_more {
            return false;
        }

        let fetched_enough = match policy {
            LoadMorePolicy::FullPage => self.last_fetch_count == Some(page_size as usize),
            LoadMorePolicy::AnyFetch => self.last_fetch_count.is_some(),
        };
        if !fetched_enough {
            return false;
        }

        self.items.len().checked_sub(1) == Some(current_index)
    }

    pub(crate) fn has_pending_search(&self) -> bool {
        self.search_task
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    pub(crate) fn snapshot(&self, page_size: u32) -> ListSnapshot<T> {
        ListSnapshot {
            items: self.items.clone(),
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
            search_query: self.search_query.clone(),
            mode: self.mode(),
            current_page: self.current_page,
            page_size,
            can_load_more: self.can_load_more,
            last_fetch_count: self.last_fetch_count,
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
