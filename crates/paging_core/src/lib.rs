//! Paginated list controller with debounced, cancellable search.
//!
//! [`PaginatedList`] owns the list state and pages through one of two
//! injected sources: a [`PageSource`] while the search query is empty and a
//! [`SearchSource`] otherwise. A presentation layer drives it with
//! [`PaginatedList::fetch_items`], [`PaginatedList::load_more_if_needed`] and
//! [`PaginatedList::update_search_query`], and renders from
//! [`PaginatedList::snapshot`] plus the [`PaginatedList::subscribe`] stream.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use shared::domain::FetchMode;
use tokio::{
    runtime::Handle,
    sync::{broadcast, Notify},
};
use tracing::{debug, info, trace, warn};

pub mod config;
pub mod error;
pub mod event;
pub mod source;
mod state;

pub use config::{ListConfig, LoadMorePolicy, MissingSourcePolicy};
pub use error::ListError;
pub use event::{FetchOutcome, ListEvent, ListSnapshot};
pub use source::{page_fn, search_fn, PageSource, SearchSource};

use state::{ListState, SearchTask, SourceCall};

/// Bounds an item type must satisfy to be listed.
pub trait ListItem: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> ListItem for T {}

pub struct PaginatedList<T: ListItem> {
    config: ListConfig,
    inner: Mutex<ListState<T>>,
    idle: Arc<Notify>,
    events: broadcast::Sender<ListEvent>,
}

/// Clears the loading flag when a fetch attempt ends, including when the
/// fetch future is dropped mid-flight.
struct LoadingGuard<'a, T: ListItem> {
    list: &'a PaginatedList<T>,
}

impl<T: ListItem> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        self.list.state().is_loading = false;
        self.list.emit(ListEvent::LoadingChanged(false));
        self.list.idle.notify_waiters();
    }
}

impl<T: ListItem> PaginatedList<T> {
    pub fn new(config: ListConfig) -> Result<Arc<Self>, ListError> {
        config.validate()?;
        let (events, _) = broadcast::channel(config.event_capacity);
        Ok(Arc::new(Self {
            config,
            inner: Mutex::new(ListState::new()),
            idle: Arc::new(Notify::new()),
            events,
        }))
    }

    pub fn with_page_source(self: Arc<Self>, source: impl PageSource<T> + 'static) -> Arc<Self> {
        self.set_page_source(source);
        self
    }

    pub fn with_search_source(
        self: Arc<Self>,
        source: impl SearchSource<T> + 'static,
    ) -> Arc<Self> {
        self.set_search_source(source);
        self
    }

    pub fn set_page_source(&self, source: impl PageSource<T> + 'static) {
        self.state().page_source = Some(Arc::new(source));
    }

    pub fn set_search_source(&self, source: impl SearchSource<T> + 'static) {
        self.state().search_source = Some(Arc::new(source));
    }

    pub fn clear_page_source(&self) {
        self.state().page_source = None;
    }

    pub fn clear_search_source(&self) {
        self.state().search_source = None;
    }

    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.state().snapshot(self.config.page_size)
    }

    pub fn items(&self) -> Vec<T> {
        self.state().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.state().error_message.clone()
    }

    pub fn search_query(&self) -> String {
        self.state().search_query.clone()
    }

    pub fn mode(&self) -> FetchMode {
        self.state().mode()
    }

    pub fn current_page(&self) -> u32 {
        self.state().current_page
    }

    pub fn can_load_more(&self) -> bool {
        self.state().can_load_more
    }

    pub fn has_pending_search(&self) -> bool {
        self.state().has_pending_search()
    }

    /// Fetches the next page for the active mode, or page 1 after clearing
    /// the list when `reset` is set.
    ///
    /// Dropped with [`FetchOutcome::Busy`] while another fetch is in flight.
    pub async fn fetch_items(&self, reset: bool) -> FetchOutcome {
        let (generation, call, mode) = {
            let mut state = self.state();
            if state.is_loading {
                debug!(reset, "paging: fetch suppressed, another fetch is in flight");
                return FetchOutcome::Busy;
            }
            state.is_loading = true;
            if reset {
                state.reset();
            }
            (
                state.generation,
                state.source_call(self.config.page_size),
                state.mode(),
            )
        };
        let _loading = LoadingGuard { list: self };
        self.emit(ListEvent::LoadingChanged(true));
        if reset {
            self.emit(ListEvent::Reset);
        }

        let Some(call) = call else {
            return self.source_missing(mode);
        };

        let result = match call {
            SourceCall::Page(source, request) => {
                debug!(
                    page = request.page,
                    page_size = request.page_size,
                    "paging: fetching page"
                );
                source.fetch_page(request).await
            }
            SourceCall::Search(source, request) => {
                debug!(
                    query = %request.query,
                    page = request.page,
                    page_size = request.page_size,
                    "paging: fetching search page"
                );
                source.search(request).await
            }
        };

        let outcome = {
            let mut state = self.state();
            if state.generation != generation {
                debug!(
                    stamped = generation,
                    current = state.generation,
                    "paging: discarding response for superseded query"
                );
                FetchOutcome::Stale
            } else {
                match result {
                    Ok(new_items) => state.apply_page(
                        new_items,
                        self.config.page_size,
                        self.config.load_more,
                    ),
                    Err(err) => {
                        warn!(mode = mode.as_str(), "paging: source failed: {err:#}");
                        state.apply_failure(&err)
                    }
                }
            }
        };

        match &outcome {
            FetchOutcome::Loaded { page, count } => {
                self.emit(ListEvent::PageLoaded {
                    page: *page,
                    count: *count,
                });
            }
            FetchOutcome::Exhausted => {
                info!(mode = mode.as_str(), "paging: source exhausted");
                self.emit(ListEvent::Exhausted);
            }
            FetchOutcome::Failed(message) => self.emit(ListEvent::Failed(message.clone())),
            FetchOutcome::Stale => self.emit(ListEvent::StaleDiscarded { generation }),
            _ => {}
        }
        outcome
    }

    /// Pull-to-refresh: clears the list and fetches page 1.
    pub async fn refresh(&self) -> FetchOutcome {
        self.fetch_items(true).await
    }

    /// Fetches the next page when `current_index` is the last item, the list
    /// is not exhausted and the previous fetch satisfied the load-more policy.
    pub async fn load_more_if_needed(&self, current_index: usize) -> FetchOutcome {
        let should_load = self.state().should_load_more(
            current_index,
            self.config.page_size,
            self.config.load_more,
        );
        if !should_load {
            return FetchOutcome::Skipped;
        }
        self.fetch_items(false).await
    }

    /// Sets the query immediately and schedules a reset fetch after the
    /// debounce period. Any previously scheduled search is cancelled first.
    ///
    /// Outside a Tokio runtime the query is still updated but no fetch is
    /// scheduled; call [`PaginatedList::refresh`] once a runtime is available.
    pub fn update_search_query(self: &Arc<Self>, query: impl Into<String>) {
        let query = query.into();
        let runtime = Handle::try_current();
        let (previous, generation) = {
            let mut state = self.state();
            state.search_query = query.clone();
            state.generation += 1;
            let generation = state.generation;
            let scheduled = runtime.as_ref().ok().map(|runtime| SearchTask {
                generation,
                handle: runtime.spawn(debounced_search(
                    Arc::downgrade(self),
                    Arc::clone(&self.idle),
                    generation,
                    self.config.debounce,
                )),
            });
            let previous = match scheduled {
                Some(task) => state.search_task.replace(task),
                None => state.search_task.take(),
            };
            (previous, generation)
        };
        if let Some(previous) = previous {
            previous.abort();
            trace!(generation = previous.generation, "paging: cancelled pending search");
        }
        if let Err(err) = runtime {
            warn!(generation, "paging: no runtime, search fetch not scheduled: {err}");
        }

        debug!(query = %query, generation, "paging: search query updated");
        self.emit(ListEvent::QueryChanged(query));
    }

    /// Cancels any pending search. Also runs on drop.
    pub fn shutdown(&self) {
        let pending = self.state().search_task.take();
        if let Some(task) = pending {
            task.abort();
            debug!(generation = task.generation, "paging: pending search aborted on shutdown");
        }
    }

    fn is_current_generation(&self, generation: u64) -> bool {
        self.state().generation == generation
    }

    fn source_missing(&self, mode: FetchMode) -> FetchOutcome {
        match self.config.missing_source {
            MissingSourcePolicy::Ignore => {
                debug!(mode = mode.as_str(), "paging: no source configured, fetch dropped");
            }
            MissingSourcePolicy::Surface => {
                warn!(mode = mode.as_str(), "paging: no source configured");
                let message = format!("No {} source configured", mode.as_str());
                self.state().error_message = Some(message.clone());
                self.emit(ListEvent::Failed(message));
            }
        }
        self.emit(ListEvent::SourceMissing(mode));
        FetchOutcome::NotConfigured(mode)
    }

    fn emit(&self, event: ListEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    fn state(&self) -> MutexGuard<'_, ListState<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: ListItem> Drop for PaginatedList<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn debounced_search<T: ListItem>(
    list: Weak<PaginatedList<T>>,
    idle: Arc<Notify>,
    generation: u64,
    debounce: std::time::Duration,
) {
    tokio::time::sleep(debounce).await;

    loop {
        let notified = idle.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        {
            let Some(list) = list.upgrade() else {
                return;
            };
            if !list.is_current_generation(generation) {
                trace!(generation, "paging: debounced search superseded");
                return;
            }
            if list.fetch_items(true).await != FetchOutcome::Busy {
                return;
            }
            debug!(generation, "paging: debounced search waiting for in-flight fetch");
        }

        notified.await;
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
