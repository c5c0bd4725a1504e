use std::time::Duration;

use crate::error::ListError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// When `load_more_if_needed` is allowed to request the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMorePolicy {
    /// Only after the previous fetch returned a full page. A short page is
    /// taken as proof that the source has nothing left.
    #[default]
    FullPage,
    /// After any successful fetch, until a fetch comes back empty.
    AnyFetch,
}

/// What to do when the source for the active mode has not been set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSourcePolicy {
    /// Drop the fetch; only the returned outcome reports it.
    #[default]
    Ignore,
    /// Also publish it through `error_message`.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub page_size: u32,
    pub debounce: Duration,
    pub load_more: LoadMorePolicy,
    pub missing_source: MissingSourcePolicy,
    pub event_capacity: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            load_more: LoadMorePolicy::default(),
            missing_source: MissingSourcePolicy::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ListConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_load_more(mut self, policy: LoadMorePolicy) -> Self {
        self.load_more = policy;
        self
    }

    pub fn with_missing_source(mut self, policy: MissingSourcePolicy) -> Self {
        self.missing_source = policy;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ListError> {
        if self.page_size == 0 {
            return Err(ListError::InvalidPageSize(self.page_size));
        }
        if self.event_capacity == 0 {
            return Err(ListError::InvalidEventCapacity);
        }
        Ok(())
    }
}
