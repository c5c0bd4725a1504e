use serde::Serialize;
use shared::domain::FetchMode;

/// Change notification published after each state mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ListEvent {
    LoadingChanged(bool),
    /// Items were truncated and paging restarted from page 1.
    Reset,
    QueryChanged(String),
    PageLoaded {
        page: u32,
        count: usize,
    },
    /// The active source returned an empty page.
    Exhausted,
    Failed(String),
    StaleDiscarded {
        generation: u64,
    },
    SourceMissing(FetchMode),
}

/// Result of a single fetch attempt. Purely informational: every failure is
/// also reflected in the list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { page: u32, count: usize },
    Exhausted,
    Failed(String),
    /// Another fetch was already in flight; this one was dropped.
    Busy,
    /// `load_more_if_needed` preconditions did not hold.
    Skipped,
    NotConfigured(FetchMode),
    /// The query changed while the request was in flight; the response
    /// was thrown away.
    Stale,
}

impl FetchOutcome {
    /// Whether the outcome changed `items` or paging state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Exhausted)
    }
}

/// Point-in-time copy of the list state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub search_query: String,
    pub mode: FetchMode,
    pub current_page: u32,
    pub page_size: u32,
    pub can_load_more: bool,
    pub last_fetch_count: Option<usize>,
}

impl<T> ListSnapshot<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index whose appearance should trigger `load_more_if_needed`.
    pub fn last_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }
}
