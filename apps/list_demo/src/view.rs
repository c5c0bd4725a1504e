use std::fmt::Write as _;

use paging_core::{ListEvent, ListSnapshot};

use crate::catalog::CatalogItem;

/// Text rendering of the list: a loading placeholder, the error, an empty
/// placeholder or the rows, followed by a status line.
pub fn render_snapshot(snapshot: &ListSnapshot<CatalogItem>) -> String {
    let mut out = String::new();

    if snapshot.is_loading && snapshot.is_empty() {
        out.push_str("  Loading...\n");
    } else if let Some(error) = &snapshot.error_message {
        let _ = writeln!(out, "  ! {error}");
    } else if snapshot.is_empty() {
        out.push_str("  No items available.\n");
    }

    if snapshot.error_message.is_none() {
        for (index, item) in snapshot.items.iter().enumerate() {
            let _ = writeln!(out, "  {index:>3}  {}", item.title);
        }
    }

    let query = if snapshot.search_query.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", snapshot.search_query)
    };
    let _ = write!(
        out,
        "[{} mode | query {query} | {} items | next page {}{}{}]",
        snapshot.mode.as_str(),
        snapshot.len(),
        snapshot.current_page,
        if snapshot.can_load_more { "" } else { " | end of list" },
        if snapshot.is_loading { " | loading" } else { "" },
    );
    out
}

/// One-line description of an event, or `None` for events not worth
/// printing.
pub fn describe_event(event: &ListEvent) -> Option<String> {
    match event {
        ListEvent::LoadingChanged(_) => None,
        ListEvent::Reset => Some("list cleared".to_string()),
        ListEvent::QueryChanged(query) if query.is_empty() => {
            Some("search cleared".to_string())
        }
        ListEvent::QueryChanged(query) => Some(format!("search text: \"{query}\"")),
        ListEvent::PageLoaded { page, count } => {
            Some(format!("page {page} loaded ({count} items)"))
        }
        ListEvent::Exhausted => Some("no more items".to_string()),
        ListEvent::Failed(message) => Some(format!("error: {message}")),
        ListEvent::StaleDiscarded { .. } => {
            Some("discarded results for an outdated query".to_string())
        }
        ListEvent::SourceMissing(mode) => {
            Some(format!("no {} source configured", mode.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::FetchMode;

    fn snapshot(items: Vec<CatalogItem>) -> ListSnapshot<CatalogItem> {
        ListSnapshot {
            items,
            is_loading: false,
            error_message: None,
            search_query: String::new(),
            mode: FetchMode::Default,
            current_page: 1,
            page_size: 10,
            can_load_more: true,
            last_fetch_count: None,
        }
    }

    #[test]
    fn renders_loading_placeholder_for_empty_list() {
        let mut state = snapshot(Vec::new());
        state.is_loading = true;
        let text = render_snapshot(&state);
        assert!(text.starts_with("  Loading..."));
        assert!(text.ends_with("| loading]"));
    }

    #[test]
    fn renders_error_instead_of_rows() {
        let mut state = snapshot(vec![CatalogItem {
            id: 1,
            title: "Amber Anchor #1".into(),
        }]);
        state.error_message = Some("Failed to load items: offline".into());
        let text = render_snapshot(&state);
        assert!(text.contains("! Failed to load items: offline"));
        assert!(!text.contains("Amber Anchor"));
    }

    #[test]
    fn renders_rows_and_status() {
        let mut state = snapshot(vec![
            CatalogItem {
                id: 1,
                title: "Amber Anchor #1".into(),
            },
            CatalogItem {
                id: 2,
                title: "Brisk Anchor #2".into(),
            },
        ]);
        state.search_query = "anchor".into();
        state.mode = FetchMode::Search;
        state.current_page = 2;
        state.can_load_more = false;

        let text = render_snapshot(&state);
        assert!(text.contains("    1  Brisk Anchor #2"));
        assert!(text.ends_with(
            "[search mode | query \"anchor\" | 2 items | next page 2 | end of list]"
        ));
    }

    #[test]
    fn renders_empty_placeholder() {
        let text = render_snapshot(&snapshot(Vec::new()));
        assert!(text.starts_with("  No items available."));
    }

    #[test]
    fn hides_loading_transitions() {
        assert_eq!(describe_event(&ListEvent::LoadingChanged(true)), None);
        assert_eq!(
            describe_event(&ListEvent::PageLoaded { page: 2, count: 10 }).as_deref(),
            Some("page 2 loaded (10 items)")
        );
        assert_eq!(
            describe_event(&ListEvent::QueryChanged(String::new())).as_deref(),
            Some("search cleared")
        );
    }
}
