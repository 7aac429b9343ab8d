//! Reactive view state
//!
//! Holds the query, sort key/direction, page, and page size, and applies the
//! interaction rules: query edits, sort activation, and page-size changes all
//! reset the page to 1; pager navigation only moves the page.

use log::warn;

use crate::column::Columns;
use crate::compare::Direction;
use crate::page::DEFAULT_PAGE_SIZE;
use crate::page::PAGE_SIZES;

/// The mutable state of one mounted table view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    query: String,
    sort_key: Option<String>,
    direction: Direction,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort_key: None,
            direction: Direction::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    /// Creates the default state of a freshly mounted view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The active sort column key, if any.
    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    /// The active sort direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The stored (pre-clamp) page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// The current page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Updates the search query and resets to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Handles a header click on the given column.
    ///
    /// Clicking the active column flips the direction; activating a different
    /// column starts ascending. Either way the page resets to 1. Clicks on
    /// non-sortable or unknown columns are ignored.
    pub fn toggle_sort(&mut self, columns: &Columns, key: &str) {
        if !columns.sortable(key) {
            return;
        }
        if self.sort_key.as_deref() == Some(key) {
            self.direction = self.direction.toggled();
        } else {
            self.sort_key = Some(key.to_string());
            self.direction = Direction::Asc;
        }
        self.page = 1;
    }

    /// Changes the page size and resets to the first page.
    ///
    /// Sizes outside [`PAGE_SIZES`] are ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if !PAGE_SIZES.contains(&size) {
            warn!("ignoring unsupported page size {size}");
            return;
        }
        self.page_size = size;
        self.page = 1;
    }

    /// Moves to the given page, clamped below by 1.
    ///
    /// Clamping against the total page count happens at derivation time,
    /// since the total depends on the filtered set.
    pub fn goto_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Accessor;
    use crate::column::Column;

    fn columns() -> Columns {
        Columns::new(vec![
            Column::new("id", "ID", 70, Accessor::Num("id")),
            Column::new("name", "Name", 180, Accessor::Text("name")),
            Column::new("actions", "Actions", 80, Accessor::Text("actions")).not_sortable(),
        ])
    }

    #[test]
    fn test_defaults() {
        let state = ViewState::new();
        assert_eq!(state.query(), "");
        assert_eq!(state.sort_key(), None);
        assert_eq!(state.direction(), Direction::Asc);
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_query_resets_page() {
        let mut state = ViewState::new();
        state.goto_page(4);
        state.set_query("vip");
        assert_eq!(state.page(), 1);
        assert_eq!(state.query(), "vip");
    }

    #[test]
    fn test_toggle_sort_flips_and_switches() {
        let columns = columns();
        let mut state = ViewState::new();

        state.toggle_sort(&columns, "name");
        assert_eq!(state.sort_key(), Some("name"));
        assert_eq!(state.direction(), Direction::Asc);

        state.toggle_sort(&columns, "name");
        assert_eq!(state.direction(), Direction::Desc);

        // Activating another column resets the direction to ascending.
        state.goto_page(3);
        state.toggle_sort(&columns, "id");
        assert_eq!(state.sort_key(), Some("id"));
        assert_eq!(state.direction(), Direction::Asc);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_non_sortable_column_ignored() {
        let columns = columns();
        let mut state = ViewState::new();
        state.toggle_sort(&columns, "actions");
        assert_eq!(state.sort_key(), None);
        state.toggle_sort(&columns, "unknown");
        assert_eq!(state.sort_key(), None);
    }

    #[test]
    fn test_page_size_validated_and_resets_page() {
        let mut state = ViewState::new();
        state.goto_page(5);
        state.set_page_size(20);
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.page(), 1);

        state.goto_page(2);
        state.set_page_size(7);
        assert_eq!(state.page_size(), 20, "unsupported size must be ignored");
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_goto_page_floors_at_one() {
        let mut state = ViewState::new();
        state.goto_page(0);
        assert_eq!(state.page(), 1);
        state.goto_page(9);
        assert_eq!(state.page(), 9);
    }
}
