//! View controller
//!
//! Owns the base record set and the view state, and derives the visible rows
//! as a pure function of both: filter → sort → paginate. Nothing is cached
//! across recomputations and the base set is only ever replaced wholesale,
//! never mutated in place.

use ticketgrid_lib::model::Record;

use crate::column::Columns;
use crate::compare;
use crate::filter::filter;
use crate::page::paginate;
use crate::state::ViewState;

/// The derived output of one recomputation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The rows of the effective page, in display order.
    pub rows: Vec<Record>,
    /// The page actually shown, after clamping.
    pub effective_page: usize,
    /// Total number of pages over the filtered set.
    pub total_pages: usize,
    /// Number of records surviving the filter.
    pub filtered_len: usize,
}

/// The table engine: columns, base records, and view state.
pub struct TableView {
    columns: Columns,
    base: Vec<Record>,
    state: ViewState,
}

impl TableView {
    /// Creates an empty view over the given column registry.
    pub fn new(columns: Columns) -> Self {
        Self {
            columns,
            base: Vec::new(),
            state: ViewState::new(),
        }
    }

    /// Creates a view pre-populated with records.
    pub fn with_records(columns: Columns, records: Vec<Record>) -> Self {
        let mut view = Self::new(columns);
        view.base = records;
        view
    }

    /// The column registry.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// The current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The base record set as last fetched.
    pub fn records(&self) -> &[Record] {
        &self.base
    }

    /// Replaces the base record set atomically.
    ///
    /// Filter, sort, and page state are left untouched; the next
    /// [`snapshot`](Self::snapshot) recomputes everything over the new set.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.base = records;
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    /// Updates the search query (resets to page 1).
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
    }

    /// Handles a header click on the given column key.
    pub fn toggle_sort(&mut self, key: &str) {
        self.state.toggle_sort(&self.columns, key);
    }

    /// Changes the page size (resets to page 1).
    pub fn set_page_size(&mut self, size: usize) {
        self.state.set_page_size(size);
    }

    /// Navigates the pager, clamped into the currently valid page range.
    pub fn goto_page(&mut self, page: usize) {
        let total = self.snapshot().total_pages;
        self.state.goto_page(page.min(total));
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Recomputes the visible rows from the current inputs.
    pub fn snapshot(&self) -> Snapshot {
        let mut rows = filter(&self.base, &self.columns, self.state.query());

        if let Some(column) = self.state.sort_key().and_then(|key| self.columns.by_key(key)) {
            let direction = self.state.direction();
            // Stable sort: comparator ties keep their original relative order.
            rows.sort_by(|a, b| {
                direction.apply(compare::compare(&column.value(a), &column.value(b)))
            });
        }

        let filtered_len = rows.len();
        let (page_rows, effective_page, total_pages) =
            paginate(&rows, self.state.page(), self.state.page_size());

        Snapshot {
            rows: page_rows.iter().map(|r| (*r).clone()).collect(),
            effective_page,
            total_pages,
            filtered_len,
        }
    }
}
