//! Tabular view engine.
//!
//! Derives the visible page of a table from the full record list and the
//! current view parameters. The pipeline is always
//! search, then facet filters, then sort, then pagination.
//!
//! Everything here is pure: [`compute_view`] never mutates its input and the
//! same inputs always yield the same output.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use marketplace_core::Record;

use super::data_table::{DataTableConfig, TableColumn};

/// Page sizes offered to the user.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

/// Page size used until the user picks another.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors raised by view state transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The requested page size is not one of [`PAGE_SIZE_OPTIONS`].
    #[error("page size {0} is not one of 5, 10, 25, 50, 100")]
    InvalidPageSize(usize),
    /// The page size is not a number.
    #[error("invalid page size: {0}")]
    UnparsablePageSize(String),
    /// The sort direction is neither `asc` nor `desc`.
    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),
    /// The page number is not a positive integer.
    #[error("invalid page number: {0}")]
    InvalidPage(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Wire value (`asc` or `desc`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ViewError::InvalidSortDirection(other.to_string())),
        }
    }
}

/// Active sort: a field key and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Active facet filters: field key to required value.
///
/// A filter is either absent or holds a non-empty value; setting an empty
/// value removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActiveFilters(BTreeMap<String, String>);

impl ActiveFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a filter. Returns whether anything changed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            return self.0.remove(&key).is_some();
        }
        self.0.insert(key, value.clone()).as_deref() != Some(value.as_str())
    }

    /// Set a filter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Whether any of `keys` on `record` contains `query_lower`.
///
/// `query_lower` must already be lowercased.
pub fn matches_search<R: Record>(record: &R, query_lower: &str, keys: &[String]) -> bool {
    keys.iter()
        .any(|key| record.field(key).contains_lowercase(query_lower))
}

/// Whether `record` satisfies every active filter (exact string equality).
pub fn matches_filters<R: Record>(record: &R, filters: &ActiveFilters) -> bool {
    filters
        .iter()
        .all(|(key, expected)| record.field(key).to_string() == expected)
}

/// Order two records by the sort key.
///
/// Missing values sort last regardless of direction; everything else uses
/// the natural value order, reversed for descending.
pub fn compare_records<R: Record>(a: &R, b: &R, sort: &SortSpec) -> Ordering {
    let left = a.field(&sort.key);
    let right = b.field(&sort.key);
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = left.natural_cmp(&right);
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Search, filter and sort `records`.
///
/// Search is skipped when `search` is blank. Otherwise the lowercased query
/// (not trimmed) must appear in at least one search key. Sorting is stable,
/// so ties keep their input order.
pub fn compute_view<'a, R: Record>(
    records: &'a [R],
    search: &str,
    search_keys: &[String],
    sort: Option<&SortSpec>,
    filters: &ActiveFilters,
) -> Vec<&'a R> {
    let query = if search.trim().is_empty() {
        None
    } else {
        Some(search.to_lowercase())
    };

    let mut rows: Vec<&R> = records
        .iter()
        .filter(|r| query.as_deref().is_none_or(|q| matches_search(*r, q, search_keys)))
        .filter(|r| matches_filters(*r, filters))
        .collect();

    if let Some(sort) = sort {
        rows.sort_by(|a, b| compare_records(*a, *b, sort));
    }

    debug!(
        total = records.len(),
        visible = rows.len(),
        sort_key = sort.map(|s| s.key.as_str()),
        "computed table view"
    );

    rows
}

/// Number of pages needed for `total` rows. Zero rows need zero pages.
#[must_use]
pub const fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Rows on a 1-based `page`. Out-of-range pages are empty.
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Per-table view state: search, sort, filters and pagination.
///
/// Changing the search, sort, filters or page size returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    search: String,
    sort: Option<SortSpec>,
    filters: ActiveFilters,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            filters: ActiveFilters::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    #[must_use]
    pub const fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Cycle the sort on `key`: ascending, then descending, then none.
    ///
    /// Clicking a different column starts it ascending. Keys that are not a
    /// sortable column are ignored. Returns whether the state changed.
    pub fn toggle_sort(&mut self, key: &str, columns: &[TableColumn]) -> bool {
        let sortable = columns.iter().any(|c| c.key == key && c.sortable);
        if !sortable {
            debug!(key, "ignoring sort on non-sortable column");
            return false;
        }

        self.sort = match self.sort.take() {
            Some(current) if current.key == key => match current.direction {
                SortDirection::Asc => Some(SortSpec::descending(key)),
                SortDirection::Desc => None,
            },
            _ => Some(SortSpec::ascending(key)),
        };
        self.page = 1;
        true
    }

    /// Replace the sort outright.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Set or clear (empty value) a facet filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        if self.filters.set(key, value) {
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    /// Change the page size.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidPageSize`] for sizes outside
    /// [`PAGE_SIZE_OPTIONS`]; the state is left unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ViewError> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(ViewError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Jump to `page`, clamped to `1..=total_pages`.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    /// Advance one page unless already on the last.
    pub fn next_page(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    /// Go back one page unless already on the first.
    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Derive the view of `records` under this state.
    pub fn apply<'a, R: Record>(
        &self,
        records: &'a [R],
        config: &DataTableConfig,
    ) -> TableView<'a, R> {
        TableView {
            rows: compute_view(
                records,
                &self.search,
                &config.search_keys,
                self.sort.as_ref(),
                &self.filters,
            ),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// A computed view: every matching row in display order plus the current
/// page window over them.
#[derive(Debug)]
pub struct TableView<'a, R> {
    rows: Vec<&'a R>,
    page: usize,
    page_size: usize,
}

impl<'a, R> TableView<'a, R> {
    /// All matching rows in display order (what an export writes).
    #[must_use]
    pub fn ordered(&self) -> &[&'a R] {
        &self.rows
    }

    /// Rows on the current page.
    #[must_use]
    pub fn page_rows(&self) -> &[&'a R] {
        page_slice(&self.rows, self.page, self.page_size)
    }

    /// Number of matching rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.rows.len(), self.page_size)
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-based inclusive range of rows shown, e.g. `(11, 20)` for
    /// "Showing 11 to 20 of 42". `None` when the page is empty.
    #[must_use]
    pub fn range(&self) -> Option<(usize, usize)> {
        let shown = self.page_rows().len();
        if shown == 0 {
            return None;
        }
        let start = (self.page - 1) * self.page_size + 1;
        Some((start, start + shown - 1))
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Move the window to `page`, clamped to `1..=total_pages`.
    #[must_use]
    pub fn at_page(mut self, page: usize) -> Self {
        self.page = page.clamp(1, self.total_pages().max(1));
        self
    }
}
