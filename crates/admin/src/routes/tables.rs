//! Shared handling for the table endpoints.
//!
//! Every table accepts the same query parameters:
//!
//! ```text
//! q         - search text
//! sort      - column key (ignored unless the column is sortable)
//! dir       - asc | desc (default asc)
//! page      - 1-based page, clamped to the available pages
//! per_page  - 5 | 10 | 25 | 50 | 100
//! quoting   - legacy | rfc4180 (CSV export only)
//! <filter>  - one parameter per filter key, exact match
//! ```

use std::collections::{BTreeMap, HashMap};

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use marketplace_core::Record;

use crate::api::ApiError;
use crate::components::{
    Cell, CsvQuoting, DataTableConfig, PAGE_SIZE_OPTIONS, SortDirection, SortSpec, ViewError,
    ViewState, export_csv, export_filename,
};
use crate::error::AppError;
use crate::services::MarketplaceError;

/// Raw table query parameters.
pub type TableParams = HashMap<String, String>;

/// Build the view state described by `params`.
///
/// Returns the state and the requested page, which can only be clamped once
/// the number of matching rows is known.
///
/// # Errors
///
/// Returns [`ViewError`] for a bad direction, page or page size.
pub fn view_state(
    params: &TableParams,
    config: &DataTableConfig,
) -> Result<(ViewState, usize), ViewError> {
    let mut state = ViewState::new();

    if let Some(q) = params.get("q") {
        state.set_search(q.as_str());
    }

    if let Some(key) = params.get("sort").filter(|k| !k.is_empty()) {
        let direction = params
            .get("dir")
            .map_or(Ok(SortDirection::Asc), |d| d.parse())?;
        if config.column_by_key(key).is_some_and(|c| c.sortable) {
            state.set_sort(Some(SortSpec {
                key: key.clone(),
                direction,
            }));
        } else {
            debug!(table = %config.table_id, key = %key, "ignoring sort on non-sortable column");
        }
    }

    for filter in &config.filters {
        if let Some(value) = params.get(&filter.key) {
            state.set_filter(filter.key.as_str(), value.as_str());
        }
    }

    if let Some(per_page) = params.get("per_page") {
        let size = per_page
            .parse()
            .map_err(|_| ViewError::UnparsablePageSize(per_page.clone()))?;
        state.set_page_size(size)?;
    }

    let page = match params.get("page") {
        Some(page) => page
            .parse::<usize>()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| ViewError::InvalidPage(page.clone()))?,
        None => 1,
    };

    Ok((state, page))
}

/// One table row: the record plus its rendered cells keyed by column.
#[derive(Debug, Serialize)]
pub struct TableRow<'a, R> {
    pub id: &'a str,
    pub record: &'a R,
    pub cells: BTreeMap<&'a str, Cell>,
}

/// Pagination footer.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    /// First row shown, 1-based. Absent on an empty page.
    pub from: Option<usize>,
    /// Last row shown, inclusive.
    pub to: Option<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    pub page_size_options: &'static [usize],
}

/// JSON body for a table view.
#[derive(Debug, Serialize)]
pub struct TableResponse<'a, R> {
    pub table: &'a DataTableConfig,
    pub state: &'a ViewState,
    pub rows: Vec<TableRow<'a, R>>,
    pub pagination: Pagination,
}

/// Render the current page of `records` as JSON.
///
/// # Errors
///
/// Returns 400 for malformed query parameters.
pub fn table_response<R>(
    records: &[R],
    config: &DataTableConfig,
    params: &TableParams,
) -> Result<Response, AppError>
where
    R: Record + Serialize,
{
    let (mut state, page) = view_state(params, config)?;
    let view = state.apply(records, config);
    state.go_to_page(page, view.total_pages());
    let view = view.at_page(state.page());

    let rows = view
        .page_rows()
        .iter()
        .map(|record| TableRow {
            id: record.id(),
            record: *record,
            cells: config
                .columns
                .iter()
                .map(|c| (c.key.as_str(), c.render(*record)))
                .collect(),
        })
        .collect();

    let (from, to) = view.range().unzip();
    let pagination = Pagination {
        page: view.page(),
        page_size: view.page_size(),
        total: view.total(),
        total_pages: view.total_pages(),
        from,
        to,
        has_previous: view.has_previous(),
        has_next: view.has_next(),
        page_size_options: &PAGE_SIZE_OPTIONS,
    };

    Ok(Json(TableResponse {
        table: config,
        state: &state,
        rows,
        pagination,
    })
    .into_response())
}

/// Export every row matching `params` as a CSV download.
///
/// # Errors
///
/// Returns 400 for malformed query parameters.
pub fn csv_response<R: Record>(
    records: &[R],
    config: &DataTableConfig,
    params: &TableParams,
) -> Result<Response, AppError> {
    let (state, _) = view_state(params, config)?;
    let quoting = match params.get("quoting") {
        Some(mode) => mode.parse().map_err(AppError::BadRequest)?,
        None => CsvQuoting::default(),
    };

    let view = state.apply(records, config);
    let csv = export_csv(view.ordered(), &config.columns, quoting);
    let filename = export_filename(Some(&config.title), Utc::now());
    debug!(table = %config.table_id, rows = view.total(), filename = %filename, "CSV export");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                &format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Outcome of reloading a store before serving it.
///
/// An expired session ends the request; any other failure has already been
/// logged and posted as a notice, so the current records are served.
///
/// # Errors
///
/// Returns [`AppError::SessionExpired`] when the backend rejected the token.
pub fn serve_stale_on_error(result: Result<(), MarketplaceError>) -> Result<(), AppError> {
    match result {
        Err(MarketplaceError::Api(ApiError::SessionExpired)) => Err(AppError::SessionExpired),
        Err(e) => {
            debug!(error = %e, "serving cached records");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::Row;

    use super::*;
    use crate::components::{FilterOption, TableColumn, TableFilter};

    fn config() -> DataTableConfig {
        DataTableConfig::new("people", "People")
            .column(TableColumn::sortable("name", "Name"))
            .column(TableColumn::new("amt", "Amount"))
            .search_key("name")
            .filter(TableFilter::select(
                "team",
                "Team",
                vec![FilterOption::new("red", "Red")],
            ))
    }

    fn params(pairs: &[(&str, &str)]) -> TableParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let (state, page) = view_state(&TableParams::new(), &config()).unwrap();
        assert_eq!(state, ViewState::new());
        assert_eq!(page, 1);
    }

    #[test]
    fn test_parses_every_parameter() {
        let (state, page) = view_state(
            &params(&[
                ("q", "an"),
                ("sort", "name"),
                ("dir", "desc"),
                ("team", "red"),
                ("per_page", "25"),
                ("page", "3"),
                ("unrelated", "x"),
            ]),
            &config(),
        )
        .unwrap();

        assert_eq!(state.search(), "an");
        assert_eq!(state.sort(), Some(&SortSpec::descending("name")));
        assert_eq!(state.filters().get("team"), Some("red"));
        assert_eq!(state.filters().len(), 1);
        assert_eq!(state.page_size(), 25);
        assert_eq!(page, 3);
    }

    #[test]
    fn test_non_sortable_sort_is_ignored() {
        let (state, _) = view_state(&params(&[("sort", "amt")]), &config()).unwrap();
        assert_eq!(state.sort(), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            view_state(&params(&[("per_page", "7")]), &config()).unwrap_err(),
            ViewError::InvalidPageSize(7)
        );
        assert_eq!(
            view_state(&params(&[("per_page", "abc")]), &config()).unwrap_err(),
            ViewError::UnparsablePageSize("abc".to_string())
        );
        assert_eq!(
            ViewError::UnparsablePageSize("abc".to_string()).to_string(),
            "invalid page size: abc"
        );
        assert!(matches!(
            view_state(&params(&[("sort", "name"), ("dir", "up")]), &config()),
            Err(ViewError::InvalidSortDirection(_))
        ));
        assert!(matches!(
            view_state(&params(&[("page", "0")]), &config()),
            Err(ViewError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_csv_response_headers() {
        let rows = vec![Row::new("1").with("name", "Bob").with("amt", 5)];
        let response = csv_response(&rows, &config(), &TableParams::new()).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"People-"));
        assert!(disposition.ends_with(".csv\""));
    }

    #[test]
    fn test_csv_rejects_unknown_quoting() {
        let rows: Vec<Row> = vec![];
        let result = csv_response(&rows, &config(), &params(&[("quoting", "excel")]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_stale_data_is_served_unless_session_expired() {
        assert!(
            serve_stale_on_error(Err(ApiError::Request("down".to_string()).into())).is_ok()
        );
        assert!(matches!(
            serve_stale_on_error(Err(ApiError::SessionExpired.into())),
            Err(AppError::SessionExpired)
        ));
    }
}
