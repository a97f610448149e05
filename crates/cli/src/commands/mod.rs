//! Command implementations and the table sources they share.

pub mod export;
pub mod view;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use marketplace_admin::components::{
    DataTableConfig, SortSpec, ViewError, ViewState, customers_table_config,
    generic_table_config, merchants_table_config, orders_table_config,
};
use marketplace_admin::mock;
use marketplace_core::{Customer, Merchant, Order, Record, RecordError, Row};

use crate::TableArgs;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input JSON is not an array of records.
    #[error("Invalid records: {0}")]
    Record(#[from] RecordError),

    /// View options were rejected.
    #[error(transparent)]
    View(#[from] ViewError),
}

/// Parse a `KEY=VALUE` filter argument.
///
/// # Errors
///
/// Returns a message when there is no `=` or the key is empty.
pub fn parse_filter(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))?;
    if key.is_empty() {
        return Err(format!("missing filter key in `{arg}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// A loaded table.
#[derive(Debug)]
pub enum Table {
    Merchants(Vec<Merchant>),
    Customers(Vec<Customer>),
    Orders(Vec<Order>),
    /// Schemaless rows from a JSON file, titled after the file.
    Rows { title: String, rows: Vec<Row> },
}

/// Work that runs over any kind of table.
pub trait TableVisitor {
    type Output;

    fn visit<R: Record>(self, records: &[R], config: &DataTableConfig) -> Self::Output;
}

impl Table {
    /// Load a built-in table by name, or a JSON file by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not an array of
    /// objects with unique ids.
    pub fn load(source: &str) -> Result<Self, CliError> {
        let table = match source {
            "merchants" => Self::Merchants(mock::merchants()?),
            "customers" => Self::Customers(mock::customers()?),
            "orders" => Self::Orders(mock::orders()?),
            path => Self::from_file(Path::new(path))?,
        };
        info!(source, rows = table.len(), "Table loaded");
        Ok(table)
    }

    fn from_file(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let rows = Row::many_from_json(serde_json::from_str(&text)?)?;
        let title = path
            .file_stem()
            .map_or_else(|| "export".to_string(), |s| s.to_string_lossy().into_owned());
        Ok(Self::Rows { title, rows })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Merchants(m) => m.len(),
            Self::Customers(c) => c.len(),
            Self::Orders(o) => o.len(),
            Self::Rows { rows, .. } => rows.len(),
        }
    }

    /// Run `visitor` over the records with their table configuration.
    pub fn visit<V: TableVisitor>(&self, visitor: V) -> V::Output {
        match self {
            Self::Merchants(merchants) => {
                visitor.visit(merchants, &merchants_table_config(merchants))
            }
            Self::Customers(customers) => visitor.visit(customers, &customers_table_config()),
            Self::Orders(orders) => visitor.visit(orders, &orders_table_config()),
            Self::Rows { title, rows } => visitor.visit(rows, &rows_config(title, rows)),
        }
    }
}

/// Configuration for schemaless rows: `id` first, then every other key in
/// alphabetical order, all sortable and searchable.
#[must_use]
pub fn rows_config(title: &str, rows: &[Row]) -> DataTableConfig {
    let keys: BTreeSet<&str> = rows.iter().flat_map(Row::keys).collect();
    let ordered = std::iter::once("id").chain(keys.into_iter().filter(|k| *k != "id"));
    generic_table_config(title, title, ordered)
}

/// Build the view state for `args`. Sorting on a column that is unknown or
/// not sortable is ignored with a warning.
#[must_use]
pub fn view_state(args: &TableArgs, config: &DataTableConfig) -> ViewState {
    let mut state = ViewState::new();

    if let Some(search) = &args.search {
        state.set_search(search.as_str());
    }

    if let Some(key) = &args.sort {
        if config.column_by_key(key).is_some_and(|c| c.sortable) {
            state.set_sort(Some(if args.desc {
                SortSpec::descending(key.as_str())
            } else {
                SortSpec::ascending(key.as_str())
            }));
        } else {
            warn!(key = %key, "ignoring sort on unknown or non-sortable column");
        }
    }

    for (key, value) in &args.filters {
        state.set_filter(key.as_str(), value.as_str());
    }

    state
}
