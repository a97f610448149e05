//! Table components: column and filter configuration, the view engine, and
//! CSV export.

pub mod data_table;
pub mod export;
pub mod table_view;

pub use data_table::{
    BadgeRenderer, BadgeVariant, Cell, CellRenderer, CurrencyRenderer, DataTableConfig,
    FilterOption, GroupedNumberRenderer, RatingRenderer, TableColumn, TableFilter,
    customers_table_config, generic_table_config, merchants_table_config, orders_table_config,
};
pub use export::{CsvQuoting, export_csv, export_filename};
pub use table_view::{
    ActiveFilters, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, SortDirection, SortSpec, TableView,
    ViewError, ViewState, compute_view,
};
