//! `mkt-cli export`: write every matching row as CSV.

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use marketplace_admin::components::{CsvQuoting, DataTableConfig, export_csv, export_filename};
use marketplace_core::Record;

use super::{CliError, Table, TableVisitor, view_state};
use crate::TableArgs;

/// CSV text of a table view.
#[derive(Debug)]
pub struct Export {
    pub csv: String,
    pub rows: usize,
    /// The table's title, used for the default filename.
    pub title: String,
}

/// Builds the CSV for every row matching the view options.
pub struct CsvExporter<'a> {
    pub args: &'a TableArgs,
    pub quoting: CsvQuoting,
}

impl TableVisitor for CsvExporter<'_> {
    type Output = Export;

    fn visit<R: Record>(self, records: &[R], config: &DataTableConfig) -> Export {
        let view = view_state(self.args, config).apply(records, config);
        Export {
            csv: export_csv(view.ordered(), &config.columns, self.quoting),
            rows: view.total(),
            title: config.title.clone(),
        }
    }
}

/// Write the CSV to `output`, or to the default export filename.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded or the file cannot be
/// written.
pub fn run(
    args: &TableArgs,
    output: Option<PathBuf>,
    rfc4180: bool,
    title: Option<&str>,
) -> Result<(), CliError> {
    let table = Table::load(&args.source)?;
    let quoting = if rfc4180 {
        CsvQuoting::Rfc4180
    } else {
        CsvQuoting::Legacy
    };

    let export = table.visit(CsvExporter { args, quoting });
    let path = output.unwrap_or_else(|| {
        PathBuf::from(export_filename(
            Some(title.unwrap_or(&export.title)),
            Utc::now(),
        ))
    });

    std::fs::write(&path, &export.csv)?;
    info!(path = %path.display(), rows = export.rows, "CSV written");

    let mut out = std::io::stdout().lock();
    writeln!(out, "Exported {} rows to {}", export.rows, path.display())?;
    Ok(())
}
