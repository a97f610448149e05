//! `mkt-cli view`: print one page of a table.

use std::io::Write;

use marketplace_admin::components::{DataTableConfig, TableColumn, TableView};
use marketplace_core::Record;

use super::{CliError, Table, TableVisitor, view_state};
use crate::TableArgs;

/// Column separator.
const GAP: &str = "  ";

/// Print the requested page to stdout.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded, the page size is not
/// allowed, or stdout is closed.
pub fn run(args: &TableArgs, page: usize, per_page: usize) -> Result<(), CliError> {
    let table = Table::load(&args.source)?;
    let mut out = std::io::stdout().lock();
    table.visit(PageWriter {
        args,
        page,
        per_page,
        out: &mut out,
    })
}

struct PageWriter<'a, W> {
    args: &'a TableArgs,
    page: usize,
    per_page: usize,
    out: &'a mut W,
}

impl<W: Write> TableVisitor for PageWriter<'_, W> {
    type Output = Result<(), CliError>;

    fn visit<R: Record>(self, records: &[R], config: &DataTableConfig) -> Self::Output {
        let mut state = view_state(self.args, config);
        state.set_page_size(self.per_page)?;

        let view = state.apply(records, config);
        state.go_to_page(self.page, view.total_pages());
        let view = view.at_page(state.page());

        write_page(self.out, &view, &config.columns)?;
        Ok(())
    }
}

/// Write the page as an aligned text table followed by the range summary.
pub fn write_page<W: Write, R: Record>(
    out: &mut W,
    view: &TableView<'_, R>,
    columns: &[TableColumn],
) -> std::io::Result<()> {
    let cells: Vec<Vec<String>> = view
        .page_rows()
        .iter()
        .map(|record| columns.iter().map(|c| c.render(*record).text).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|text| text.chars().count())
                .chain(std::iter::once(column.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
    write_line(out, &labels, &widths)?;
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(out, &rules, &widths)?;
    for row in &cells {
        write_line(out, row, &widths)?;
    }

    writeln!(out)?;
    match view.range() {
        Some((from, to)) => writeln!(
            out,
            "Showing {from} to {to} of {} (page {} of {})",
            view.total(),
            view.page(),
            view.total_pages()
        ),
        None => writeln!(out, "No data found"),
    }
}

fn write_line<W: Write, S: AsRef<str>>(
    out: &mut W,
    fields: &[S],
    widths: &[usize],
) -> std::io::Result<()> {
    let line = fields
        .iter()
        .zip(widths)
        .map(|(field, width)| format!("{:<width$}", field.as_ref()))
        .collect::<Vec<_>>()
        .join(GAP);
    writeln!(out, "{}", line.trim_end())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_admin::components::{ViewState, generic_table_config};
    use marketplace_core::Row;

    use super::*;

    fn people() -> Vec<Row> {
        vec![
            Row::new("1").with("name", "Bob").with("amt", 5),
            Row::new("2").with("name", "Ann").with("amt", 5),
            Row::new("3").with("name", "Cy").with("amt", 1),
        ]
    }

    fn render(state: &ViewState, rows: &[Row]) -> String {
        let config = generic_table_config("people", "People", ["id", "name", "amt"]);
        let view = state.apply(rows, &config);
        let mut out = Vec::new();
        write_page(&mut out, &view, &config.columns).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_aligned_table() {
        let output = render(&ViewState::new(), &people());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "id  name  amt");
        assert_eq!(lines[1], "--  ----  ---");
        assert_eq!(lines[2], "1   Bob   5");
        assert_eq!(lines[4], "3   Cy    1");
        assert_eq!(lines[6], "Showing 1 to 3 of 3 (page 1 of 1)");
    }

    #[test]
    fn test_empty_view() {
        let mut state = ViewState::new();
        state.set_search("zzz");
        let output = render(&state, &people());
        assert!(output.ends_with("No data found\n"));
    }
}
