//! CSV export of table views.
//!
//! Exports write the raw field values (not the rendered cells) of every row
//! in the current view order, under a header of column labels.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use marketplace_core::{Record, Value};

use super::data_table::TableColumn;

/// How fields are quoted in exported CSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvQuoting {
    /// Quote only text containing a comma. Embedded quotes and newlines are
    /// written as-is, matching files produced by earlier admin releases.
    #[default]
    Legacy,
    /// RFC 4180: quote fields containing a comma, quote, CR or LF, and
    /// double embedded quotes.
    Rfc4180,
}

impl std::str::FromStr for CsvQuoting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "rfc4180" => Ok(Self::Rfc4180),
            other => Err(format!("unknown CSV quoting mode: {other}")),
        }
    }
}

fn quote_field(out: &mut String, value: &Value, quoting: CsvQuoting) {
    let text = value.to_string();
    let needs_quotes = match quoting {
        CsvQuoting::Legacy => matches!(value, Value::Text(_)) && text.contains(','),
        CsvQuoting::Rfc4180 => text.contains([',', '"', '\r', '\n']),
    };

    if !needs_quotes {
        out.push_str(&text);
        return;
    }

    out.push('"');
    match quoting {
        CsvQuoting::Legacy => out.push_str(&text),
        CsvQuoting::Rfc4180 => out.push_str(&text.replace('"', "\"\"")),
    }
    out.push('"');
}

/// Serialize `rows` to CSV.
///
/// The first line is the column labels joined by commas; each following line
/// is one row's raw values for the same columns. Lines are joined with `\n`
/// and there is no trailing newline.
pub fn export_csv<R: Record>(rows: &[R], columns: &[TableColumn], quoting: CsvQuoting) -> String {
    let mut csv = columns
        .iter()
        .map(|c| c.label.as_str())
        .collect::<Vec<_>>()
        .join(",");

    for row in rows {
        csv.push('\n');
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                csv.push(',');
            }
            quote_field(&mut csv, &row.field(&column.key), quoting);
        }
    }

    csv
}

/// Download filename: `{title}-{timestamp}.csv`.
///
/// The timestamp is UTC ISO-8601 with milliseconds. A blank title becomes
/// `export`.
#[must_use]
pub fn export_filename(title: Option<&str>, at: DateTime<Utc>) -> String {
    let title = title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or("export");
    let mut name = String::with_capacity(title.len() + 30);
    let _ = write!(
        name,
        "{title}-{}.csv",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    name
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use marketplace_core::Row;

    use super::*;

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::sortable("name", "Name"),
            TableColumn::sortable("amt", "Amount"),
        ]
    }

    #[test]
    fn test_export_header_and_rows() {
        let rows = vec![
            Row::new("1").with("name", "Bob").with("amt", 5_i64),
            Row::new("2").with("name", "Ann").with("amt", 9_i64),
        ];
        let csv = export_csv(&rows, &columns(), CsvQuoting::Legacy);
        assert_eq!(csv, "Name,Amount\nBob,5\nAnn,9");
    }

    #[test]
    fn test_export_empty_view_is_header_only() {
        let rows: Vec<Row> = vec![];
        assert_eq!(export_csv(&rows, &columns(), CsvQuoting::Legacy), "Name,Amount");
    }

    #[test]
    fn test_export_missing_field_is_empty() {
        let rows = vec![Row::new("1").with("name", "Bob")];
        assert_eq!(
            export_csv(&rows, &columns(), CsvQuoting::Legacy),
            "Name,Amount\nBob,"
        );
    }

    #[test]
    fn test_export_uses_raw_values() {
        use crate::components::data_table::CurrencyRenderer;

        let columns = vec![TableColumn::sortable("amt", "Amount").render_with(CurrencyRenderer)];
        let rows = vec![Row::new("1").with("amt", 125_000_i64)];
        assert_eq!(
            export_csv(&rows, &columns, CsvQuoting::Legacy),
            "Amount\n125000"
        );
    }

    #[test]
    fn test_legacy_quotes_text_with_commas_only() {
        let rows = vec![
            Row::new("1").with("name", "Spice, Garden").with("amt", 5_i64),
            Row::new("2").with("name", "Say \"hi\", ok").with("amt", 1_i64),
            Row::new("3").with("name", "Plain \"quote\"").with("amt", 2_i64),
        ];
        let csv = export_csv(&rows, &columns(), CsvQuoting::Legacy);
        assert_eq!(
            csv,
            "Name,Amount\n\"Spice, Garden\",5\n\"Say \"hi\", ok\",1\nPlain \"quote\",2"
        );
    }

    #[test]
    fn test_rfc4180_escapes_quotes_and_newlines() {
        let rows = vec![
            Row::new("1").with("name", "Say \"hi\", ok").with("amt", 1_i64),
            Row::new("2").with("name", "two\nlines").with("amt", 2_i64),
            Row::new("3").with("name", "plain").with("amt", 3_i64),
        ];
        let csv = export_csv(&rows, &columns(), CsvQuoting::Rfc4180);
        assert_eq!(
            csv,
            "Name,Amount\n\"Say \"\"hi\"\", ok\",1\n\"two\nlines\",2\nplain,3"
        );
    }

    #[test]
    fn test_export_accepts_borrowed_rows() {
        let rows = vec![Row::new("1").with("name", "Bob").with("amt", 5_i64)];
        let view: Vec<&Row> = rows.iter().collect();
        assert_eq!(
            export_csv(&view, &columns(), CsvQuoting::Legacy),
            "Name,Amount\nBob,5"
        );
    }

    #[test]
    fn test_export_filename() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(
            export_filename(Some("Merchants"), at),
            "Merchants-2024-03-05T14:07:09.042Z.csv"
        );
        assert_eq!(
            export_filename(None, at),
            "export-2024-03-05T14:07:09.042Z.csv"
        );
        assert_eq!(
            export_filename(Some("  "), at),
            "export-2024-03-05T14:07:09.042Z.csv"
        );
    }

    #[test]
    fn test_quoting_parse() {
        assert_eq!("rfc4180".parse::<CsvQuoting>().unwrap(), CsvQuoting::Rfc4180);
        assert_eq!("legacy".parse::<CsvQuoting>().unwrap(), CsvQuoting::Legacy);
        assert!("excel".parse::<CsvQuoting>().is_err());
    }
}
