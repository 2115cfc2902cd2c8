//! CSV ingestion and export.
//!
//! The first record is the header row and supplies the column ids. Fields are
//! typed with [`CellValue::from_field`], so exporting and re-ingesting a
//! dataset gives back the same values.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::config::ColumnSizing;
use crate::error::{GridError, Result};
use crate::types::{CellValue, ColumnDescriptor, Row};

/// Columns and rows read from delimited text.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
}

/// Parse CSV text. Blank lines are skipped, but a record of empty fields
/// (`,,`) is kept as a row of empty values. Short records are padded with
/// empty values and fields past the header width are dropped.
pub fn parse_csv(text: &str, sizing: &ColumnSizing) -> Result<ParsedTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    for (index, header) in reader.headers()?.iter().enumerate() {
        let id = if header.is_empty() {
            format!("column_{}", index + 1)
        } else {
            header.to_string()
        };
        if !seen.insert(id.clone()) {
            return Err(GridError::DuplicateColumn(id));
        }
        ids.push(id);
    }
    if ids.is_empty() {
        return Err(GridError::EmptyDataset);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let value = record.get(i).map(CellValue::from_field).unwrap_or_default();
                (id.clone(), value)
            })
            .collect();
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(GridError::EmptyDataset);
    }

    let columns = ids
        .into_iter()
        .map(|id| {
            let width = column_width(&id, &rows, sizing);
            let mut column = ColumnDescriptor::new(id).with_width(width);
            column.min_width = sizing.min_width;
            column.max_width = sizing.max_width;
            column
        })
        .collect();

    debug!(rows = rows.len(), "parsed CSV");
    Ok(ParsedTable { columns, rows })
}

/// Width hint from the header and the first `sample_rows` values.
fn column_width(id: &str, rows: &[Row], sizing: &ColumnSizing) -> f64 {
    let header = id.chars().count() as f64 * sizing.char_width + sizing.padding;
    let longest = rows
        .iter()
        .take(sizing.sample_rows)
        .filter_map(|row| row.get(id))
        .map(|v| v.display_text().chars().count())
        .max()
        .unwrap_or(0);
    let content =
        (longest as f64 * sizing.char_width * sizing.content_factor).floor() + sizing.padding;
    header.max(content).clamp(sizing.min_width, sizing.max_width)
}

/// Write rows as CSV with `column_order` as the header. An empty dataset
/// exports as an empty string.
pub fn to_csv(rows: &[Arc<Row>], column_order: &[String]) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(column_order)?;
    for row in rows {
        writer.write_record(column_order.iter().map(|id| {
            row.get(id)
                .map(|v| v.display_text().into_owned())
                .unwrap_or_default()
        }))?;
    }
    let bytes = writer.into_inner().map_err(|e| GridError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| GridError::Other(e.to_string()))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn sizing() -> ColumnSizing {
        ColumnSizing::default()
    }

    #[test]
    fn test_parse_basic() {
        let table = parse_csv("name,age\nJon,30\n\nJohn,25\n", &sizing()).unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("age"), Some(&CellValue::Number(30.0)));
    }

    #[test]
    fn test_empty_fields_keep_their_row() {
        let table = parse_csv("a,b\n1,2\n,\n3,4\n", &sizing()).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].get("a"), Some(&CellValue::Empty));
        assert_eq!(table.rows[2].get("a"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_short_and_long_records() {
        let table = parse_csv("a,b\n1\n2,3,4\n", &sizing()).unwrap();
        assert_eq!(table.rows[0].get("b"), Some(&CellValue::Empty));
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_bom_and_quotes() {
        let table = parse_csv("\u{feff}name\n\"Doe, Jane\"\n", &sizing()).unwrap();
        assert_eq!(table.columns[0].id, "name");
        assert_eq!(table.rows[0].get("name"), Some(&CellValue::from("Doe, Jane")));
    }

    #[test]
    fn test_rejects_duplicate_headers_and_empty() {
        assert!(matches!(
            parse_csv("a,a\n1,2\n", &sizing()),
            Err(GridError::DuplicateColumn(_))
        ));
        assert!(matches!(parse_csv("a,b\n", &sizing()), Err(GridError::EmptyDataset)));
        assert!(matches!(parse_csv("", &sizing()), Err(GridError::EmptyDataset)));
    }

    #[test]
    fn test_column_width_bounds() {
        let long = "x".repeat(200);
        let table = parse_csv(&format!("id,notes\n1,{long}\n"), &sizing()).unwrap();
        assert_eq!(table.columns[0].width, 100.0);
        assert_eq!(table.columns[1].width, 500.0);

        let table = parse_csv("id,city\n1,Springfield\n", &sizing()).unwrap();
        // 11 chars * 10 * 0.85 = 93.5 -> 93 + 60
        assert_eq!(table.columns[1].width, 153.0);
    }

    #[test]
    fn test_export_quotes_and_order() {
        let mut row = Row::new();
        row.insert("name".into(), "Doe, \"J\"".into());
        row.insert("age".into(), CellValue::Number(30.0));
        let text = to_csv(&[Arc::new(row)], &["age".into(), "name".into()]).unwrap();
        assert_eq!(text, "age,name\r\n30,\"Doe, \"\"J\"\"\"\r\n");
    }

    #[test]
    fn test_export_empty() {
        assert_eq!(to_csv(&[], &["a".into()]).unwrap(), "");
    }
}
