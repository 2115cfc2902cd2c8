use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A scalar cell value. Values are opaque at the store layer: they are only
/// displayed, searched and exported, never type-checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent/empty field (serialized as `null`)
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text used for display, search and export.
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Interpret a delimited-text field.
    ///
    /// A field becomes a number only when the number prints back to exactly the
    /// same text, so `"007"` or `"1e3"` stay text and export is lossless.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            return Self::Empty;
        }
        match canonical_number(field) {
            Some(n) => Self::Number(n),
            None => Self::Text(field.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Format a number the way it is shown in the grid (`30`, not `30.0`).
pub fn format_number(n: f64) -> String {
    n.to_string()
}

fn canonical_number(field: &str) -> Option<f64> {
    let n = field.parse::<f64>().ok()?;
    (n.is_finite() && format_number(n) == field).then_some(n)
}

/// One dataset row: column id -> value, in column definition order.
pub type Row = IndexMap<String, CellValue>;

/// Addressable unit of the dataset: `(row index, column id)`.
///
/// Ordered by row first, then column id, so sets of cells iterate in a stable
/// reading order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddr {
    #[serde(rename = "rowIndex")]
    pub row: usize,
    #[serde(rename = "columnId")]
    pub column: String,
}

impl CellAddr {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
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

    #[test]
    fn test_from_field_numbers() {
        assert_eq!(CellValue::from_field("30"), CellValue::Number(30.0));
        assert_eq!(CellValue::from_field("-2.5"), CellValue::Number(-2.5));
        assert_eq!(CellValue::from_field(""), CellValue::Empty);
    }

    #[test]
    fn test_from_field_keeps_non_canonical_text() {
        assert_eq!(CellValue::from_field("007"), CellValue::from("007"));
        assert_eq!(CellValue::from_field("1e3"), CellValue::from("1e3"));
        assert_eq!(CellValue::from_field("3.10"), CellValue::from("3.10"));
        assert_eq!(CellValue::from_field("NaN"), CellValue::from("NaN"));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Number(30.0).display_text(), "30");
        assert_eq!(CellValue::Number(0.25).display_text(), "0.25");
        assert_eq!(CellValue::Empty.display_text(), "");
        assert_eq!(CellValue::from("NYC").display_text(), "NYC");
    }

    #[test]
    fn test_untagged_json() {
        let v: Vec<CellValue> = serde_json::from_str(r#"[null, 4, "x"]"#).unwrap();
        assert_eq!(
            v,
            vec![CellValue::Empty, CellValue::Number(4.0), CellValue::from("x")]
        );
    }

    #[test]
    fn test_cell_addr_order() {
        let mut cells = vec![
            CellAddr::new(2, "a"),
            CellAddr::new(1, "b"),
            CellAddr::new(1, "a"),
        ];
        cells.sort();
        assert_eq!(cells[0], CellAddr::new(1, "a"));
        assert_eq!(cells[2], CellAddr::new(2, "a"));
    }
}
