use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::CellValue;
use crate::error::GridError;

/// One change instruction against the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    pub row_index: usize,
    pub column_id: String,
    #[serde(rename = "newValue", alias = "value")]
    pub value: CellValue,
}

impl MutationRecord {
    pub fn new(row_index: usize, column_id: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            row_index,
            column_id: column_id.into(),
            value: value.into(),
        }
    }
}

/// How a bulk edit combines the new text with each selected cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkEditMode {
    /// Overwrite the existing value
    #[default]
    Replace,
    /// Add to the end of the existing value
    Append,
    /// Add to the beginning of the existing value
    Prepend,
}

impl BulkEditMode {
    /// Value a cell holding `current` ends up with.
    pub fn apply(self, current: &str, input: &str) -> String {
        match self {
            Self::Replace => input.to_string(),
            Self::Append => format!("{current}{input}"),
            Self::Prepend => format!("{input}{current}"),
        }
    }
}

impl FromStr for BulkEditMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "append" => Ok(Self::Append),
            "prepend" => Ok(Self::Prepend),
            other => Err(GridError::InvalidOption(format!("edit mode '{other}'"))),
        }
    }
}

/// Preview line shown before a bulk edit is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditPreview {
    pub row_index: usize,
    pub column_id: String,
    pub header: String,
    pub current_value: String,
    pub future_value: String,
}
