use serde::{Deserialize, Serialize};

/// Default layout width for a column without sizing hints.
pub const DEFAULT_COLUMN_WIDTH: f64 = 150.0;

/// Column descriptor. The id is unique within a dataset and is the key used in
/// every [`Row`](super::Row); the header is display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub id: String,
    pub header: String,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_min_width")]
    pub min_width: f64,
    #[serde(default = "default_max_width")]
    pub max_width: f64,
}

fn default_width() -> f64 {
    DEFAULT_COLUMN_WIDTH
}

fn default_min_width() -> f64 {
    100.0
}

fn default_max_width() -> f64 {
    500.0
}

impl ColumnDescriptor {
    /// Descriptor whose header is the id itself, with default width hints.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            header: id.clone(),
            id,
            width: default_width(),
            min_width: default_min_width(),
            max_width: default_max_width(),
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}
