//! Structured error types for gridedit.
//!
//! Algorithmic code (similarity, matching, windowing) never fails. Everything
//! that can be rejected goes through [`GridError`] and is checked before any
//! state is touched.

/// All errors that can occur while ingesting, searching or editing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Ingestion produced no rows.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Search/replace invoked without a query.
    #[error("search term is empty")]
    EmptyQuery,

    /// Two columns share the same id.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    /// A column id that the dataset does not define.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A search option or config value outside its domain.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Delimited text could not be read or written.
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The literal search pattern could not be compiled.
    #[error("search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Clipboard access was denied or unavailable.
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or record JSON could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
