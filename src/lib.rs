//! gridedit - tabular data editing engine for the web
//!
//! The data side of an in-browser table editor, compiled to WebAssembly:
//! - Exact and fuzzy (edit-distance) find over every cell, with progress,
//!   without blocking the page
//! - Replace-all applied as one atomic bulk update
//! - Point, multi and range cell selection with bulk edit and clipboard paste
//! - Row windowing for virtualized rendering of 100k+ rows
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridEdit } from 'gridedit';
//! await init();
//! const grid = new GridEdit({ rowHeight: 35 });
//! grid.load_csv(text);
//! const results = await grid.search('Jon', { fuzzy: true, threshold: 0.6 }, p => bar(p.percent));
//! grid.replace_all('Jon', 'Jonathan', { fuzzy: false });
//! ```

pub mod config;
pub mod csv;
pub mod error;
pub mod logging;
pub mod types;

// Engine
pub mod editor;
pub mod layout;
pub mod search;

use wasm_bindgen::prelude::*;

// Re-export the main editor struct
pub use editor::GridEdit;

pub use config::{ColumnSizing, EditorConfig};
pub use error::{GridError, Result};
pub use layout::{compute_window, RowWindow, Viewport};
pub use search::{similarity, SearchOutcome, SearchProgress};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
