//! Grid editor facade exported to JavaScript.
//!
//! `GridEdit` owns the editor state behind an `Rc<RefCell<..>>` so an async
//! search can hold a handle to it across yields while the page keeps calling
//! into the editor. It adds:
//! - Dataset load/export (CSV or JS records)
//! - Selection gestures, bulk edit and clipboard copy/paste
//! - Find (async, with progress) and replace-all
//! - Row windowing for the virtualized table

pub(crate) mod clipboard;
pub(crate) mod mutation;
pub mod search_task;
pub mod state;
pub mod store;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
#[cfg(not(target_arch = "wasm32"))]
use crate::error::Result;
use crate::search::SearchOutcome;
use crate::types::{SearchOptions, SearchRequest};

pub use search_task::run_search;
pub use state::{EditorState, SearchJob, SearchState};
pub use store::{DataStore, Rows};

/// The main editor struct exported to JavaScript.
#[wasm_bindgen]
pub struct GridEdit {
    state: Rc<RefCell<EditorState>>,
}

impl GridEdit {
    /// Clamp a requested threshold to the range the search surface offers.
    fn surface_options(&self, mut options: SearchOptions) -> SearchOptions {
        options.threshold = self.state.borrow().config().clamp_threshold(options.threshold);
        options
    }

    /// Fill a host request from the config, then clamp it.
    fn request_options(&self, request: SearchRequest) -> SearchOptions {
        let default_threshold = self.state.borrow().config().default_threshold;
        self.surface_options(request.resolve(default_threshold))
    }
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> std::result::Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("Invalid input: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn count_to_js(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Result of a clipboard paste. A denied clipboard is reported here rather
/// than as a rejected promise.
#[cfg(target_arch = "wasm32")]
#[derive(serde::Serialize)]
struct PasteOutcome {
    written: u32,
    error: Option<String>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl GridEdit {
    /// Create an editor. `config` may be `undefined` or a partial config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<GridEdit, JsValue> {
        crate::logging::init();
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            from_js(config)?
        };
        config.validate()?;
        Ok(GridEdit {
            state: Rc::new(RefCell::new(EditorState::new(config))),
        })
    }

    /// Load a dataset from CSV text. The first record is the header row.
    #[wasm_bindgen]
    pub fn load_csv(&mut self, text: &str) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().load_csv(text)?;
        Ok(())
    }

    /// Load a dataset from column descriptors and an array of flat records.
    #[wasm_bindgen]
    pub fn load_records(&mut self, columns: JsValue, rows: JsValue) -> std::result::Result<(), JsValue> {
        let columns = from_js(columns)?;
        let rows = from_js(rows)?;
        self.state.borrow_mut().load_records(columns, rows)?;
        Ok(())
    }

    /// Export the current data as CSV in display column order.
    #[wasm_bindgen]
    pub fn export_csv(&self) -> std::result::Result<String, JsValue> {
        Ok(self.state.borrow().export_csv()?)
    }

    #[wasm_bindgen]
    pub fn row_count(&self) -> usize {
        self.state.borrow().store().len()
    }

    #[wasm_bindgen]
    pub fn columns(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.state.borrow().store().columns())
    }

    #[wasm_bindgen]
    pub fn column_order(&self) -> Vec<String> {
        self.state.borrow().column_order().to_vec()
    }

    #[wasm_bindgen]
    pub fn set_column_order(&mut self, ids: Vec<String>) {
        self.state.borrow_mut().set_column_order(&ids);
    }

    /// Rows `start..=end` as plain objects.
    #[wasm_bindgen]
    pub fn rows(&self, start: usize, end: usize) -> std::result::Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let rows = s.store().rows();
        let end = end.saturating_add(1).min(rows.len());
        let slice: Vec<&crate::types::Row> = rows
            .get(start.min(end)..end)
            .unwrap_or_default()
            .iter()
            .map(AsRef::as_ref)
            .collect();
        to_js(&slice)
    }

    #[wasm_bindgen]
    pub fn cell_text(&self, row_index: usize, column_id: &str) -> Option<String> {
        let s = self.state.borrow();
        s.store()
            .cell(row_index, column_id)
            .map(|v| v.display_text().into_owned())
    }

    /// Set one cell. Returns `false` if the cell does not exist.
    #[wasm_bindgen]
    pub fn update_cell(&mut self, row_index: usize, column_id: &str, value: JsValue) -> std::result::Result<bool, JsValue> {
        let value = from_js(value)?;
        Ok(self.state.borrow_mut().update_cell(row_index, column_id, value))
    }

    /// Apply `[{rowIndex, columnId, newValue}]` as one step. Returns the number
    /// of records applied.
    #[wasm_bindgen]
    pub fn bulk_update(&mut self, records: JsValue) -> std::result::Result<u32, JsValue> {
        let records: Vec<crate::types::MutationRecord> = from_js(records)?;
        Ok(count_to_js(self.state.borrow_mut().bulk_update(&records)))
    }

    #[wasm_bindgen]
    pub fn is_dirty(&self) -> bool {
        self.state.borrow().is_dirty()
    }

    #[wasm_bindgen]
    pub fn revert_to_original(&mut self) {
        self.state.borrow_mut().revert_to_original();
    }

    // ---- Selection ----

    #[wasm_bindgen]
    pub fn select_cell(&mut self, row_index: usize, column_id: &str, is_multi: bool, is_range: bool) {
        self.state
            .borrow_mut()
            .select_cell(row_index, column_id, is_multi, is_range);
    }

    #[wasm_bindgen]
    pub fn add_cell_to_selection(&mut self, row_index: usize, column_id: &str) {
        self.state.borrow_mut().add_cell_to_selection(row_index, column_id);
    }

    #[wasm_bindgen]
    pub fn clear_selection(&mut self) {
        self.state.borrow_mut().clear_selection();
    }

    #[wasm_bindgen]
    pub fn begin_drag(&mut self) {
        self.state.borrow_mut().begin_drag();
    }

    #[wasm_bindgen]
    pub fn end_drag(&mut self) {
        self.state.borrow_mut().end_drag();
    }

    #[wasm_bindgen]
    pub fn is_dragging(&self) -> bool {
        self.state.borrow().selection().is_dragging()
    }

    #[wasm_bindgen]
    pub fn is_selected(&self, row_index: usize, column_id: &str) -> bool {
        self.state.borrow().selection().contains(row_index, column_id)
    }

    /// Selected cells as `[{rowIndex, columnId}]`.
    #[wasm_bindgen]
    pub fn selected_cells(&self) -> std::result::Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let cells: Vec<_> = s.selection().cells().collect();
        to_js(&cells)
    }

    /// Apply `value` to every selected cell (`mode`: replace, append or
    /// prepend) and clear the selection.
    #[wasm_bindgen]
    pub fn bulk_edit(&mut self, value: &str, mode: &str) -> std::result::Result<u32, JsValue> {
        let mode: crate::types::BulkEditMode = mode.parse()?;
        Ok(count_to_js(self.state.borrow_mut().bulk_edit(value, mode)))
    }

    #[wasm_bindgen]
    pub fn preview_bulk_edit(&self, value: &str, mode: &str, limit: usize) -> std::result::Result<JsValue, JsValue> {
        let mode: crate::types::BulkEditMode = mode.parse()?;
        to_js(&self.state.borrow().preview_bulk_edit(value, mode, limit))
    }

    /// Copy the selection to the clipboard as TSV. Returns `false` when
    /// nothing is selected.
    #[wasm_bindgen]
    pub fn copy_selection(&self) -> bool {
        let Some(text) = self.state.borrow().copy_selection_tsv() else {
            return false;
        };
        clipboard::write_clipboard_text(&text);
        true
    }

    /// Paste clipboard text into every selected cell.
    ///
    /// Resolves to `{written, error}`. When the clipboard cannot be read,
    /// `written` is 0, `error` holds the message and no cell changes.
    #[wasm_bindgen]
    pub fn paste_into_selection(&self) -> js_sys::Promise {
        let state = Rc::clone(&self.state);
        wasm_bindgen_futures::future_to_promise(async move {
            let outcome = match clipboard::read_clipboard_text().await {
                Ok(text) => PasteOutcome {
                    written: count_to_js(state.borrow_mut().paste_text(&text)),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("paste failed: {e}");
                    PasteOutcome {
                        written: 0,
                        error: Some(e.to_string()),
                    }
                }
            };
            to_js(&outcome)
        })
    }

    // ---- Find / replace ----

    /// Search the dataset. Resolves to the result array, or `null` when a
    /// newer search or a data change superseded this one.
    ///
    /// `on_progress` is called with `{percent, scanned, total}`.
    #[wasm_bindgen]
    pub fn search(
        &self,
        query: String,
        options: JsValue,
        on_progress: Option<js_sys::Function>,
    ) -> std::result::Result<js_sys::Promise, JsValue> {
        let options = self.request_options(parse_options(options)?);
        let state = Rc::clone(&self.state);
        Ok(wasm_bindgen_futures::future_to_promise(async move {
            let outcome = run_search(state, &query, &options, |progress| {
                if let (Some(callback), Ok(value)) = (on_progress.as_ref(), to_js(&progress)) {
                    let _ = callback.call1(&JsValue::NULL, &value);
                }
            })
            .await?;
            match outcome {
                SearchOutcome::Completed(results) => to_js(&results),
                SearchOutcome::Superseded => Ok(JsValue::NULL),
            }
        }))
    }

    #[wasm_bindgen]
    pub fn cancel_search(&mut self) {
        self.state.borrow_mut().cancel_search();
    }

    #[wasm_bindgen]
    pub fn search_results(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.state.borrow().search().results)
    }

    #[wasm_bindgen]
    pub fn search_stats(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.state.borrow().search().stats)
    }

    #[wasm_bindgen]
    pub fn search_progress(&self) -> u8 {
        self.state.borrow().search().progress
    }

    #[wasm_bindgen]
    pub fn search_status(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.state.borrow().search().status)
    }

    /// Replace every match and return the number of cells changed.
    #[wasm_bindgen]
    pub fn replace_all(&mut self, query: &str, replacement: &str, options: JsValue) -> std::result::Result<u32, JsValue> {
        let options = self.request_options(parse_options(options)?);
        let changed = self.state.borrow_mut().replace_all(query, replacement, &options)?;
        Ok(count_to_js(changed))
    }

    // ---- Viewport ----

    /// `{startIndex, endIndex, overscan, leadingPadding, trailingPadding}`, or
    /// `null` when there is nothing to render.
    #[wasm_bindgen]
    pub fn visible_window(&self) -> std::result::Result<JsValue, JsValue> {
        match self.state.borrow().visible_window() {
            Some(window) => to_js(&window),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen]
    pub fn set_scroll(&mut self, offset: f64) {
        self.state.borrow_mut().set_scroll(offset);
    }

    #[wasm_bindgen]
    pub fn scroll_by(&mut self, delta: f64) {
        self.state.borrow_mut().scroll_by(delta);
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, height: f64) {
        self.state.borrow_mut().resize_viewport(height);
    }

    #[wasm_bindgen]
    pub fn scroll_offset(&self) -> f64 {
        self.state.borrow().viewport().scroll_offset
    }

    /// Scroll the `index`-th search result into view.
    #[wasm_bindgen]
    pub fn scroll_to_result(&mut self, index: usize) -> bool {
        self.state.borrow_mut().scroll_to_result(index)
    }
}

#[cfg(target_arch = "wasm32")]
fn parse_options(options: JsValue) -> std::result::Result<SearchRequest, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(SearchRequest::default());
    }
    from_js(options)
}

// ============================================================================
// Non-WASM32 Implementation (for tests/CLI)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl GridEdit {
    /// Create an editor with the default config (non-WASM, for testing/CLI).
    #[must_use]
    pub fn new_test() -> Self {
        Self {
            state: Rc::new(RefCell::new(EditorState::default())),
        }
    }

    /// Create an editor with a custom config. Rejects configs that fail
    /// [`EditorConfig::validate`].
    pub fn with_config(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Rc::new(RefCell::new(EditorState::new(config))),
        })
    }

    /// Search with options as a host submits them: a missing threshold comes
    /// from the config, and the result is clamped to the surface range.
    pub async fn search_request(&self, query: &str, request: SearchRequest) -> Result<SearchOutcome> {
        let options = self.request_options(request);
        run_search(Rc::clone(&self.state), query, &options, |_| {}).await
    }

    /// Shared handle to the editor state.
    pub fn state(&self) -> Rc<RefCell<EditorState>> {
        Rc::clone(&self.state)
    }

    pub fn load_csv(&mut self, text: &str) -> Result<()> {
        self.state.borrow_mut().load_csv(text)
    }

    pub fn export_csv(&self) -> Result<String> {
        self.state.borrow().export_csv()
    }

    /// Search with the threshold clamped to the configured surface range.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Result<SearchOutcome> {
        let options = self.surface_options(options);
        run_search(Rc::clone(&self.state), query, &options, |_| {}).await
    }

    pub fn replace_all(&mut self, query: &str, replacement: &str, options: SearchOptions) -> Result<usize> {
        let options = self.surface_options(options);
        self.state.borrow_mut().replace_all(query, replacement, &options)
    }
}
