//! Editor state: the store plus everything the grid derives from it.
//!
//! `EditorState` is the single writer for the dataset, the selection and the
//! published search results. Every method runs to completion, so callers never
//! observe a half-applied change. The only work that spans several turns is a
//! search scan, which runs on a [`SearchJob`] snapshot and publishes through
//! [`EditorState::complete_search`] only while its ticket is current.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::csv::{parse_csv, to_csv};
use crate::error::{GridError, Result};
use crate::layout::{RowWindow, Viewport};
use crate::search::{
    plan_replace, resolve_scope, validate_options, SearchGeneration, SearchProgress, SearchTicket,
};
use crate::types::{
    BulkEditMode, BulkEditPreview, CellValue, ColumnDescriptor, MatchStats, MutationRecord, Row,
    SearchOptions, SearchResult, SearchStatus, Selection,
};

use super::clipboard::selection_to_tsv;
use super::mutation::{bulk_edit_records, preview_bulk_edit};
use super::store::{DataStore, Rows};

/// Published search state.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub stats: MatchStats,
    /// 0..=100
    pub progress: u8,
    pub status: SearchStatus,
    generation: SearchGeneration,
}

impl SearchState {
    fn reset(&mut self) {
        self.results.clear();
        self.stats = MatchStats::default();
        self.progress = 0;
        self.status = SearchStatus::Idle;
    }
}

/// Everything a scan needs, captured when it starts.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub rows: Rows,
    pub scope: Vec<String>,
    pub query: String,
    pub options: SearchOptions,
    pub ticket: SearchTicket,
    pub step_percent: u8,
}

#[derive(Debug)]
pub struct EditorState {
    config: EditorConfig,
    store: DataStore,
    /// Display order of column ids; never touches row data
    column_order: Vec<String>,
    selection: Selection,
    search: SearchState,
    viewport: Viewport,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        let viewport = Viewport::new(config.row_height, config.overscan);
        Self {
            config,
            store: DataStore::new(),
            column_order: Vec::new(),
            selection: Selection::new(),
            search: SearchState::default(),
            viewport,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn column_order(&self) -> &[String] {
        &self.column_order
    }

    // ------------------------------------------------------------------
    // Dataset
    // ------------------------------------------------------------------

    /// Ingest delimited text. Nothing changes if the text is rejected.
    pub fn load_csv(&mut self, text: &str) -> Result<()> {
        let table = parse_csv(text, &self.config.column_sizing)?;
        self.load_records(table.columns, table.rows)
    }

    /// Replace the dataset with `rows` described by `columns`.
    pub fn load_records(&mut self, columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Result<()> {
        self.store.set_dataset(columns, rows)?;
        self.column_order = self.store.columns().iter().map(|c| c.id.clone()).collect();
        self.selection.clear();
        self.invalidate_search();
        self.viewport.set_scroll(0.0, self.store.len());
        info!(
            rows = self.store.len(),
            columns = self.column_order.len(),
            "dataset ingested"
        );
        Ok(())
    }

    /// Current rows as delimited text, in display column order.
    pub fn export_csv(&self) -> Result<String> {
        to_csv(self.store.rows(), &self.column_order)
    }

    /// Reorder columns. Unknown ids are dropped and columns left out are
    /// appended in definition order.
    pub fn set_column_order(&mut self, ids: &[String]) {
        let mut seen = HashSet::new();
        let mut order: Vec<String> = ids
            .iter()
            .filter(|id| self.store.has_column(id) && seen.insert(id.as_str()))
            .cloned()
            .collect();
        for column in self.store.columns() {
            if !seen.contains(column.id.as_str()) {
                order.push(column.id.clone());
            }
        }
        self.column_order = order;
    }

    pub fn update_cell(&mut self, row_index: usize, column_id: &str, value: CellValue) -> bool {
        let applied = self.store.update_cell(row_index, column_id, value);
        if applied {
            self.invalidate_search();
        }
        applied
    }

    pub fn bulk_update(&mut self, records: &[MutationRecord]) -> usize {
        let applied = self.store.bulk_update(records);
        if applied > 0 {
            self.invalidate_search();
        }
        applied
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn revert_to_original(&mut self) {
        if self.store.is_dirty() {
            self.store.revert_to_original();
            self.invalidate_search();
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_cell(&mut self, row_index: usize, column_id: &str, is_multi: bool, is_range: bool) {
        self.selection
            .select_cell(row_index, column_id, is_multi, is_range, &self.column_order);
    }

    pub fn add_cell_to_selection(&mut self, row_index: usize, column_id: &str) {
        self.selection.add_cell(row_index, column_id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn begin_drag(&mut self) {
        self.selection.begin_drag();
    }

    pub fn end_drag(&mut self) {
        self.selection.end_drag();
    }

    /// Apply `input` to every selected cell, then clear the selection.
    /// Returns how many cells changed.
    pub fn bulk_edit(&mut self, input: &str, mode: BulkEditMode) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let records = bulk_edit_records(&self.store, self.selection.cells(), input, mode);
        let applied = self.bulk_update(&records);
        self.selection.clear();
        debug!(applied, ?mode, "bulk edit");
        applied
    }

    pub fn preview_bulk_edit(&self, input: &str, mode: BulkEditMode, limit: usize) -> Vec<BulkEditPreview> {
        preview_bulk_edit(&self.store, self.selection.cells(), input, mode, limit)
    }

    /// Write the same pasted text into every selected cell.
    pub fn paste_text(&mut self, text: &str) -> usize {
        self.bulk_edit(text, BulkEditMode::Replace)
    }

    pub fn copy_selection_tsv(&self) -> Option<String> {
        selection_to_tsv(&self.store, &self.selection, &self.column_order)
    }

    // ------------------------------------------------------------------
    // Find / replace
    // ------------------------------------------------------------------

    /// Replace every match as one bulk update. Returns the number of cells
    /// changed.
    pub fn replace_all(&mut self, query: &str, replacement: &str, options: &SearchOptions) -> Result<usize> {
        if query.is_empty() {
            return Err(GridError::EmptyQuery);
        }
        let scope = resolve_scope(self.store.columns(), &options.column_scope)?;
        let records = plan_replace(self.store.rows(), &scope, query, replacement, options)?;
        let applied = self.bulk_update(&records);
        info!(applied, "replace all");
        Ok(applied)
    }

    /// Start a search, superseding any scan in flight.
    ///
    /// Options are checked before anything changes. An empty query clears the
    /// published results and returns `None`: there is nothing to scan.
    pub fn begin_search(&mut self, query: &str, options: &SearchOptions) -> Result<Option<SearchJob>> {
        if query.is_empty() {
            self.search.generation.supersede();
            self.search.query.clear();
            self.search.reset();
            return Ok(None);
        }
        validate_options(options)?;
        let scope = resolve_scope(self.store.columns(), &options.column_scope)?;

        let ticket = self.search.generation.begin();
        self.search.reset();
        self.search.query = query.to_string();
        self.search.status = SearchStatus::Running;
        debug!(ticket = ticket.id(), query, "search requested");
        Ok(Some(SearchJob {
            rows: self.store.snapshot(),
            scope,
            query: query.to_string(),
            options: options.clone(),
            ticket,
            step_percent: self.config.progress_step(),
        }))
    }

    /// Record progress from a scan. Stale tickets are ignored.
    pub fn record_progress(&mut self, ticket: &SearchTicket, progress: SearchProgress) {
        if ticket.is_current() {
            self.search.progress = progress.percent.max(self.search.progress);
        }
    }

    /// Publish a finished scan. Returns `false` (leaving newer state alone)
    /// when the ticket has been superseded.
    pub fn complete_search(&mut self, ticket: &SearchTicket, results: Vec<SearchResult>) -> bool {
        if !ticket.is_current() {
            debug!(ticket = ticket.id(), "dropping superseded search results");
            return false;
        }
        self.search.stats = MatchStats::from_results(&results);
        self.search.results = results;
        self.search.progress = 100;
        self.search.status = SearchStatus::Done;
        info!(
            total = self.search.stats.total,
            exact = self.search.stats.exact,
            fuzzy = self.search.stats.fuzzy,
            "search finished"
        );
        true
    }

    /// Stop the scan in flight; it ends at its next yield point.
    pub fn cancel_search(&mut self) {
        self.search.generation.supersede();
        if self.search.status == SearchStatus::Running {
            self.search.status = SearchStatus::Idle;
            self.search.progress = 0;
        }
    }

    /// Drop published results, e.g. after the data changed underneath them.
    pub fn invalidate_search(&mut self) {
        self.search.generation.supersede();
        self.search.reset();
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    pub fn visible_window(&self) -> Option<RowWindow> {
        self.viewport.window(self.store.len())
    }

    pub fn set_scroll(&mut self, offset: f64) {
        self.viewport.set_scroll(offset, self.store.len());
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.viewport.scroll_by(delta, self.store.len());
    }

    pub fn resize_viewport(&mut self, height: f64) {
        self.viewport.resize(height, self.store.len());
    }

    /// Bring the `index`-th search result into view.
    pub fn scroll_to_result(&mut self, index: usize) -> bool {
        let Some(row) = self.search.results.get(index).map(|r| r.row_index) else {
            return false;
        };
        self.viewport.scroll_to_row(row, self.store.len())
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

    fn state() -> EditorState {
        let mut state = EditorState::default();
        state.load_csv("name,age,city\nJon,30,NYC\nJohn,25,LA\n").unwrap();
        state
    }

    #[test]
    fn test_set_column_order() {
        let mut state = state();
        state.set_column_order(&["city".into(), "bogus".into(), "city".into()]);
        assert_eq!(state.column_order(), ["city", "name", "age"]);
    }

    #[test]
    fn test_mutation_invalidates_results() {
        let mut state = state();
        let job = state.begin_search("Jon", &SearchOptions::default()).unwrap().unwrap();
        let result = SearchResult {
            row_index: 0,
            column_id: "name".into(),
            match_index: 0,
            matched_text: "Jon".into(),
            score: 1.0,
            exact: true,
        };
        assert!(state.complete_search(&job.ticket, vec![result]));
        assert_eq!(state.search().stats.total, 1);

        state.update_cell(1, "city", "SF".into());
        assert!(state.search().results.is_empty());
        assert_eq!(state.search().status, SearchStatus::Idle);
    }

    #[test]
    fn test_stale_ticket_cannot_publish() {
        let mut state = state();
        let old = state.begin_search("Jon", &SearchOptions::default()).unwrap().unwrap();
        let new = state.begin_search("LA", &SearchOptions::default()).unwrap().unwrap();
        assert!(!state.complete_search(&old.ticket, Vec::new()));
        assert_eq!(state.search().status, SearchStatus::Running);
        assert!(state.complete_search(&new.ticket, Vec::new()));
        assert_eq!(state.search().status, SearchStatus::Done);
    }

    #[test]
    fn test_unknown_scope_rejected_up_front() {
        let mut state = state();
        let options = SearchOptions::default().in_columns(["zip"]);
        assert!(matches!(
            state.begin_search("x", &options),
            Err(GridError::UnknownColumn(_))
        ));
        assert_eq!(state.search().status, SearchStatus::Idle);
    }

    #[test]
    fn test_bulk_edit_clears_selection() {
        let mut state = state();
        state.select_cell(0, "name", false, false);
        state.select_cell(1, "name", true, false);
        assert_eq!(state.bulk_edit("!", BulkEditMode::Append), 2);
        assert!(state.selection().is_empty());
        assert_eq!(state.store().cell(1, "name"), Some(&CellValue::from("John!")));
        assert!(state.is_dirty());
    }
}
