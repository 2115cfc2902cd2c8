//! Owned, copy-on-write row store.
//!
//! Rows live behind `Arc`s. A mutation clones only the rows it touches (and
//! the row vector itself if a snapshot still shares it), so snapshots handed
//! to an in-flight search or kept as the pristine original never change.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{GridError, Result};
use crate::types::{CellValue, ColumnDescriptor, MutationRecord, Row};

/// Shared, immutable view of the row sequence.
pub type Rows = Arc<Vec<Arc<Row>>>;

#[derive(Debug, Clone, Default)]
pub struct DataStore {
    columns: Vec<ColumnDescriptor>,
    rows: Rows,
    original: Rows,
    /// Bumped on every successful change
    revision: u64,
    dirty: bool,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole dataset and snapshot it as the original.
    ///
    /// Rows are normalized to the column set: missing fields become empty,
    /// unknown fields are dropped, and entries follow column order.
    pub fn set_dataset(&mut self, columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Result<()> {
        if rows.is_empty() || columns.is_empty() {
            return Err(GridError::EmptyDataset);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(GridError::DuplicateColumn(column.id.clone()));
            }
        }

        let rows: Vec<Arc<Row>> = rows
            .into_iter()
            .map(|mut row| {
                let shaped: Row = columns
                    .iter()
                    .map(|c| (c.id.clone(), row.swap_remove(&c.id).unwrap_or_default()))
                    .collect();
                Arc::new(shaped)
            })
            .collect();

        debug!(rows = rows.len(), columns = columns.len(), "dataset loaded");
        self.columns = columns;
        self.rows = Arc::new(rows);
        self.original = Arc::clone(&self.rows);
        self.revision = self.revision.wrapping_add(1);
        self.dirty = false;
        Ok(())
    }

    /// Set one field. Returns `false` (and changes nothing) when the row or
    /// column does not exist.
    pub fn update_cell(&mut self, row_index: usize, column_id: &str, value: CellValue) -> bool {
        let applied = self.apply(row_index, column_id, value);
        if applied {
            self.touch();
        }
        applied
    }

    /// Apply records in order as one step. Stale rows and unknown columns are
    /// skipped; a later record for the same cell wins. Returns how many
    /// records were applied.
    pub fn bulk_update(&mut self, records: &[MutationRecord]) -> usize {
        let mut applied = 0;
        for record in records {
            if self.apply(record.row_index, &record.column_id, record.value.clone()) {
                applied += 1;
            } else {
                trace!(row = record.row_index, column = %record.column_id, "skipped stale mutation");
            }
        }
        if applied > 0 {
            self.touch();
        }
        debug!(applied, skipped = records.len() - applied, "bulk update");
        applied
    }

    fn apply(&mut self, row_index: usize, column_id: &str, value: CellValue) -> bool {
        if row_index >= self.rows.len() || !self.has_column(column_id) {
            return false;
        }
        let rows = Arc::make_mut(&mut self.rows);
        let Some(row) = rows.get_mut(row_index) else {
            return false;
        };
        let row = Arc::make_mut(row);
        match row.get_mut(column_id) {
            Some(cell) => *cell = value,
            None => {
                row.insert(column_id.to_string(), value);
            }
        }
        true
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.dirty = true;
    }

    /// Cheap handle to the current rows.
    pub fn snapshot(&self) -> Rows {
        Arc::clone(&self.rows)
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).map(AsRef::as_ref)
    }

    pub fn cell(&self, row_index: usize, column_id: &str) -> Option<&CellValue> {
        self.row(row_index)?.get(column_id)
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn has_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The dataset as it was when last loaded.
    pub fn original(&self) -> Rows {
        Arc::clone(&self.original)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drop every edit since the last load.
    pub fn revert_to_original(&mut self) {
        if !self.dirty {
            return;
        }
        self.rows = Arc::clone(&self.original);
        self.revision = self.revision.wrapping_add(1);
        self.dirty = false;
        debug!("reverted to original dataset");
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

    fn store() -> DataStore {
        let columns = vec![ColumnDescriptor::new("name"), ColumnDescriptor::new("city")];
        let mut a = Row::new();
        a.insert("name".into(), "Jon".into());
        a.insert("city".into(), "NYC".into());
        let mut b = Row::new();
        b.insert("city".into(), "LA".into());
        b.insert("name".into(), "John".into());
        b.insert("extra".into(), "dropped".into());
        let mut store = DataStore::new();
        store.set_dataset(columns, vec![a, b]).unwrap();
        store
    }

    #[test]
    fn test_set_dataset_normalizes_shape() {
        let store = store();
        let keys: Vec<&String> = store.row(1).unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "city"]);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_missing_field_is_empty() {
        let mut row = Row::new();
        row.insert("a".into(), "x".into());
        let mut store = DataStore::new();
        store
            .set_dataset(vec![ColumnDescriptor::new("a"), ColumnDescriptor::new("b")], vec![row])
            .unwrap();
        assert_eq!(store.cell(0, "b"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        let mut store = DataStore::new();
        assert!(matches!(
            store.set_dataset(vec![ColumnDescriptor::new("a")], Vec::new()),
            Err(GridError::EmptyDataset)
        ));
        assert!(matches!(
            store.set_dataset(
                vec![ColumnDescriptor::new("a"), ColumnDescriptor::new("a")],
                vec![Row::new()]
            ),
            Err(GridError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_update_is_copy_on_write() {
        let mut store = store();
        let before = store.snapshot();
        let untouched = Arc::clone(&before[1]);
        assert!(store.update_cell(0, "name", "Ann".into()));
        assert_eq!(before[0].get("name"), Some(&CellValue::from("Jon")));
        assert_eq!(store.cell(0, "name"), Some(&CellValue::from("Ann")));
        assert!(Arc::ptr_eq(&untouched, &store.rows()[1]));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_update_unknown_targets_is_noop() {
        let mut store = store();
        let revision = store.revision();
        assert!(!store.update_cell(9, "name", "x".into()));
        assert!(!store.update_cell(0, "zip", "x".into()));
        assert_eq!(store.revision(), revision);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_revert() {
        let mut store = store();
        store.update_cell(1, "city", "SF".into());
        store.revert_to_original();
        assert_eq!(store.cell(1, "city"), Some(&CellValue::from("LA")));
        assert!(!store.is_dirty());
    }
}
