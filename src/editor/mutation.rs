//! Selection-driven edits.
//!
//! Turns a selection plus an input string into mutation records (bulk edit,
//! paste) and renders the before/after preview the edit dialog shows.

use crate::types::{BulkEditMode, BulkEditPreview, CellAddr, CellValue, MutationRecord};

use super::store::DataStore;

/// Records that apply `input` to every selected cell with `mode`.
///
/// Cells that no longer exist in the store are skipped.
pub(crate) fn bulk_edit_records<'a>(
    store: &DataStore,
    cells: impl IntoIterator<Item = &'a CellAddr>,
    input: &str,
    mode: BulkEditMode,
) -> Vec<MutationRecord> {
    cells
        .into_iter()
        .filter_map(|addr| {
            let current = store.cell(addr.row, &addr.column)?;
            let value = mode.apply(&current.display_text(), input);
            Some(MutationRecord::new(addr.row, addr.column.clone(), CellValue::Text(value)))
        })
        .collect()
}

/// Before/after lines for a pending bulk edit, at most `limit` of them.
pub(crate) fn preview_bulk_edit<'a>(
    store: &DataStore,
    cells: impl IntoIterator<Item = &'a CellAddr>,
    input: &str,
    mode: BulkEditMode,
    limit: usize,
) -> Vec<BulkEditPreview> {
    cells
        .into_iter()
        .filter_map(|addr| {
            let current = store.cell(addr.row, &addr.column)?.display_text();
            let header = store
                .column(&addr.column)
                .map_or_else(|| addr.column.clone(), |c| c.header.clone());
            Some(BulkEditPreview {
                row_index: addr.row,
                column_id: addr.column.clone(),
                header,
                future_value: mode.apply(&current, input),
                current_value: current.into_owned(),
            })
        })
        .take(limit)
        .collect()
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
    use crate::types::{ColumnDescriptor, Row};

    fn store() -> DataStore {
        let mut row = Row::new();
        row.insert("name".into(), "Jon".into());
        row.insert("age".into(), CellValue::Number(30.0));
        let mut store = DataStore::new();
        let mut name = ColumnDescriptor::new("name");
        name.header = "Name".into();
        store
            .set_dataset(vec![name, ColumnDescriptor::new("age")], vec![row])
            .unwrap();
        store
    }

    #[test]
    fn test_modes() {
        let store = store();
        let cells = [CellAddr::new(0, "name"), CellAddr::new(0, "age")];
        let append = bulk_edit_records(&store, &cells, "!", BulkEditMode::Append);
        assert_eq!(append[0].value, CellValue::from("Jon!"));
        assert_eq!(append[1].value, CellValue::from("30!"));
        let prepend = bulk_edit_records(&store, &cells, "Mr ", BulkEditMode::Prepend);
        assert_eq!(prepend[0].value, CellValue::from("Mr Jon"));
    }

    #[test]
    fn test_stale_cells_skipped() {
        let store = store();
        let cells = [CellAddr::new(5, "name"), CellAddr::new(0, "zip")];
        assert!(bulk_edit_records(&store, &cells, "x", BulkEditMode::Replace).is_empty());
    }

    #[test]
    fn test_preview_uses_header_and_limit() {
        let store = store();
        let cells = [CellAddr::new(0, "name"), CellAddr::new(0, "age")];
        let preview = preview_bulk_edit(&store, &cells, "?", BulkEditMode::Append, 1);
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].header, "Name");
        assert_eq!(preview[0].current_value, "Jon");
        assert_eq!(preview[0].future_value, "Jon?");
    }
}
