//! Selection model tests
//!
//! Point, multi (toggle) and range selection, drag accumulation, and the
//! selection-driven edits built on top of them (bulk edit, paste, TSV copy).

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::BTreeSet;

use gridedit::editor::EditorState;
use gridedit::{BulkEditMode, CellAddr, CellValue, Selection};

fn order() -> Vec<String> {
    vec!["name".into(), "age".into(), "city".into()]
}

fn state() -> EditorState {
    let mut state = EditorState::default();
    state
        .load_csv("name,age,city\nJon,30,NYC\nJohn,25,LA\nJane,41,SF\nJoan,19,\"Austin, TX\"\nMary,52,Reno\n")
        .unwrap();
    state
}

fn cells(selection: &Selection) -> BTreeSet<(usize, String)> {
    selection
        .cells()
        .map(|c| (c.row, c.column.clone()))
        .collect()
}

#[test]
fn test_range_between_anchor_and_target_is_exact_rectangle() {
    let mut sel = Selection::new();
    sel.select_cell(2, "name", false, false, &order());
    sel.select_cell(4, "age", false, true, &order());

    let expected: BTreeSet<(usize, String)> = [2, 3, 4]
        .into_iter()
        .flat_map(|r| [(r, "name".to_string()), (r, "age".to_string())])
        .collect();
    assert_eq!(cells(&sel), expected);
    assert_eq!(sel.len(), 6);
    assert_eq!(sel.anchor(), Some(&CellAddr::new(2, "name")));
}

#[test]
fn test_range_replaces_previous_selection() {
    let mut sel = Selection::new();
    sel.select_cell(0, "city", false, false, &order());
    sel.select_cell(9, "city", true, false, &order());
    // Anchor is now (9, city); shift-click extends from it, not from the union
    sel.select_cell(8, "age", false, true, &order());
    assert_eq!(sel.len(), 4);
    assert!(!sel.contains(0, "city"));
    assert!(sel.contains(8, "age") && sel.contains(9, "city"));
}

#[test]
fn test_range_is_relative_to_anchor_not_previous_range() {
    let mut sel = Selection::new();
    sel.select_cell(5, "age", false, false, &order());
    sel.select_cell(9, "city", false, true, &order());
    assert_eq!(sel.len(), 10);
    sel.select_cell(4, "age", false, true, &order());
    assert_eq!(sel.len(), 2);
    assert_eq!(sel.anchor(), Some(&CellAddr::new(5, "age")));
}

#[test]
fn test_range_ignores_multi_flag() {
    let mut sel = Selection::new();
    sel.select_cell(0, "name", false, false, &order());
    sel.select_cell(1, "age", true, true, &order());
    assert_eq!(sel.len(), 4);
}

#[test]
fn test_range_follows_current_column_order() {
    let mut sel = Selection::new();
    let reordered: Vec<String> = vec!["city".into(), "name".into(), "age".into()];
    sel.select_cell(0, "city", false, false, &reordered);
    sel.select_cell(0, "name", false, true, &reordered);
    assert_eq!(sel.len(), 2);
    assert!(!sel.contains(0, "age"));
}

#[test]
fn test_drag_accumulates_without_moving_anchor() {
    let mut sel = Selection::new();
    sel.select_cell(1, "name", false, false, &order());
    sel.begin_drag();
    assert!(sel.is_dragging());
    sel.add_cell(1, "age");
    sel.add_cell(2, "age");
    sel.add_cell(2, "age");
    sel.end_drag();
    assert!(!sel.is_dragging());
    assert_eq!(sel.len(), 3);
    assert_eq!(sel.anchor(), Some(&CellAddr::new(1, "name")));
}

#[test]
fn test_clear_forgets_anchor() {
    let mut sel = Selection::new();
    sel.select_cell(1, "name", false, false, &order());
    sel.clear();
    assert!(sel.is_empty());
    assert!(sel.anchor().is_none());
    // Without an anchor a range click behaves like a plain click
    sel.select_cell(3, "city", false, true, &order());
    assert_eq!(sel.len(), 1);
}

// ============================================================================
// Selection-driven edits
// ============================================================================

#[test]
fn test_bulk_edit_modes() {
    let mut state = state();
    state.select_cell(0, "name", false, false);
    state.select_cell(1, "name", false, true);
    assert_eq!(state.bulk_edit("Dr. ", BulkEditMode::Prepend), 2);
    assert_eq!(state.store().cell(0, "name"), Some(&CellValue::from("Dr. Jon")));
    assert_eq!(state.store().cell(1, "name"), Some(&CellValue::from("Dr. John")));
    assert!(state.selection().is_empty());

    state.select_cell(2, "age", false, false);
    assert_eq!(state.bulk_edit("0", BulkEditMode::Append), 1);
    assert_eq!(state.store().cell(2, "age"), Some(&CellValue::from("410")));
}

#[test]
fn test_bulk_edit_without_selection_is_noop() {
    let mut state = state();
    assert_eq!(state.bulk_edit("x", BulkEditMode::Replace), 0);
    assert!(!state.is_dirty());
}

#[test]
fn test_preview_does_not_mutate() {
    let mut state = state();
    state.select_cell(0, "city", false, false);
    state.select_cell(1, "city", false, true);
    let preview = state.preview_bulk_edit("!", BulkEditMode::Append, 10);
    assert_eq!(preview.len(), 2);
    assert_eq!(preview[0].current_value, "NYC");
    assert_eq!(preview[0].future_value, "NYC!");
    assert!(!state.is_dirty());
    assert_eq!(state.selection().len(), 2);
}

#[test]
fn test_paste_writes_same_text_everywhere() {
    let mut state = state();
    state.select_cell(0, "city", false, false);
    state.select_cell(2, "age", true, false);
    state.select_cell(4, "name", true, false);
    assert_eq!(state.paste_text("a\tb"), 3);
    for (row, column) in [(0, "city"), (2, "age"), (4, "name")] {
        assert_eq!(state.store().cell(row, column), Some(&CellValue::from("a\tb")));
    }
}

#[test]
fn test_stale_selection_is_skipped() {
    let mut state = state();
    state.select_cell(1, "name", false, false);
    state.add_cell_to_selection(99, "name");
    assert_eq!(state.paste_text("X"), 1);
}

#[test]
fn test_copy_selection_as_tsv() {
    let mut state = state();
    state.select_cell(2, "name", false, false);
    state.select_cell(3, "city", false, true);
    let tsv = state.copy_selection_tsv().unwrap();
    assert_eq!(tsv, "Jane\t41\tSF\nJoan\t19\tAustin, TX");
}

#[test]
fn test_copy_sparse_selection_leaves_gaps() {
    let mut state = state();
    state.select_cell(0, "name", false, false);
    state.select_cell(1, "city", true, false);
    assert_eq!(state.copy_selection_tsv().unwrap(), "Jon\t\t\n\t\tLA");
    state.clear_selection();
    assert!(state.copy_selection_tsv().is_none());
}
