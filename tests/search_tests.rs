//! Find and replace tests
//!
//! Covers the matching properties, result ordering, progress reporting and
//! the generation guard that keeps superseded scans from publishing.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use futures::executor::block_on;
use futures::future::join;
use gridedit::editor::{run_search, EditorState};
use gridedit::search::{fuzzy_match, search, similarity, SearchGeneration};
use gridedit::{
    CellValue, EditorConfig, GridEdit, GridError, Row, SearchOptions, SearchOutcome, SearchRequest,
    SearchStatus,
};
use test_case::test_case;

/// `[{name:"Jon", city:"NYC"}, {name:"John", city:"LA"}]`
fn people() -> GridEdit {
    let mut grid = GridEdit::new_test();
    grid.load_csv("name,city\nJon,NYC\nJohn,LA\n").unwrap();
    grid
}

fn completed(outcome: SearchOutcome) -> Vec<gridedit::SearchResult> {
    match outcome {
        SearchOutcome::Completed(results) => results,
        SearchOutcome::Superseded => panic!("search was superseded"),
    }
}

fn name_rows(names: &[String]) -> Vec<Arc<Row>> {
    names
        .iter()
        .map(|n| {
            let mut row = Row::new();
            row.insert("name".into(), CellValue::from(n.as_str()));
            Arc::new(row)
        })
        .collect()
}

// ============================================================================
// Similarity and matcher properties
// ============================================================================

#[test_case("" ; "empty")]
#[test_case("a" ; "single")]
#[test_case("Jonathan" ; "word")]
#[test_case("naïve café" ; "non-ascii")]
fn test_similarity_identity(s: &str) {
    assert_eq!(similarity(s, s), 1.0);
}

#[test_case("Jon", "John")]
#[test_case("kitten", "sitting")]
#[test_case("", "abc")]
#[test_case("Los Angeles", "angels")]
fn test_similarity_symmetric(a: &str, b: &str) {
    assert_eq!(similarity(a, b), similarity(b, a));
    let s = similarity(a, b);
    assert!((0.0..=1.0).contains(&s));
}

#[test_case("The quick brown fox", "brown", false)]
#[test_case("The quick brown fox", "BROWN", false)]
#[test_case("The quick brown fox", "quick", true)]
fn test_contained_query_is_exact_at_any_threshold(text: &str, query: &str, case_sensitive: bool) {
    for threshold in [0.0, 0.3, 0.6, 0.95, 0.999] {
        let hit = fuzzy_match(text, query, threshold, case_sensitive).unwrap();
        assert!(hit.exact);
        assert_eq!(hit.score, 1.0);
    }
}

#[test]
fn test_fuzzy_never_below_threshold() {
    let cells = ["Jonh", "Jhon", "Johann", "Joanna", "Bob", "J", "Jo n", "Smith"];
    for threshold in [0.3, 0.5, 0.6, 0.75, 0.9] {
        for cell in cells {
            if let Some(hit) = fuzzy_match(cell, "John", threshold, false) {
                assert!(hit.score >= threshold, "{cell} scored {} < {threshold}", hit.score);
            }
        }
    }
}

// ============================================================================
// Search orchestration
// ============================================================================

#[test]
fn test_fuzzy_scenario_orders_exact_first() {
    let grid = people();
    let results = completed(block_on(grid.search("Jon", SearchOptions::fuzzy(0.6))).unwrap());

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].row_index, 0);
    assert!(results[0].exact);
    assert_eq!(results[0].matched_text, "Jon");

    assert_eq!(results[1].row_index, 1);
    assert!(!results[1].exact);
    assert!(results[1].score >= 0.6);
    assert!(results[1].score < 1.0);
    assert_eq!(results[1].score, similarity("jon", &results[1].matched_text.to_lowercase()));
}

#[test]
fn test_fuzzy_results_sorted_by_score() {
    let names: Vec<String> = ["Jhn", "John", "Jonathan", "Johnny", "Jo", "xJohnx", "Joh"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let rows = name_rows(&names);
    let ticket = SearchGeneration::new().begin();
    let results = completed(
        block_on(search(&rows, &["name".into()], "John", &SearchOptions::fuzzy(0.3), &ticket, 1, |_| {}))
            .unwrap(),
    );
    assert!(!results.is_empty());
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_exact_results_in_encounter_order() {
    let mut grid = GridEdit::new_test();
    grid.load_csv("a,b\nx,jon\njon,x\nx,x\nJON,jon\n").unwrap();
    let results = completed(block_on(grid.search("jon", SearchOptions::default())).unwrap());
    let cells: Vec<(usize, &str)> = results
        .iter()
        .map(|r| (r.row_index, r.column_id.as_str()))
        .collect();
    assert_eq!(cells, vec![(0, "b"), (1, "a"), (3, "a"), (3, "b")]);
}

#[test]
fn test_column_scope_limits_search() {
    let grid = people();
    let options = SearchOptions::default().in_columns(["city"]);
    let results = completed(block_on(grid.search("n", options)).unwrap());
    // "Jon" and "John" contain "n" but only the city column is searched
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].column_id, "city");
    assert_eq!(results[0].row_index, 0);
}

#[test]
fn test_unknown_scope_is_rejected() {
    let grid = people();
    let options = SearchOptions::default().in_columns(["zip"]);
    let err = block_on(grid.search("x", options)).unwrap_err();
    assert!(matches!(err, GridError::UnknownColumn(c) if c == "zip"));
}

#[test]
fn test_empty_query_clears_without_scanning() {
    let grid = people();
    completed(block_on(grid.search("Jon", SearchOptions::default())).unwrap());
    assert_eq!(grid.state().borrow().search().results.len(), 1);

    let results = completed(block_on(grid.search("", SearchOptions::default())).unwrap());
    assert!(results.is_empty());
    let state = grid.state();
    let state = state.borrow();
    assert!(state.search().results.is_empty());
    assert_eq!(state.search().progress, 0);
    assert_eq!(state.search().status, SearchStatus::Idle);
}

#[test]
fn test_progress_is_monotone_and_ends_at_100() {
    let names: Vec<String> = (0..500).map(|i| format!("person {i}")).collect();
    let rows = name_rows(&names);
    let ticket = SearchGeneration::new().begin();
    let mut seen = Vec::new();
    block_on(search(
        &rows,
        &["name".into()],
        "person 42",
        &SearchOptions::default(),
        &ticket,
        1,
        |p| seen.push(p.percent),
    ))
    .unwrap();

    assert!(seen.len() > 10, "expected intermediate reports, got {seen:?}");
    assert_eq!(seen.last(), Some(&100));
    assert!(seen.iter().rev().skip(1).all(|p| *p < 100));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_search_publishes_stats() {
    let grid = people();
    completed(block_on(grid.search("Jon", SearchOptions::fuzzy(0.6))).unwrap());
    let state = grid.state();
    let state = state.borrow();
    let stats = state.search().stats;
    assert_eq!((stats.total, stats.exact, stats.fuzzy), (2, 1, 1));
    assert_eq!(state.search().progress, 100);
    assert_eq!(state.search().status, SearchStatus::Done);
}

#[test]
fn test_threshold_clamped_to_surface_range() {
    // 0.0 would accept anything; the surface clamps it to 0.3
    let mut grid = GridEdit::new_test();
    grid.load_csv("name\nzzzzzz\n").unwrap();
    let results = completed(block_on(grid.search("abc", SearchOptions::fuzzy(0.0))).unwrap());
    assert!(results.is_empty());
}

#[test]
fn test_missing_threshold_comes_from_config() {
    // "Jxxn" vs "John" scores 0.5: below the stock 0.6, above a 0.4 default
    let config = EditorConfig {
        default_threshold: 0.4,
        min_threshold: 0.3,
        ..EditorConfig::default()
    };
    let mut grid = GridEdit::with_config(config).unwrap();
    grid.load_csv("name\nJxxn\n").unwrap();
    let request = SearchRequest {
        fuzzy: true,
        ..SearchRequest::default()
    };
    let results = completed(block_on(grid.search_request("John", request)).unwrap());
    assert_eq!(results.len(), 1);

    let mut stock = GridEdit::new_test();
    stock.load_csv("name\nJxxn\n").unwrap();
    let request = SearchRequest {
        fuzzy: true,
        ..SearchRequest::default()
    };
    let results = completed(block_on(stock.search_request("John", request)).unwrap());
    assert!(results.is_empty());
}

#[test]
fn test_with_config_rejects_invalid_config() {
    let inverted = EditorConfig {
        min_threshold: 0.9,
        max_threshold: 0.5,
        ..EditorConfig::default()
    };
    assert!(matches!(
        GridEdit::with_config(inverted),
        Err(GridError::InvalidOption(_))
    ));
    let outside = EditorConfig {
        default_threshold: 0.99,
        ..EditorConfig::default()
    };
    assert!(GridEdit::with_config(outside).is_err());
}

// ============================================================================
// Supersession
// ============================================================================

fn big_state() -> Rc<RefCell<EditorState>> {
    let mut csv = String::from("name\n");
    for i in 0..2_000 {
        csv.push_str(&format!("row {i}\n"));
    }
    let mut state = EditorState::default();
    state.load_csv(&csv).unwrap();
    Rc::new(RefCell::new(state))
}

#[test]
fn test_newer_search_supersedes_older() {
    let state = big_state();
    let options = SearchOptions::default();
    let first = run_search(Rc::clone(&state), "row 1", &options, |_| {});
    let second = run_search(Rc::clone(&state), "row 19", &options, |_| {});
    // Both futures are created before either is polled; the first to poll
    // starts its scan, then the second starts and supersedes it.
    let (a, b) = block_on(join(first, second));

    assert_eq!(a.unwrap(), SearchOutcome::Superseded);
    let b = completed(b.unwrap());
    let state = state.borrow();
    assert_eq!(state.search().query, "row 19");
    assert_eq!(state.search().results, b);
    assert!(b.iter().all(|r| r.matched_text == "row 19"));
}

#[test]
fn test_mutation_during_scan_discards_results() {
    let state = big_state();
    let options = SearchOptions::default();
    let scan = run_search(Rc::clone(&state), "row", &options, |_| {});
    let edit = {
        let state = Rc::clone(&state);
        async move {
            gridedit::search::yield_to_host().await;
            state.borrow_mut().update_cell(0, "name", "edited".into());
        }
    };
    let (outcome, ()) = block_on(join(scan, edit));

    assert_eq!(outcome.unwrap(), SearchOutcome::Superseded);
    let state = state.borrow();
    assert!(state.search().results.is_empty());
    assert_eq!(state.search().status, SearchStatus::Idle);
}

#[test]
fn test_cancel_stops_scan() {
    let state = big_state();
    let options = SearchOptions::default();
    let scan = run_search(Rc::clone(&state), "row", &options, |_| {});
    let cancel = {
        let state = Rc::clone(&state);
        async move {
            gridedit::search::yield_to_host().await;
            state.borrow_mut().cancel_search();
        }
    };
    let (outcome, ()) = block_on(join(scan, cancel));
    assert_eq!(outcome.unwrap(), SearchOutcome::Superseded);
    assert_eq!(state.borrow().search().status, SearchStatus::Idle);
}

// ============================================================================
// Replace
// ============================================================================

#[test]
fn test_replace_scenario() {
    let mut grid = people();
    let changed = grid
        .replace_all("Jon", "Jonathan", SearchOptions::default())
        .unwrap();
    assert_eq!(changed, 1);

    let state = grid.state();
    let state = state.borrow();
    assert_eq!(state.store().cell(0, "name"), Some(&CellValue::from("Jonathan")));
    assert_eq!(state.store().cell(1, "name"), Some(&CellValue::from("John")));
}

#[test]
fn test_replace_case_insensitive_keeps_surroundings() {
    let mut grid = GridEdit::new_test();
    grid.load_csv("note\nsee JON and jon.\n").unwrap();
    grid.replace_all("jon", "Ann", SearchOptions::default()).unwrap();
    assert_eq!(
        grid.state().borrow().store().cell(0, "note"),
        Some(&CellValue::from("see Ann and Ann."))
    );
}

#[test]
fn test_replace_special_characters_literal() {
    let mut grid = GridEdit::new_test();
    grid.load_csv("price\n$5.00 (USD)\n500 USD\n").unwrap();
    let changed = grid
        .replace_all("$5.00 (usd)", "$$ 5", SearchOptions::default())
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        grid.state().borrow().store().cell(0, "price"),
        Some(&CellValue::from("$$ 5"))
    );
}

#[test]
fn test_replace_invalidates_results() {
    let mut grid = people();
    completed(block_on(grid.search("Jon", SearchOptions::default())).unwrap());
    assert!(!grid.state().borrow().search().results.is_empty());
    grid.replace_all("NYC", "Boston", SearchOptions::default()).unwrap();
    assert!(grid.state().borrow().search().results.is_empty());
}

#[test]
fn test_replace_matches_find() {
    let mut grid = GridEdit::new_test();
    grid.load_csv("name\nJonh\nJhon\nBob\nJohn Jon\n").unwrap();
    let options = SearchOptions::fuzzy(0.6);
    let found = completed(block_on(grid.search("John", options.clone())).unwrap());
    let changed = grid.replace_all("John", "X", options).unwrap();
    assert_eq!(changed, found.len());
}

#[test]
fn test_replace_empty_query_rejected() {
    let mut grid = people();
    let before = grid.export_csv().unwrap();
    assert!(matches!(
        grid.replace_all("", "x", SearchOptions::default()),
        Err(GridError::EmptyQuery)
    ));
    assert_eq!(grid.export_csv().unwrap(), before);
    assert!(!grid.state().borrow().is_dirty());
}
