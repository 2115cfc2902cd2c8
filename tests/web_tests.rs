//! Browser tests for the JavaScript facade.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridedit::GridEdit;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn grid() -> GridEdit {
    let mut grid = GridEdit::new(JsValue::UNDEFINED).unwrap();
    grid.load_csv("name,city\nJon,NYC\nJohn,LA\n").unwrap();
    grid
}

#[wasm_bindgen_test]
async fn search_resolves_with_results() {
    let grid = grid();
    let options = js_sys::JSON::parse(r#"{"fuzzy": true, "threshold": 0.6}"#).unwrap();
    let promise = grid.search("Jon".into(), options, None).unwrap();
    let results = JsFuture::from(promise).await.unwrap();
    let results: js_sys::Array = results.into();
    assert_eq!(results.length(), 2);
    assert_eq!(grid.search_progress(), 100);
}

#[wasm_bindgen_test]
fn replace_and_export() {
    let mut grid = grid();
    assert_eq!(grid.replace_all("Jon", "Jonathan", JsValue::UNDEFINED).unwrap(), 1);
    assert!(grid.is_dirty());
    assert_eq!(
        grid.export_csv().unwrap(),
        "name,city\r\nJonathan,NYC\r\nJohn,LA\r\n"
    );
}

#[wasm_bindgen_test]
fn window_is_null_without_rows() {
    let grid = GridEdit::new(JsValue::UNDEFINED).unwrap();
    assert!(grid.visible_window().unwrap().is_null());
}
