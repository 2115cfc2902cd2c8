//! Clipboard text for the selection.
//!
//! Copy serializes the selection's bounding rectangle as TSV, the way
//! spreadsheets put a range on the clipboard. Paste is handled by the editor
//! as a replace-mode bulk edit; this module only reads the text.

use crate::types::Selection;

use super::store::DataStore;

/// Quote a value for TSV when it contains a tab, line break or quote.
pub(crate) fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains(['\t', '\n', '\r', '"']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Selected cells as TSV over their bounding rectangle in `column_order`.
///
/// Unselected cells inside the rectangle are written empty. Returns `None`
/// when nothing is selected.
pub(crate) fn selection_to_tsv(
    store: &DataStore,
    selection: &Selection,
    column_order: &[String],
) -> Option<String> {
    let (min_row, min_col, max_row, max_col) = selection.bounds(column_order)?;
    let columns = column_order.get(min_col..=max_col)?;

    let lines: Vec<String> = (min_row..=max_row)
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    if !selection.contains(row, column) {
                        return String::new();
                    }
                    store
                        .cell(row, column)
                        .map(|v| escape_cell_value(&v.display_text()))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect();
    Some(lines.join("\n"))
}

/// Read plain text from the system clipboard.
#[cfg(target_arch = "wasm32")]
pub(crate) async fn read_clipboard_text() -> crate::error::Result<String> {
    use crate::error::GridError;

    let window = web_sys::window().ok_or_else(|| GridError::Clipboard("no window".into()))?;
    let promise = window.navigator().clipboard().read_text();
    let value = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| GridError::Clipboard(format!("{e:?}")))?;
    value
        .as_string()
        .ok_or_else(|| GridError::Clipboard("clipboard did not return text".into()))
}

/// Put text on the system clipboard. Failures are logged, not raised.
#[cfg(target_arch = "wasm32")]
pub(crate) fn write_clipboard_text(text: &str) {
    if let Some(window) = web_sys::window() {
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::warn!("clipboard write failed: {e:?}");
            }
        });
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

    #[test]
    fn test_escape_cell_value() {
        assert_eq!(escape_cell_value("plain"), "plain");
        assert_eq!(escape_cell_value("a\tb"), "\"a\tb\"");
        assert_eq!(escape_cell_value("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell_value("line\nbreak"), "\"line\nbreak\"");
    }
}
