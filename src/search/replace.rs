//! Replace-all planning.
//!
//! Uses the same per-cell decision as find, so the cells a replace touches are
//! exactly the cells a search with the same options would list. Planning is
//! pure: it returns the mutation batch and leaves applying it to the store.

use std::sync::Arc;

use tracing::debug;

use super::matcher::Matcher;
use super::{cell_text, validate_options};
use crate::error::{GridError, Result};
use crate::types::{CellValue, MutationRecord, Row, SearchOptions};

/// Build the mutation batch that replaces `query` with `replacement` in every
/// matching cell of `rows x scope`.
///
/// Exact mode rewrites every occurrence in a cell. Fuzzy mode rewrites only the
/// single span the matcher reports for that cell.
pub fn plan_replace(
    rows: &[Arc<Row>],
    scope: &[String],
    query: &str,
    replacement: &str,
    options: &SearchOptions,
) -> Result<Vec<MutationRecord>> {
    if query.is_empty() {
        return Err(GridError::EmptyQuery);
    }
    validate_options(options)?;
    let matcher = Matcher::new(query, options.threshold, options.case_sensitive)?;

    let mut records = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        for column_id in scope {
            let text = cell_text(row, column_id);
            let replaced = if options.fuzzy {
                matcher
                    .fuzzy(&text)
                    .map(|hit| splice(&text, hit.match_index, hit.matched_text.chars().count(), replacement))
            } else if matcher.pattern().is_match(&text) {
                Some(matcher.pattern().replace_all(&text, replacement).into_owned())
            } else {
                None
            };
            if let Some(value) = replaced {
                records.push(MutationRecord::new(row_index, column_id.clone(), CellValue::Text(value)));
            }
        }
    }
    debug!(cells = records.len(), fuzzy = options.fuzzy, "replace planned");
    Ok(records)
}

/// Swap `len` characters starting at character `start` for `replacement`.
fn splice(text: &str, start: usize, len: usize, replacement: &str) -> String {
    text.chars()
        .take(start)
        .chain(replacement.chars())
        .chain(text.chars().skip(start + len))
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn rows(values: &[&str]) -> Vec<Arc<Row>> {
        values
            .iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert("name".into(), CellValue::from(*v));
                Arc::new(row)
            })
            .collect()
    }

    fn scope() -> Vec<String> {
        vec!["name".into()]
    }

    #[test]
    fn test_splice_multibyte() {
        assert_eq!(splice("café noir", 5, 4, "blanc"), "café blanc");
        assert_eq!(splice("abc", 0, 0, "x"), "xabc");
    }

    #[test]
    fn test_exact_replaces_every_occurrence() {
        let data = rows(&["Jon met jon", "John"]);
        let records = plan_replace(&data, &scope(), "jon", "Ann", &SearchOptions::default()).unwrap();
        assert_eq!(records, vec![MutationRecord::new(0, "name", "Ann met Ann")]);
    }

    #[test]
    fn test_fuzzy_replaces_single_span() {
        let data = rows(&["Jonh and Jonh"]);
        let records = plan_replace(&data, &scope(), "John", "X", &SearchOptions::fuzzy(0.5)).unwrap();
        assert_eq!(records.len(), 1);
        let CellValue::Text(value) = &records[0].value else {
            panic!("expected text");
        };
        assert_eq!(value.matches('X').count(), 1);
        assert!(value.ends_with("Jonh"));
    }

    #[test]
    fn test_number_cells_become_text() {
        let mut row = Row::new();
        row.insert("age".into(), CellValue::Number(30.0));
        let data = vec![Arc::new(row)];
        let records =
            plan_replace(&data, &["age".into()], "3", "4", &SearchOptions::default()).unwrap();
        assert_eq!(records, vec![MutationRecord::new(0, "age", "40")]);
    }

    #[test]
    fn test_empty_query_rejected() {
        let data = rows(&["x"]);
        assert!(matches!(
            plan_replace(&data, &scope(), "", "y", &SearchOptions::default()),
            Err(GridError::EmptyQuery)
        ));
    }
}
