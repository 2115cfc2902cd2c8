//! Find and replace over the whole dataset.
//!
//! This module handles:
//! - Edit-distance similarity (`similarity`)
//! - The per-cell exact/fuzzy match decision (`matcher`)
//! - The chunked, yielding scan over rows x columns (this file)
//! - Replace-all planning on top of the same match decision (`replace`)
//!
//! Searches are linear scans. At this scale (10^4 - 10^5 rows) that is fast
//! enough as long as the scan does not hold the event loop, so it yields every
//! `step_percent` of the cells and reports progress as it goes.

pub mod matcher;
pub mod replace;
pub mod schedule;
pub mod similarity;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::types::{CellValue, ColumnDescriptor, Row, SearchOptions, SearchResult};

pub use matcher::{fuzzy_match, ExactPattern, MatchResult, Matcher};
pub use replace::plan_replace;
pub use schedule::{yield_to_host, SearchGeneration, SearchTicket};
pub use similarity::{levenshtein_distance, similarity};

/// Progress report emitted between chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProgress {
    /// 0..=99 while scanning, 100 once finished
    pub percent: u8,
    pub scanned: usize,
    pub total: usize,
}

/// How a scan ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Completed(Vec<SearchResult>),
    /// A newer request took over; this scan's results must be discarded.
    Superseded,
}

/// Check option values before any scanning starts.
pub fn validate_options(options: &SearchOptions) -> Result<()> {
    if !(0.0..=1.0).contains(&options.threshold) {
        return Err(GridError::InvalidOption(format!(
            "threshold {} is outside [0, 1]",
            options.threshold
        )));
    }
    Ok(())
}

/// Columns a search visits, in scan order.
///
/// An empty scope means every column in definition order. Otherwise the scope
/// order is kept, duplicates dropped, and unknown ids rejected.
pub fn resolve_scope(columns: &[ColumnDescriptor], scope: &[String]) -> Result<Vec<String>> {
    if scope.is_empty() {
        return Ok(columns.iter().map(|c| c.id.clone()).collect());
    }
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(scope.len());
    for id in scope {
        if !columns.iter().any(|c| &c.id == id) {
            return Err(GridError::UnknownColumn(id.clone()));
        }
        if seen.insert(id.as_str()) {
            resolved.push(id.clone());
        }
    }
    Ok(resolved)
}

pub(crate) fn cell_text<'r>(row: &'r Row, column_id: &str) -> std::borrow::Cow<'r, str> {
    row.get(column_id)
        .map(CellValue::display_text)
        .unwrap_or_default()
}

/// Scan `rows x scope` for `query`.
///
/// Exact mode keeps row-then-column encounter order. Fuzzy mode sorts by
/// descending score once the scan is complete (stable, so ties keep encounter
/// order). Progress never decreases, stays below 100 until the scan is done,
/// and an empty query returns no results without scanning.
///
/// The ticket is checked at every yield point; a stale ticket ends the scan
/// with [`SearchOutcome::Superseded`].
pub async fn search<F>(
    rows: &[Arc<Row>],
    scope: &[String],
    query: &str,
    options: &SearchOptions,
    ticket: &SearchTicket,
    step_percent: u8,
    mut on_progress: F,
) -> Result<SearchOutcome>
where
    F: FnMut(SearchProgress),
{
    let total = rows.len().saturating_mul(scope.len());
    if query.is_empty() {
        on_progress(SearchProgress {
            percent: 0,
            scanned: 0,
            total,
        });
        return Ok(SearchOutcome::Completed(Vec::new()));
    }
    validate_options(options)?;
    let matcher = Matcher::new(query, options.threshold, options.case_sensitive)?;

    let chunk = (total.saturating_mul(usize::from(step_percent.max(1))))
        .div_ceil(100)
        .max(1);
    debug!(total, chunk, fuzzy = options.fuzzy, "search scan started");

    let mut results = Vec::new();
    let mut scanned = 0usize;
    let mut last_percent = 0u8;

    for (row_index, row) in rows.iter().enumerate() {
        for column_id in scope {
            let text = cell_text(row, column_id);
            let hit = if options.fuzzy {
                matcher.fuzzy(&text)
            } else {
                matcher.exact(&text)
            };
            if let Some(hit) = hit {
                results.push(SearchResult {
                    row_index,
                    column_id: column_id.clone(),
                    match_index: hit.match_index,
                    matched_text: hit.matched_text,
                    score: hit.score,
                    exact: hit.exact,
                });
            }

            scanned += 1;
            if scanned % chunk == 0 && scanned < total {
                if !ticket.is_current() {
                    debug!(scanned, "search superseded");
                    return Ok(SearchOutcome::Superseded);
                }
                let percent = progress_percent(scanned, total);
                if percent > last_percent {
                    last_percent = percent;
                    on_progress(SearchProgress {
                        percent,
                        scanned,
                        total,
                    });
                }
                yield_to_host().await;
            }
        }
    }

    if !ticket.is_current() {
        debug!("search superseded after final chunk");
        return Ok(SearchOutcome::Superseded);
    }
    if options.fuzzy {
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
    }
    on_progress(SearchProgress {
        percent: 100,
        scanned,
        total,
    });
    debug!(matches = results.len(), "search scan finished");
    Ok(SearchOutcome::Completed(results))
}

/// Percentage of work done, capped at 99 until the scan finishes.
fn progress_percent(scanned: usize, total: usize) -> u8 {
    let percent = scanned.saturating_mul(100) / total.max(1);
    u8::try_from(percent.min(99)).unwrap_or(99)
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
    use futures::executor::block_on;

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
    fn test_progress_percent_caps() {
        assert_eq!(progress_percent(0, 100), 0);
        assert_eq!(progress_percent(50, 100), 50);
        assert_eq!(progress_percent(100, 100), 99);
        assert_eq!(progress_percent(3, 0), 99);
    }

    #[test]
    fn test_resolve_scope() {
        let columns = vec![ColumnDescriptor::new("a"), ColumnDescriptor::new("b")];
        assert_eq!(resolve_scope(&columns, &[]).unwrap(), vec!["a", "b"]);
        assert_eq!(
            resolve_scope(&columns, &["b".into(), "b".into()]).unwrap(),
            vec!["b"]
        );
        assert!(matches!(
            resolve_scope(&columns, &["zzz".into()]),
            Err(GridError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_exact_search_encounter_order() {
        let data = rows(&["alpha", "beta", "alphabet"]);
        let generation = SearchGeneration::new();
        let ticket = generation.begin();
        let outcome = block_on(search(
            &data,
            &scope(),
            "alpha",
            &SearchOptions::default(),
            &ticket,
            1,
            |_| {},
        ))
        .unwrap();
        let SearchOutcome::Completed(results) = outcome else {
            panic!("expected completion");
        };
        let found: Vec<usize> = results.iter().map(|r| r.row_index).collect();
        assert_eq!(found, vec![0, 2]);
    }

    #[test]
    fn test_empty_query_reports_zero() {
        let data = rows(&["alpha"]);
        let ticket = SearchGeneration::new().begin();
        let mut seen = Vec::new();
        let outcome = block_on(search(
            &data,
            &scope(),
            "",
            &SearchOptions::default(),
            &ticket,
            1,
            |p| seen.push(p.percent),
        ))
        .unwrap();
        assert_eq!(outcome, SearchOutcome::Completed(Vec::new()));
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn test_bad_threshold_rejected() {
        let data = rows(&["alpha"]);
        let ticket = SearchGeneration::new().begin();
        let result = block_on(search(
            &data,
            &scope(),
            "a",
            &SearchOptions::fuzzy(1.5),
            &ticket,
            1,
            |_| {},
        ));
        assert!(matches!(result, Err(GridError::InvalidOption(_))));
    }
}
