//! Drives a search scan against shared editor state.
//!
//! The state is only borrowed between yield points: once to start the job,
//! briefly for each progress report, and once to publish. Other handlers
//! (edits, a newer search, cancel) run freely while the scan is parked.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::search::{search, SearchOutcome, SearchProgress};
use crate::types::SearchOptions;

use super::state::EditorState;

/// Run a search to completion (or until superseded) and publish its results.
///
/// `on_progress` sees every report the scan makes, including the final 100.
/// Reports from a superseded scan are not recorded in the state.
pub async fn run_search<F>(
    state: Rc<RefCell<EditorState>>,
    query: &str,
    options: &SearchOptions,
    mut on_progress: F,
) -> Result<SearchOutcome>
where
    F: FnMut(SearchProgress),
{
    let job = state.borrow_mut().begin_search(query, options)?;
    let Some(job) = job else {
        return Ok(SearchOutcome::Completed(Vec::new()));
    };

    let outcome = search(
        &job.rows,
        &job.scope,
        &job.query,
        &job.options,
        &job.ticket,
        job.step_percent,
        |progress| {
            // Skipped while another handler holds the state.
            if let Ok(mut s) = state.try_borrow_mut() {
                s.record_progress(&job.ticket, progress);
            }
            on_progress(progress);
        },
    )
    .await?;

    match outcome {
        SearchOutcome::Completed(results) => {
            if state.borrow_mut().complete_search(&job.ticket, results.clone()) {
                Ok(SearchOutcome::Completed(results))
            } else {
                Ok(SearchOutcome::Superseded)
            }
        }
        SearchOutcome::Superseded => {
            debug!(ticket = job.ticket.id(), "search abandoned");
            Ok(SearchOutcome::Superseded)
        }
    }
}
