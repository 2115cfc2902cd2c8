//! Virtualized row layout.
//!
//! This module handles:
//! - Computing the row window (plus overscan) for a scroll position
//! - Managing viewport state (scroll position, height, scroll-into-view)

mod viewport;

pub use viewport::{compute_window, RowWindow, Viewport};
