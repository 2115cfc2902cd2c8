//! Row windowing for the virtualized grid.
//!
//! Rows are treated as uniform height for estimation. The window covers the
//! visible rows plus `overscan` on each side; the paddings stand in for the
//! rows that are not rendered so the scrollbar keeps its full travel.

use serde::Serialize;

/// The slice of rows to render, with spacer heights above and below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWindow {
    pub start_index: usize,
    /// Inclusive
    pub end_index: usize,
    pub overscan: usize,
    pub leading_padding: f64,
    pub trailing_padding: f64,
}

impl RowWindow {
    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    /// A window always holds at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, row: usize) -> bool {
        (self.start_index..=self.end_index).contains(&row)
    }
}

/// Compute the rows to render for a scroll position.
///
/// Returns `None` when there are no rows or the row height is not a positive
/// number. Negative (or NaN) scroll offsets count as zero.
pub fn compute_window(
    total_rows: usize,
    row_height: f64,
    scroll_offset: f64,
    viewport_height: f64,
    overscan: usize,
) -> Option<RowWindow> {
    if total_rows == 0 || row_height.is_nan() || row_height <= 0.0 {
        return None;
    }
    let scroll = if scroll_offset.is_nan() {
        0.0
    } else {
        scroll_offset.max(0.0)
    };
    let height = if viewport_height.is_nan() {
        0.0
    } else {
        viewport_height.max(0.0)
    };
    let last = total_rows - 1;

    let first_visible = to_index((scroll / row_height).floor());
    let last_visible = to_index(((scroll + height) / row_height).ceil());

    let end_index = last_visible.saturating_add(overscan).min(last);
    let start_index = first_visible.saturating_sub(overscan).min(end_index);

    Some(RowWindow {
        start_index,
        end_index,
        overscan,
        leading_padding: start_index as f64 * row_height,
        trailing_padding: (last - end_index) as f64 * row_height,
    })
}

/// Non-negative finite float to index, saturating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_index(value: f64) -> usize {
    if value.is_finite() {
        value.max(0.0) as usize
    } else if value > 0.0 {
        usize::MAX
    } else {
        0
    }
}

/// Scroll state of the row viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Vertical scroll position in pixels
    pub scroll_offset: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Estimated row height in pixels
    pub row_height: f64,
    /// Rows rendered beyond each edge
    pub overscan: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(35.0, 10)
    }
}

impl Viewport {
    pub fn new(row_height: f64, overscan: usize) -> Self {
        Self {
            scroll_offset: 0.0,
            height: 600.0,
            row_height,
            overscan,
        }
    }

    /// Total content height for `total_rows`.
    pub fn content_height(&self, total_rows: usize) -> f64 {
        total_rows as f64 * self.row_height
    }

    /// Clamp the scroll position so the last row can reach the bottom edge
    /// but not beyond.
    pub fn clamp_scroll(&mut self, total_rows: usize) {
        let max = (self.content_height(total_rows) - self.height).max(0.0);
        self.scroll_offset = if self.scroll_offset.is_nan() {
            0.0
        } else {
            self.scroll_offset.clamp(0.0, max)
        };
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, offset: f64, total_rows: usize) {
        self.scroll_offset = offset;
        self.clamp_scroll(total_rows);
    }

    pub fn scroll_by(&mut self, delta: f64, total_rows: usize) {
        self.scroll_offset += delta;
        self.clamp_scroll(total_rows);
    }

    /// Resize the viewport, keeping the scroll position valid.
    pub fn resize(&mut self, height: f64, total_rows: usize) {
        self.height = if height.is_nan() { 0.0 } else { height.max(0.0) };
        self.clamp_scroll(total_rows);
    }

    /// Rows to render at the current position.
    pub fn window(&self, total_rows: usize) -> Option<RowWindow> {
        compute_window(
            total_rows,
            self.row_height,
            self.scroll_offset,
            self.height,
            self.overscan,
        )
    }

    /// Scroll the least amount needed to show `row` in full.
    ///
    /// Returns whether the position changed. Rows past the end are ignored.
    pub fn scroll_to_row(&mut self, row: usize, total_rows: usize) -> bool {
        if row >= total_rows {
            return false;
        }
        let top = row as f64 * self.row_height;
        let bottom = top + self.row_height;
        let before = self.scroll_offset;
        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + self.height {
            self.scroll_offset = bottom - self.height;
        }
        self.clamp_scroll(total_rows);
        (self.scroll_offset - before).abs() > f64::EPSILON
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
    fn test_window_at_top() {
        let w = compute_window(100, 35.0, 0.0, 350.0, 5).unwrap();
        assert_eq!(w.start_index, 0);
        assert_eq!(w.end_index, 15);
        assert_eq!(w.leading_padding, 0.0);
        assert_eq!(w.trailing_padding, 84.0 * 35.0);
    }

    #[test]
    fn test_window_degenerate_inputs() {
        assert!(compute_window(0, 35.0, 0.0, 700.0, 10).is_none());
        assert!(compute_window(10, 0.0, 0.0, 700.0, 10).is_none());
        assert!(compute_window(10, f64::NAN, 0.0, 700.0, 10).is_none());
        let w = compute_window(10, 35.0, -500.0, 700.0, 10).unwrap();
        assert_eq!((w.start_index, w.end_index), (0, 9));
    }

    #[test]
    fn test_scroll_past_end_keeps_start_before_end() {
        let w = compute_window(10, 35.0, 1e9, 700.0, 2).unwrap();
        assert!(w.start_index <= w.end_index);
        assert_eq!(w.end_index, 9);
        assert_eq!(w.trailing_padding, 0.0);
    }

    #[test]
    fn test_viewport_clamps() {
        let mut vp = Viewport::new(35.0, 10);
        vp.resize(700.0, 100);
        vp.set_scroll(1e6, 100);
        assert_eq!(vp.scroll_offset, 3500.0 - 700.0);
        vp.scroll_by(-1e6, 100);
        assert_eq!(vp.scroll_offset, 0.0);
    }

    #[test]
    fn test_scroll_to_row() {
        let mut vp = Viewport::new(35.0, 10);
        vp.resize(350.0, 1000);
        assert!(!vp.scroll_to_row(3, 1000));
        assert!(vp.scroll_to_row(50, 1000));
        assert_eq!(vp.scroll_offset, 51.0 * 35.0 - 350.0);
        assert!(vp.scroll_to_row(2, 1000));
        assert_eq!(vp.scroll_offset, 70.0);
        assert!(!vp.scroll_to_row(5000, 1000));
    }
}
