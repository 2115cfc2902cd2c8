use std::collections::BTreeSet;

use super::CellAddr;

/// Cell selection state: a set of selected cells plus the anchor that range
/// selections extend from.
///
/// The anchor always refers to the most recent explicit click. Drag
/// accumulation ([`Selection::add_cell`]) never moves it, and a range
/// selection is always computed from it rather than from the previous range.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    cells: BTreeSet<CellAddr>,
    anchor: Option<CellAddr>,
    dragging: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a click gesture.
    ///
    /// - `is_range` with an anchor: select exactly the rectangle between the
    ///   anchor and the target. Column positions come from `column_order`.
    ///   The anchor is left in place.
    /// - `is_multi`: toggle the target cell; the anchor moves to the target.
    /// - otherwise: the target becomes the only selected cell and the anchor.
    pub fn select_cell(
        &mut self,
        row: usize,
        column: &str,
        is_multi: bool,
        is_range: bool,
        column_order: &[String],
    ) {
        let target = CellAddr::new(row, column);

        if is_range {
            if let Some(anchor) = self.anchor.clone() {
                self.cells = rectangle(&anchor, &target, column_order);
                return;
            }
        }

        if is_multi {
            if !self.cells.remove(&target) {
                self.cells.insert(target.clone());
            }
            self.anchor = Some(target);
            return;
        }

        self.cells.clear();
        self.cells.insert(target.clone());
        self.anchor = Some(target);
    }

    /// Add a cell without touching the anchor (drag accumulation).
    pub fn add_cell(&mut self, row: usize, column: &str) {
        self.cells.insert(CellAddr::new(row, column));
    }

    /// Empty the selection and forget the anchor.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.anchor = None;
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn anchor(&self) -> Option<&CellAddr> {
        self.anchor.as_ref()
    }

    pub fn contains(&self, row: usize, column: &str) -> bool {
        self.cells.contains(&CellAddr::new(row, column))
    }

    /// Selected cells in row-then-column-id order.
    pub fn cells(&self) -> impl Iterator<Item = &CellAddr> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding rectangle of the selection as
    /// `(min_row, min_col_pos, max_row, max_col_pos)`, with column positions
    /// taken from `column_order`. Cells whose column is not in the order are
    /// ignored.
    pub fn bounds(&self, column_order: &[String]) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for cell in &self.cells {
            let Some(col) = column_position(column_order, &cell.column) else {
                continue;
            };
            bounds = Some(match bounds {
                None => (cell.row, col, cell.row, col),
                Some((r0, c0, r1, c1)) => (
                    r0.min(cell.row),
                    c0.min(col),
                    r1.max(cell.row),
                    c1.max(col),
                ),
            });
        }
        bounds
    }
}

fn column_position(column_order: &[String], column: &str) -> Option<usize> {
    column_order.iter().position(|id| id == column)
}

/// Every cell in the rectangle spanned by two corners. If either column is
/// missing from the order the rectangle degenerates to the target cell.
fn rectangle(anchor: &CellAddr, target: &CellAddr, column_order: &[String]) -> BTreeSet<CellAddr> {
    let (Some(anchor_col), Some(target_col)) = (
        column_position(column_order, &anchor.column),
        column_position(column_order, &target.column),
    ) else {
        return BTreeSet::from([target.clone()]);
    };

    let (min_row, max_row) = (anchor.row.min(target.row), anchor.row.max(target.row));
    let (min_col, max_col) = (anchor_col.min(target_col), anchor_col.max(target_col));
    let columns = column_order
        .iter()
        .skip(min_col)
        .take(max_col - min_col + 1);

    (min_row..=max_row)
        .flat_map(|row| columns.clone().map(move |id| CellAddr::new(row, id.as_str())))
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

    fn order() -> Vec<String> {
        vec!["name".into(), "age".into(), "city".into()]
    }

    #[test]
    fn test_plain_click_replaces_selection() {
        let mut sel = Selection::new();
        sel.select_cell(0, "name", false, false, &order());
        sel.select_cell(3, "city", false, false, &order());
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(3, "city"));
        assert_eq!(sel.anchor(), Some(&CellAddr::new(3, "city")));
    }

    #[test]
    fn test_multi_toggles_membership() {
        let mut sel = Selection::new();
        sel.select_cell(0, "name", false, false, &order());
        sel.select_cell(1, "age", true, false, &order());
        assert_eq!(sel.len(), 2);
        sel.select_cell(0, "name", true, false, &order());
        assert_eq!(sel.len(), 1);
        assert!(!sel.contains(0, "name"));
        // Anchor follows the toggled cell even when it was removed
        assert_eq!(sel.anchor(), Some(&CellAddr::new(0, "name")));
    }

    #[test]
    fn test_range_without_anchor_is_plain_click() {
        let mut sel = Selection::new();
        sel.select_cell(2, "age", false, true, &order());
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.anchor(), Some(&CellAddr::new(2, "age")));
    }

    #[test]
    fn test_range_with_unknown_column_selects_target() {
        let mut sel = Selection::new();
        sel.select_cell(0, "name", false, false, &order());
        sel.select_cell(4, "ghost", false, true, &order());
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(4, "ghost"));
        assert_eq!(sel.anchor(), Some(&CellAddr::new(0, "name")));
    }

    #[test]
    fn test_bounds() {
        let mut sel = Selection::new();
        sel.select_cell(5, "city", false, false, &order());
        sel.add_cell(2, "age");
        assert_eq!(sel.bounds(&order()), Some((2, 1, 5, 2)));
        sel.clear();
        assert_eq!(sel.bounds(&order()), None);
    }
}
