//! Grid selection state
//!
//! Tracks the current cell, the anchor used by range extension, and the
//! selected row and column sets. After every operation the current cell lies
//! inside both sets, or all of them are empty.
//!
//! Ctrl-click toggling works on whole cells: row and column membership are
//! added or removed together, so a toggled-off cell never survives in one
//! dimension while gone from the other.

use super::CellPosition;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Option<CellPosition>,
    anchor: Option<CellPosition>,
    multi_rows: Vec<usize>,
    multi_cols: Vec<usize>,
    /// Set when whole columns are selected (header click, select all)
    all_rows: bool,
    rows: usize,
    cols: usize,
}

impl SelectionState {
    /// Empty selection over a table of `rows` × `cols`
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    pub fn current(&self) -> Option<CellPosition> {
        self.current
    }

    pub fn anchor(&self) -> Option<CellPosition> {
        self.anchor
    }

    pub fn multi_rows(&self) -> &[usize] {
        &self.multi_rows
    }

    pub fn multi_cols(&self) -> &[usize] {
        &self.multi_cols
    }

    pub fn all_rows(&self) -> bool {
        self.all_rows
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Whether the cell lies in both the row and column sets
    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.multi_rows.contains(&row) && self.multi_cols.contains(&col)
    }

    /// Number of selected cells (rows × columns)
    pub fn cell_count(&self) -> usize {
        self.multi_rows.len() * self.multi_cols.len()
    }

    fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn clamp_position(&self, row: usize, col: usize) -> CellPosition {
        CellPosition::new(
            row.min(self.rows.saturating_sub(1)),
            col.min(self.cols.saturating_sub(1)),
        )
    }

    /// Make one cell current and the only selected cell.
    ///
    /// Out-of-bounds positions are ignored; returns whether anything changed.
    pub fn select_cell(&mut self, row: usize, col: usize) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }
        let pos = CellPosition::new(row, col);
        if self.current == Some(pos)
            && self.anchor == Some(pos)
            && !self.all_rows
            && self.multi_rows == [row]
            && self.multi_cols == [col]
        {
            return false;
        }
        self.current = Some(pos);
        self.anchor = Some(pos);
        self.multi_rows = vec![row];
        self.multi_cols = vec![col];
        self.all_rows = false;
        true
    }

    /// Move the anchor without touching the selected sets
    pub fn set_anchor(&mut self, row: usize, col: usize) {
        if self.in_bounds(row, col) {
            self.anchor = Some(CellPosition::new(row, col));
        }
    }

    /// Select the rectangle spanned by the anchor and `(to_row, to_col)`.
    ///
    /// Always recomputed from the anchor, so moving the end point back toward
    /// the anchor shrinks the range again. Positions past the table edge are
    /// clamped.
    pub fn extend_range(&mut self, to_row: usize, to_col: usize) -> bool {
        if self.rows == 0 || self.cols == 0 {
            return false;
        }
        let end = self.clamp_position(to_row, to_col);
        let Some(anchor) = self.anchor.or(self.current) else {
            return self.select_cell(end.row, end.col);
        };

        self.anchor = Some(anchor);
        self.multi_rows = span(anchor.row, end.row);
        self.multi_cols = span(anchor.col, end.col);
        self.current = Some(end);
        self.all_rows = false;
        true
    }

    /// Toggle a whole cell in or out of the selection.
    ///
    /// An unselected cell has its row and column added; a selected cell has
    /// both removed. The current cell follows the toggled cell, or moves to
    /// the last remaining row and column after a removal.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }

        if self.is_selected(row, col) {
            self.multi_rows.retain(|&r| r != row);
            self.multi_cols.retain(|&c| c != col);
            match (self.multi_rows.last(), self.multi_cols.last()) {
                (Some(&r), Some(&c)) => self.current = Some(CellPosition::new(r, c)),
                _ => {
                    self.clear();
                    return true;
                }
            }
        } else {
            if !self.multi_rows.contains(&row) {
                self.multi_rows.push(row);
            }
            if !self.multi_cols.contains(&col) {
                self.multi_cols.push(col);
            }
            self.current = Some(CellPosition::new(row, col));
        }

        self.anchor = Some(CellPosition::new(row, col));
        self.all_rows = false;
        true
    }

    /// Select every row and column
    pub fn select_all(&mut self) -> bool {
        if self.rows == 0 || self.cols == 0 {
            return false;
        }
        self.multi_rows = (0..self.rows).collect();
        self.multi_cols = (0..self.cols).collect();
        self.all_rows = true;
        let current = self
            .current
            .map(|p| self.clamp_position(p.row, p.col))
            .unwrap_or_default();
        self.current = Some(current);
        self.anchor = Some(current);
        true
    }

    /// Drop all selection state
    pub fn clear(&mut self) {
        self.current = None;
        self.anchor = None;
        self.multi_rows.clear();
        self.multi_cols.clear();
        self.all_rows = false;
    }

    /// Select one whole row (row header click)
    pub fn select_row(&mut self, row: usize) -> bool {
        if row >= self.rows || self.cols == 0 {
            return false;
        }
        let col = self.current.map(|p| p.col).unwrap_or(0).min(self.cols - 1);
        self.multi_rows = vec![row];
        self.multi_cols = (0..self.cols).collect();
        self.current = Some(CellPosition::new(row, col));
        self.anchor = self.current;
        self.all_rows = false;
        true
    }

    /// Extend a row selection from the anchor row to `row` (row header drag)
    pub fn extend_rows(&mut self, row: usize) -> bool {
        if self.rows == 0 || self.cols == 0 {
            return false;
        }
        let row = row.min(self.rows - 1);
        let Some(anchor) = self.anchor.or(self.current) else {
            return self.select_row(row);
        };
        let col = self.current.map(|p| p.col).unwrap_or(anchor.col);
        self.multi_rows = span(anchor.row, row);
        self.multi_cols = (0..self.cols).collect();
        self.current = Some(CellPosition::new(row, col));
        self.all_rows = false;
        true
    }

    /// Select one whole column (column header click)
    pub fn select_column(&mut self, col: usize) -> bool {
        if col >= self.cols || self.rows == 0 {
            return false;
        }
        let row = self.current.map(|p| p.row).unwrap_or(0).min(self.rows - 1);
        self.multi_cols = vec![col];
        self.multi_rows = (0..self.rows).collect();
        self.current = Some(CellPosition::new(row, col));
        self.anchor = self.current;
        self.all_rows = true;
        true
    }

    /// Extend a column selection from the anchor column to `col`
    pub fn extend_columns(&mut self, col: usize) -> bool {
        if self.rows == 0 || self.cols == 0 {
            return false;
        }
        let col = col.min(self.cols - 1);
        let Some(anchor) = self.anchor.or(self.current) else {
            return self.select_column(col);
        };
        let row = self.current.map(|p| p.row).unwrap_or(anchor.row);
        self.multi_cols = span(anchor.col, col);
        self.multi_rows = (0..self.rows).collect();
        self.current = Some(CellPosition::new(row, col));
        self.all_rows = true;
        true
    }

    /// Adapt to new table bounds after a structural change.
    ///
    /// Out-of-range members are dropped and the current cell clamped; an
    /// empty table clears the selection.
    pub fn clamp(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        if rows == 0 || cols == 0 {
            self.clear();
            return;
        }
        let Some(current) = self.current else {
            return;
        };

        let current = self.clamp_position(current.row, current.col);
        let was_all_rows = self.all_rows;
        self.multi_rows.retain(|&r| r < rows);
        self.multi_cols.retain(|&c| c < cols);
        if was_all_rows {
            self.multi_rows = (0..rows).collect();
        }
        self.anchor = self.anchor.map(|a| self.clamp_position(a.row, a.col));

        if self.is_selected(current.row, current.col) {
            self.current = Some(current);
        } else {
            self.select_cell(current.row, current.col);
        }
    }

    /// Forget the selection and adopt new bounds, selecting the first cell
    /// when the table is not empty.
    pub fn reset(&mut self, rows: usize, cols: usize) {
        self.clear();
        self.rows = rows;
        self.cols = cols;
        self.select_cell(0, 0);
    }
}

/// Inclusive range between two indices in ascending order
fn span(a: usize, b: usize) -> Vec<usize> {
    (a.min(b)..=a.max(b)).collect()
}
