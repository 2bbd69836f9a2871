//! Coordinate mapping between grid cells and canvas pixels
//!
//! Column widths are keyed by column name so a width follows its column
//! through reorders. Left edges are kept in a prefix-sum cache
//! (`column_positions`) that is rebuilt only when widths or the set of
//! columns change, never per cell.

use std::collections::HashMap;
use std::ops::Range;

use crate::config::EngineConfig;
use crate::data::TabularModel;

/// Pixel rectangle of a cell in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CellRect {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
}

/// Per-column widths plus the cached column boundaries
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    widths: HashMap<String, f64>,
    default_width: f64,
    min_width: f64,
    max_width: f64,
    row_height: f64,
    x_origin: f64,
    y_origin: f64,
    /// Column names in display order as of the last recompute
    names: Vec<String>,
    /// `names.len() + 1` boundaries, `positions[0] == x_origin`
    positions: Vec<f64>,
    rows: usize,
    dirty: bool,
}

impl ColumnLayout {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            widths: HashMap::new(),
            default_width: config.cell_width,
            min_width: config.min_cell_width,
            max_width: config.max_cell_width,
            row_height: config.row_height,
            x_origin: 0.0,
            y_origin: 0.0,
            names: Vec::new(),
            positions: vec![0.0],
            rows: 0,
            dirty: true,
        }
    }

    /// Refresh row/column bounds from the model and rebuild the position
    /// cache if any width or the column set changed.
    ///
    /// Returns true when the cache was rebuilt.
    pub fn recompute(&mut self, model: &dyn TabularModel) -> bool {
        self.rows = model.row_count();

        let cols = model.column_count();
        let same_columns = cols == self.names.len()
            && (0..cols).all(|c| model.column_name(c) == Some(self.names[c].as_str()));
        if same_columns && !self.dirty {
            return false;
        }

        self.names = (0..cols)
            .map(|c| model.column_name(c).unwrap_or_default().to_string())
            .collect();
        self.rebuild_positions();
        true
    }

    fn rebuild_positions(&mut self) {
        let mut x = self.x_origin;
        self.positions.clear();
        self.positions.push(x);
        for name in &self.names {
            x += self.widths.get(name).copied().unwrap_or(self.default_width);
            self.positions.push(x);
        }
        self.dirty = false;
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn set_row_height(&mut self, height: f64) {
        self.row_height = height.max(1.0);
    }

    /// Cached column boundaries, `column_count() + 1` entries
    pub fn column_positions(&self) -> &[f64] {
        &self.positions
    }

    /// Width of the column at `col` in the current order
    pub fn width_of(&self, col: usize) -> f64 {
        match (self.positions.get(col), self.positions.get(col + 1)) {
            (Some(a), Some(b)) => b - a,
            _ => self.default_width,
        }
    }

    /// Width configured for a named column (explicit or default)
    pub fn width_for_name(&self, name: &str) -> f64 {
        self.widths.get(name).copied().unwrap_or(self.default_width)
    }

    pub fn default_width(&self) -> f64 {
        self.default_width
    }

    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Set a column's width, clamped to the configured bounds.
    ///
    /// Takes effect on the next [`ColumnLayout::recompute`].
    pub fn set_width(&mut self, name: &str, width: f64) -> f64 {
        let width = width.clamp(self.min_width, self.max_width);
        self.widths.insert(name.to_string(), width);
        self.dirty = true;
        width
    }

    /// Change the width of the column at `col` and rebuild the cache now
    pub fn resize(&mut self, col: usize, width: f64) -> Option<f64> {
        let name = self.names.get(col)?.clone();
        let width = self.set_width(&name, width);
        self.rebuild_positions();
        Some(width)
    }

    /// Forget explicit widths of columns that no longer exist
    pub fn retain_columns(&mut self, names: &[&str]) {
        self.widths.retain(|name, _| names.contains(&name.as_str()));
    }

    /// Drop every explicit width
    pub fn reset_widths(&mut self) {
        self.widths.clear();
        self.dirty = true;
    }

    /// Total table width: sum of column widths plus the x origin
    pub fn total_width(&self) -> f64 {
        self.positions.last().copied().unwrap_or(self.x_origin)
    }

    pub fn total_height(&self) -> f64 {
        self.rows as f64 * self.row_height + self.y_origin
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> CellRect {
        let last = self.total_width();
        let x1 = self.positions.get(col).copied().unwrap_or(last);
        let x2 = self.positions.get(col + 1).copied().unwrap_or(last);
        let y1 = self.row_height * row as f64 + self.y_origin;
        CellRect {
            x1,
            y1,
            x2,
            y2: y1 + self.row_height,
        }
    }

    /// Row containing `y`, clamped to `[0, row_count]`
    pub fn row_at(&self, y: f64) -> usize {
        let offset = (y - self.y_origin) / self.row_height;
        if offset <= 0.0 || offset.is_nan() {
            return 0;
        }
        (offset.floor() as usize).min(self.rows)
    }

    /// Column containing `x`, clamped to `[0, column_count]`.
    ///
    /// Linear scan of the boundaries; column counts are small.
    pub fn col_at(&self, x: f64) -> usize {
        let cols = self.names.len();
        self.positions
            .iter()
            .skip(1)
            .position(|&right| right > x)
            .unwrap_or(cols)
            .min(cols)
    }

    /// Cell under a canvas point, if it lies inside the data
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if x < self.x_origin || y < self.y_origin {
            return None;
        }
        let (row, col) = (self.row_at(y), self.col_at(x));
        (row < self.rows && col < self.names.len()).then_some((row, col))
    }

    /// Rows intersecting `[y1, y2)`; empty when the table has no cells
    pub fn visible_row_range(&self, y1: f64, y2: f64) -> Range<usize> {
        if self.rows == 0 || self.names.is_empty() || y2 <= y1 {
            return 0..0;
        }
        let start = self.row_at(y1);
        let end = (self.row_at(y2) + 1).min(self.rows);
        start.min(end)..end
    }

    /// Columns intersecting `[x1, x2)`; empty when the table has no cells
    pub fn visible_col_range(&self, x1: f64, x2: f64) -> Range<usize> {
        if self.rows == 0 {
            return 0..0;
        }
        self.header_col_range(x1, x2)
    }

    /// Columns intersecting `[x1, x2)` regardless of the row count.
    ///
    /// Column headers are drawn even when the table has no rows.
    pub fn header_col_range(&self, x1: f64, x2: f64) -> Range<usize> {
        let cols = self.names.len();
        if cols == 0 || x2 <= x1 {
            return 0..0;
        }
        let start = self.col_at(x1);
        let end = (self.col_at(x2) + 1).min(cols);
        start.min(end)..end
    }

    /// Column whose right boundary lies within `tolerance` of `x`
    pub fn boundary_near(&self, x: f64, tolerance: f64) -> Option<usize> {
        self.positions
            .iter()
            .skip(1)
            .position(|&right| (right - x).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataFrame;

    fn layout_for(rows: usize, cols: usize) -> (ColumnLayout, DataFrame) {
        let config = EngineConfig::default();
        let df = DataFrame::empty(rows, cols);
        let mut layout = ColumnLayout::new(&config);
        layout.recompute(&df);
        (layout, df)
    }

    #[test]
    fn test_positions_len_and_monotonic() {
        let (layout, _) = layout_for(10, 4);
        let positions = layout.column_positions();
        assert_eq!(positions.len(), 5);
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(layout.total_width(), 400.0);
    }

    #[test]
    fn test_cell_rect_round_trip() {
        let (mut layout, df) = layout_for(20, 5);
        layout.set_width("C", 55.0);
        layout.recompute(&df);

        for row in 0..20 {
            for col in 0..5 {
                let rect = layout.cell_rect(row, col);
                assert_eq!(layout.row_at(rect.y1), row);
                assert_eq!(layout.col_at(rect.x1), col);
            }
        }
    }

    #[test]
    fn test_row_and_col_at_clamp() {
        let (layout, _) = layout_for(3, 2);
        assert_eq!(layout.row_at(-50.0), 0);
        assert_eq!(layout.row_at(10_000.0), 3);
        assert_eq!(layout.col_at(-1.0), 0);
        assert_eq!(layout.col_at(10_000.0), 2);
        assert_eq!(layout.cell_at(10_000.0, 5.0), None);
    }

    #[test]
    fn test_resize_shifts_following_positions() {
        let (mut layout, df) = layout_for(5, 6);
        layout.set_width("C", 80.0);
        layout.recompute(&df);
        let before = layout.column_positions().to_vec();

        layout.resize(2, 40.0);
        let after = layout.column_positions();

        assert_eq!(&after[..=2], &before[..=2]);
        for i in 3..after.len() {
            assert_eq!(after[i], before[i] - 40.0);
        }
    }

    #[test]
    fn test_width_follows_column_name_after_move() {
        let config = EngineConfig::default();
        let mut df = DataFrame::empty(2, 3);
        let mut layout = ColumnLayout::new(&config);
        layout.set_width("A", 150.0);
        layout.recompute(&df);
        assert_eq!(layout.width_of(0), 150.0);

        df.move_column(0, 2).unwrap();
        assert!(layout.recompute(&df));
        assert_eq!(layout.width_of(2), 150.0);
        assert_eq!(layout.width_of(0), config.cell_width);
    }

    #[test]
    fn test_recompute_skips_when_unchanged() {
        let (mut layout, df) = layout_for(5, 3);
        assert!(!layout.recompute(&df));
        layout.set_width("A", 120.0);
        assert!(layout.recompute(&df));
    }

    #[test]
    fn test_set_width_clamps() {
        let (mut layout, _) = layout_for(1, 1);
        assert_eq!(layout.set_width("A", 1.0), layout.min_width());
        assert_eq!(layout.set_width("A", 10_000.0), layout.max_width());
    }

    #[test]
    fn test_visible_ranges() {
        let (layout, _) = layout_for(100, 10);
        // Rows are 22px, columns 100px
        assert_eq!(layout.visible_row_range(0.0, 220.0), 0..11);
        assert_eq!(layout.visible_row_range(44.0, 66.0), 2..4);
        assert_eq!(layout.visible_col_range(150.0, 350.0), 1..4);
        assert_eq!(layout.visible_col_range(0.0, 5000.0), 0..10);
    }

    #[test]
    fn test_empty_table_ranges() {
        let (layout, _) = layout_for(0, 5);
        assert_eq!(layout.visible_row_range(0.0, 500.0), 0..0);
        assert_eq!(layout.visible_col_range(0.0, 500.0), 0..0);
        assert_eq!(layout.header_col_range(0.0, 500.0), 0..5);

        let (layout, _) = layout_for(5, 0);
        assert_eq!(layout.visible_row_range(0.0, 500.0), 0..0);
        assert_eq!(layout.header_col_range(0.0, 500.0), 0..0);
    }

    #[test]
    fn test_boundary_near() {
        let (layout, _) = layout_for(1, 3);
        assert_eq!(layout.boundary_near(101.0, 3.0), Some(0));
        assert_eq!(layout.boundary_near(198.0, 3.0), Some(1));
        assert_eq!(layout.boundary_near(150.0, 3.0), None);
    }
}
