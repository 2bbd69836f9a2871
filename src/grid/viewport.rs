//! Viewport calculations
//!
//! Tracks which portion of the grid canvas is visible. Scroll offsets are in
//! canvas pixels; the visible row and column ranges are derived again on
//! every redraw because the canvas size and scroll position change
//! independently of the dataset.

use std::ops::Range;

use super::layout::{CellRect, ColumnLayout};

/// Scroll position, canvas size and the ranges derived from them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportState {
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Canvas size in pixels (excluding headers)
    pub width: f64,
    pub height: f64,
    /// Rows intersecting the canvas as of the last redraw
    pub visible_rows: Range<usize>,
    /// Columns intersecting the canvas as of the last redraw
    pub visible_cols: Range<usize>,
}

impl ViewportState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Visible canvas region as `(x1, y1, x2, y2)`
    pub fn region(&self) -> (f64, f64, f64, f64) {
        (
            self.scroll_x,
            self.scroll_y,
            self.scroll_x + self.width,
            self.scroll_y + self.height,
        )
    }

    /// Derive the visible row/column ranges from the layout
    pub fn update(&mut self, layout: &ColumnLayout) {
        let (x1, y1, x2, y2) = self.region();
        self.visible_rows = layout.visible_row_range(y1, y2);
        self.visible_cols = layout.visible_col_range(x1, x2);
    }

    /// Forget the derived ranges (degenerate empty-table state)
    pub fn clear_ranges(&mut self) {
        self.visible_rows = 0..0;
        self.visible_cols = 0..0;
    }

    /// Columns whose header is visible, even when there are no rows
    pub fn header_cols(&self, layout: &ColumnLayout) -> Range<usize> {
        let (x1, _, x2, _) = self.region();
        layout.header_col_range(x1, x2)
    }

    /// Largest scroll offsets for content of the given size
    pub fn max_scroll(&self, content_w: f64, content_h: f64) -> (f64, f64) {
        (
            (content_w - self.width).max(0.0),
            (content_h - self.height).max(0.0),
        )
    }

    /// Scroll by a pixel delta, clamped to the content size.
    ///
    /// Returns true when the offsets changed.
    pub fn scroll_by(&mut self, dx: f64, dy: f64, content_w: f64, content_h: f64) -> bool {
        self.scroll_to(self.scroll_x + dx, self.scroll_y + dy, content_w, content_h)
    }

    /// Scroll to absolute offsets, clamped to the content size
    pub fn scroll_to(&mut self, x: f64, y: f64, content_w: f64, content_h: f64) -> bool {
        let (max_x, max_y) = self.max_scroll(content_w, content_h);
        let (old_x, old_y) = (self.scroll_x, self.scroll_y);
        self.scroll_x = x.clamp(0.0, max_x);
        self.scroll_y = y.clamp(0.0, max_y);
        self.scroll_x != old_x || self.scroll_y != old_y
    }

    /// Resize the canvas, re-clamping the scroll offsets
    pub fn set_size(&mut self, width: f64, height: f64, content_w: f64, content_h: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.scroll_to(self.scroll_x, self.scroll_y, content_w, content_h);
    }

    /// Ensure a cell rectangle is visible, scrolling if necessary
    pub fn ensure_visible(&mut self, rect: CellRect, content_w: f64, content_h: f64) -> bool {
        let mut x = self.scroll_x;
        let mut y = self.scroll_y;

        // Vertical scrolling
        if rect.y1 < y {
            y = rect.y1;
        } else if rect.y2 > y + self.height {
            y = rect.y2 - self.height;
        }

        // Horizontal scrolling
        if rect.x1 < x {
            x = rect.x1;
        } else if rect.x2 > x + self.width {
            x = (rect.x2 - self.width).min(rect.x1);
        }

        self.scroll_to(x, y, content_w, content_h)
    }

    /// Number of whole rows that fit in the canvas
    pub fn page_rows(&self, row_height: f64) -> usize {
        ((self.height / row_height).floor() as usize).max(1)
    }

    /// Check if a row is visible
    pub fn is_row_visible(&self, row: usize) -> bool {
        self.visible_rows.contains(&row)
    }

    /// Check if a column is visible
    pub fn is_col_visible(&self, col: usize) -> bool {
        self.visible_cols.contains(&col)
    }
}
