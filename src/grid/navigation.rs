//! Keyboard navigation targets
//!
//! Arrow keys, Tab/Shift+Tab, Home/End and paging. Every move is computed
//! from the current cell and clamped to the table bounds.

use super::CellPosition;

/// A keyboard movement of the current cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Up,
    Down,
    Left,
    Right,
    /// Tab: next column, wrapping to the next row
    NextCell,
    /// Shift+Tab: previous column, wrapping to the previous row
    PrevCell,
    /// Home
    RowStart,
    /// End
    RowEnd,
    /// Ctrl+Home
    FirstCell,
    /// Ctrl+End
    LastCell,
    PageUp,
    PageDown,
}

impl Navigation {
    /// Cell reached from `from` in a `rows` × `cols` table.
    ///
    /// `page` is the number of rows a page move covers. Returns `None` for an
    /// empty table.
    pub fn target(
        self,
        from: CellPosition,
        rows: usize,
        cols: usize,
        page: usize,
    ) -> Option<CellPosition> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let last_row = rows - 1;
        let last_col = cols - 1;
        let row = from.row.min(last_row);
        let col = from.col.min(last_col);
        let page = page.max(1);

        let target = match self {
            Navigation::Up => CellPosition::new(row.saturating_sub(1), col),
            Navigation::Down => CellPosition::new((row + 1).min(last_row), col),
            Navigation::Left => CellPosition::new(row, col.saturating_sub(1)),
            Navigation::Right => CellPosition::new(row, (col + 1).min(last_col)),
            Navigation::NextCell => {
                if col < last_col {
                    CellPosition::new(row, col + 1)
                } else if row < last_row {
                    CellPosition::new(row + 1, 0)
                } else {
                    CellPosition::new(last_row, last_col)
                }
            }
            Navigation::PrevCell => {
                if col > 0 {
                    CellPosition::new(row, col - 1)
                } else if row > 0 {
                    CellPosition::new(row - 1, last_col)
                } else {
                    CellPosition::new(0, 0)
                }
            }
            Navigation::RowStart => CellPosition::new(row, 0),
            Navigation::RowEnd => CellPosition::new(row, last_col),
            Navigation::FirstCell => CellPosition::new(0, 0),
            Navigation::LastCell => CellPosition::new(last_row, last_col),
            Navigation::PageUp => CellPosition::new(row.saturating_sub(page), col),
            Navigation::PageDown => CellPosition::new((row + page).min(last_row), col),
        };
        Some(target)
    }
}
