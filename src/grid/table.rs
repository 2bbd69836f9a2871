//! The grid widget aggregate
//!
//! [`Table`] owns the dataset and every engine component and exposes the
//! operations collaborators call. Each operation mutates state, rebuilds the
//! affected parts of the scene before returning, and reports what changed
//! as [`Damage`] so the viewer knows whether to present a new frame.
//!
//! Structural changes (rows or columns added, removed, moved, sorted, or the
//! dataset replaced) always clamp the selection and run a full redraw within
//! the same call.

use super::editor::{CellEditor, EditMode, EditOutcome};
use super::format::{display_text, estimate_width};
use super::header::{ColumnHeader, CursorHint, HeaderEvent, IndexHeader, RowHeader};
use super::layout::ColumnLayout;
use super::navigation::Navigation;
use super::render::{choice_rect, Decorations, HighlightMask, RenderContext, ViewportRenderer};
use super::selection::SelectionState;
use super::surface::Surface;
use super::viewport::ViewportState;
use super::CellPosition;
use crate::config::EngineConfig;
use crate::damage::{Damage, DamageArea};
use crate::data::{CellValue, ColumnType, DataFrame, ModelError, TabularModel};
use crate::theme::{Color, Theme};

/// Value edits touching more cells than this redraw fully
const PARTIAL_REDRAW_LIMIT: usize = 256;

/// Rows scanned when fitting a column to its content
const AUTOFIT_SAMPLE_ROWS: usize = 1000;

const MIN_FONT_SIZE: f32 = 8.0;
const MAX_FONT_SIZE: f32 = 32.0;

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Keyboard input routed to an open cell editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    InsertChar(char),
    InsertText(String),
    Backspace,
    Delete,
    DeleteWordBackward,
    MoveLeft { select: bool },
    MoveRight { select: bool },
    Home { select: bool },
    End { select: bool },
    WordLeft { select: bool },
    WordRight { select: bool },
    SelectAll,
    ChoicePrev,
    ChoiceNext,
}

/// Which component received the last pointer press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Pointer {
    #[default]
    None,
    Grid,
    ColumnHeader,
    RowHeader,
}

/// Window region under a pointer, in the region's own coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
enum Hit {
    Corner,
    ColumnHeader(f64),
    RowHeader(f64),
    Grid(f64, f64),
}

/// Spreadsheet grid bound to a [`DataFrame`]
pub struct Table {
    model: DataFrame,
    config: EngineConfig,
    theme: Theme,
    layout: ColumnLayout,
    selection: SelectionState,
    viewport: ViewportState,
    renderer: ViewportRenderer,
    editor: CellEditor,
    column_header: ColumnHeader,
    row_header: RowHeader,
    index_header: IndexHeader,
    decorations: Decorations,
    /// Dataset before the last structural or bulk change
    undo: Option<DataFrame>,
    pointer: Pointer,
    /// Window size including the header strips
    window: (f64, f64),
}

impl Table {
    /// Create a table for a window of `width` × `height` pixels (headers
    /// included) and draw it.
    pub fn new(model: DataFrame, config: EngineConfig, theme: Theme, width: f64, height: f64) -> Self {
        let mut selection = SelectionState::new(0, 0);
        selection.reset(model.row_count(), model.column_count());
        let mut table = Self {
            layout: ColumnLayout::new(&config),
            viewport: ViewportState::new(
                width - config.row_header_width,
                height - config.header_height,
            ),
            editor: CellEditor::new(&config),
            model,
            config,
            theme,
            selection,
            renderer: ViewportRenderer::new(),
            column_header: ColumnHeader::new(),
            row_header: RowHeader::new(),
            index_header: IndexHeader,
            decorations: Decorations::default(),
            undo: None,
            pointer: Pointer::None,
            window: (width, height),
        };
        table.apply_geometry();
        table.redraw(true);
        table
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn model(&self) -> &DataFrame {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn renderer(&self) -> &ViewportRenderer {
        &self.renderer
    }

    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn column_header(&self) -> &ColumnHeader {
        &self.column_header
    }

    pub fn has_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Short description of the current cell and selection for a status bar
    pub fn status(&self) -> String {
        let Some(current) = self.selection.current() else {
            return format!(
                "{} rows × {} columns",
                self.model.row_count(),
                self.model.column_count()
            );
        };
        let name = self.model.column_name(current.col).unwrap_or_default();
        let kind = self
            .model
            .column_type(current.col)
            .map(ColumnType::label)
            .unwrap_or_default();
        let mut status = format!(
            "{}:{} {} ({})",
            current.row + 1,
            current.col + 1,
            name,
            kind
        );
        let count = self.selection.cell_count();
        if count > 1 {
            status.push_str(&format!(" | {} cells selected", count));
        }
        status
    }

    /// Draw the current scenes onto a surface
    pub fn paint(&self, surface: &mut dyn Surface) {
        self.renderer
            .paint(surface, &self.layout, &self.viewport, &self.config);
    }

    // ------------------------------------------------------------------
    // Rendering plumbing
    // ------------------------------------------------------------------

    /// Rebuild the scene parts named by `damage`
    fn refresh(&mut self, damage: &Damage) {
        if damage.is_full() {
            self.redraw(true);
            return;
        }
        if let Some(cells) = damage.damaged_cells() {
            let ctx = RenderContext {
                model: &self.model,
                selection: &self.selection,
                decorations: &self.decorations,
                editor: &self.editor,
                config: &self.config,
                theme: &self.theme,
                column_header: &self.column_header,
                row_header: &self.row_header,
                index_header: &self.index_header,
            };
            for cell in cells {
                self.renderer
                    .redraw_cell(&ctx, &self.layout, &self.viewport, cell.row, cell.col);
            }
        }
        if damage.includes_selection() || damage.includes_headers() {
            self.redraw(false);
        }
    }

    /// Run the renderer over the whole viewport
    pub fn redraw(&mut self, full: bool) {
        let ctx = RenderContext {
            model: &self.model,
            selection: &self.selection,
            decorations: &self.decorations,
            editor: &self.editor,
            config: &self.config,
            theme: &self.theme,
            column_header: &self.column_header,
            row_header: &self.row_header,
            index_header: &self.index_header,
        };
        self.renderer
            .redraw(&ctx, &mut self.layout, &mut self.viewport, full);
    }

    fn finish(&mut self, damage: Damage) -> Damage {
        self.refresh(&damage);
        damage
    }

    fn content_size(&self) -> (f64, f64) {
        (self.layout.total_width(), self.layout.total_height())
    }

    /// Size the canvas from the window minus the header strips
    fn apply_geometry(&mut self) {
        self.layout.recompute(&self.model);
        let (cw, ch) = self.content_size();
        self.viewport.set_size(
            self.window.0 - self.config.row_header_width,
            self.window.1 - self.config.header_height,
            cw,
            ch,
        );
    }

    /// Scroll so a cell is visible; true when the offsets changed
    fn ensure_visible(&mut self, row: usize, col: usize) -> bool {
        self.layout.recompute(&self.model);
        let rect = self.layout.cell_rect(row, col);
        let (cw, ch) = self.content_size();
        self.viewport.ensure_visible(rect, cw, ch)
    }

    /// Selection damage, or a full redraw when the viewport moved
    fn follow_current(&mut self, changed: bool) -> Damage {
        let scrolled = match self.selection.current() {
            Some(pos) => self.ensure_visible(pos.row, pos.col),
            None => false,
        };
        if scrolled {
            Damage::Full
        } else {
            Damage::selection_if(changed)
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) -> Damage {
        self.window = (width, height);
        self.apply_geometry();
        self.finish(Damage::Full)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Damage {
        tracing::info!("Switched grid theme to {}", theme.name);
        self.theme = theme;
        self.finish(Damage::Full)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_cell(&mut self, row: usize, col: usize) -> Damage {
        let mut damage = self.close_editor();
        let changed = self.selection.select_cell(row, col);
        damage.merge(self.follow_current(changed));
        self.finish(damage)
    }

    pub fn select_all(&mut self) -> Damage {
        let changed = self.selection.select_all();
        self.finish(Damage::selection_if(changed))
    }

    pub fn clear_selection(&mut self) -> Damage {
        let changed = !self.selection.is_empty();
        self.selection.clear();
        self.finish(Damage::selection_if(changed))
    }

    /// Sorted rows and columns of the selection for data extraction.
    ///
    /// When exactly one row is selected the whole column is implied, so a
    /// click on a single cell yields every row of its column.
    pub fn selection_extent(&self) -> (Vec<usize>, Vec<usize>) {
        let mut rows = self.selection.multi_rows().to_vec();
        let mut cols = self.selection.multi_cols().to_vec();
        rows.sort_unstable();
        cols.sort_unstable();
        if rows.len() == 1 {
            rows = (0..self.model.row_count()).collect();
        }
        (rows, cols)
    }

    /// Copy of the data under the selection
    pub fn selected_subframe(&self) -> DataFrame {
        let (rows, cols) = self.selection_extent();
        self.model.sub_frame(&rows, &cols)
    }

    /// Selected values, one vector per selected column
    pub fn selection_values(&self) -> Vec<Vec<CellValue>> {
        let (rows, cols) = self.selection_extent();
        cols.iter()
            .map(|&col| {
                rows.iter()
                    .map(|&row| self.model.get_value(row, col))
                    .collect()
            })
            .collect()
    }

    fn selected_cells(&self) -> Vec<CellPosition> {
        let mut rows = self.selection.multi_rows().to_vec();
        let mut cols = self.selection.multi_cols().to_vec();
        rows.sort_unstable();
        cols.sort_unstable();
        rows.iter()
            .flat_map(|&row| cols.iter().map(move |&col| CellPosition::new(row, col)))
            .collect()
    }

    /// Write `values` into cells; values a column rejects are skipped
    fn write_cells(&mut self, writes: Vec<(CellPosition, CellValue)>) -> Damage {
        if writes.is_empty() {
            return Damage::None;
        }
        self.save_undo();
        let mut written = Vec::with_capacity(writes.len());
        let mut rejected = 0;
        for (pos, value) in writes {
            match self.model.set_value(value, pos.row, pos.col) {
                Ok(()) => written.push(pos),
                Err(e) => {
                    tracing::debug!("Skipped write: {}", e);
                    rejected += 1;
                }
            }
        }
        if rejected > 0 {
            tracing::warn!("{} values could not be stored in their columns", rejected);
        }
        if written.len() > PARTIAL_REDRAW_LIMIT {
            Damage::Full
        } else {
            Damage::cells(written)
        }
    }

    /// Replace every selected value with `f(value)`
    pub fn apply_to_selection(&mut self, mut f: impl FnMut(&CellValue) -> CellValue) -> Damage {
        let writes = self
            .selected_cells()
            .into_iter()
            .map(|pos| {
                let value = f(&self.model.get_value(pos.row, pos.col));
                (pos, value)
            })
            .collect();
        let damage = self.write_cells(writes);
        self.finish(damage)
    }

    pub fn clear_selection_values(&mut self) -> Damage {
        self.apply_to_selection(|_| CellValue::Empty)
    }

    /// Copy the first selected row's values down through the selection
    pub fn fill_down(&mut self) -> Damage {
        let mut rows = self.selection.multi_rows().to_vec();
        rows.sort_unstable();
        let Some((&first, rest)) = rows.split_first() else {
            return Damage::None;
        };
        let writes = self
            .selection
            .multi_cols()
            .iter()
            .flat_map(|&col| {
                let value = self.model.get_value(first, col);
                rest.iter()
                    .map(move |&row| (CellPosition::new(row, col), value.clone()))
            })
            .collect();
        let damage = self.write_cells(writes);
        self.finish(damage)
    }

    /// Selected cells as tab-separated lines
    pub fn copy_selection_tsv(&self) -> String {
        let mut rows = self.selection.multi_rows().to_vec();
        let mut cols = self.selection.multi_cols().to_vec();
        rows.sort_unstable();
        cols.sort_unstable();
        rows.iter()
            .map(|&row| {
                cols.iter()
                    .map(|&col| self.model.get_value(row, col).to_plain_string())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Paste tab-separated text with its top-left at the current cell.
    ///
    /// Cells past the table edge are dropped; the pasted block becomes the
    /// selection.
    pub fn paste_tsv(&mut self, text: &str) -> Damage {
        let Some(origin) = self.selection.current() else {
            return Damage::None;
        };
        let (rows, cols) = (self.model.row_count(), self.model.column_count());
        let mut writes = Vec::new();
        let mut end = origin;
        for (i, line) in text.lines().enumerate() {
            let row = origin.row + i;
            if row >= rows {
                break;
            }
            for (j, field) in line.split('\t').enumerate() {
                let col = origin.col + j;
                if col >= cols {
                    break;
                }
                writes.push((CellPosition::new(row, col), CellValue::from(field)));
                end.row = end.row.max(row);
                end.col = end.col.max(col);
            }
        }
        let mut damage = self.write_cells(writes);
        self.selection.set_anchor(origin.row, origin.col);
        self.selection.extend_range(end.row, end.col);
        damage.merge(Damage::selection());
        self.finish(damage)
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    pub fn get_value(&self, row: usize, col: usize) -> CellValue {
        self.model.get_value(row, col)
    }

    /// Set one value and redraw only that cell
    pub fn set_value(&mut self, row: usize, col: usize, value: CellValue) -> Result<Damage, ModelError> {
        self.model.set_value(value, row, col)?;
        Ok(self.finish(Damage::cells(vec![CellPosition::new(row, col)])))
    }

    // ------------------------------------------------------------------
    // Columns, colors and masks
    // ------------------------------------------------------------------

    pub fn resize_column(&mut self, col: usize, width: f64) -> Damage {
        let damage = match self.layout.resize(col, width) {
            Some(width) => {
                tracing::debug!("Column {} resized to {}", col, width);
                self.apply_geometry();
                Damage::Full
            }
            None => Damage::None,
        };
        self.finish(damage)
    }

    /// Fit columns to their header and content; empty `cols` fits all
    pub fn autofit_columns(&mut self, cols: &[usize]) -> Damage {
        let damage = self.autofit(cols);
        self.finish(damage)
    }

    fn autofit(&mut self, cols: &[usize]) -> Damage {
        let count = self.model.column_count();
        let targets: Vec<usize> = if cols.is_empty() {
            (0..count).collect()
        } else {
            cols.iter().copied().filter(|&c| c < count).collect()
        };
        if targets.is_empty() {
            return Damage::None;
        }

        let char_width = self.config.char_width();
        let sample = self.model.row_count().min(AUTOFIT_SAMPLE_ROWS);
        for col in targets {
            let Some(name) = self.model.column_name(col) else {
                continue;
            };
            let widest = self
                .model
                .column_slice(col, 0..sample)
                .iter()
                .map(|v| estimate_width(&display_text(v, self.config.float_precision), char_width))
                .fold(estimate_width(name, char_width), f64::max);
            self.layout
                .set_width(name, widest + 2.0 * self.config.cell_padding);
        }
        Damage::Full
    }

    /// Fill a column's background (`None` removes the fill)
    pub fn set_column_color(&mut self, col: usize, color: Option<Color>) -> Damage {
        let Some(name) = self.model.column_name(col).map(str::to_string) else {
            return Damage::None;
        };
        match color {
            Some(color) => self.decorations.column_colors.insert(name, color),
            None => self.decorations.column_colors.remove(&name),
        };
        self.finish(Damage::Full)
    }

    /// Fill a row's background (`None` removes the fill)
    pub fn set_row_color(&mut self, row: usize, color: Option<Color>) -> Damage {
        if row >= self.model.row_count() {
            return Damage::None;
        }
        match color {
            Some(color) => self.decorations.row_colors.insert(row, color),
            None => self.decorations.row_colors.remove(&row),
        };
        self.finish(Damage::Full)
    }

    pub fn clear_colors(&mut self) -> Damage {
        self.decorations.column_colors.clear();
        self.decorations.row_colors.clear();
        self.finish(Damage::Full)
    }

    /// Highlight cells by a mask aligned to the dataset.
    ///
    /// A mask whose dimensions differ from the dataset is refused.
    pub fn set_highlight_mask(&mut self, mask: Option<HighlightMask>) -> Damage {
        if let Some(mask) = &mask {
            let dims = (self.model.row_count(), self.model.column_count());
            if mask.dimensions() != dims {
                tracing::warn!(
                    "Ignoring highlight mask of {:?}, dataset is {:?}",
                    mask.dimensions(),
                    dims
                );
                return Damage::None;
            }
        }
        self.decorations.mask = mask;
        self.finish(Damage::Full)
    }

    // ------------------------------------------------------------------
    // Dataset lifecycle and structural changes
    // ------------------------------------------------------------------

    /// Full copy of the dataset (for saving)
    pub fn snapshot(&self) -> DataFrame {
        self.model.clone()
    }

    /// Swap in a new dataset; selection, colors and undo are reset
    pub fn replace_dataset(&mut self, model: DataFrame) -> Damage {
        tracing::info!(
            "Loaded dataset: {} rows × {} columns",
            model.row_count(),
            model.column_count()
        );
        self.editor.cancel();
        self.model = model;
        self.undo = None;
        self.decorations.clear();
        self.column_header.reset();
        self.layout.reset_widths();
        self.selection
            .reset(self.model.row_count(), self.model.column_count());
        self.viewport.scroll_x = 0.0;
        self.viewport.scroll_y = 0.0;
        self.apply_geometry();
        self.finish(Damage::Full)
    }

    /// Restore the dataset saved before the last structural or bulk change
    pub fn undo(&mut self) -> Damage {
        let Some(previous) = self.undo.take() else {
            return Damage::None;
        };
        tracing::debug!("Undo: restoring previous dataset");
        self.editor.cancel();
        self.model = previous;
        let damage = self.after_structural_change();
        self.finish(damage)
    }

    fn save_undo(&mut self) {
        self.undo = Some(self.model.clone());
    }

    fn begin_structural_change(&mut self) {
        self.editor.cancel();
        self.save_undo();
    }

    /// Clamp everything index-based to the new bounds
    fn after_structural_change(&mut self) -> Damage {
        let (rows, cols) = (self.model.row_count(), self.model.column_count());
        self.selection.clamp(rows, cols);
        if self.selection.is_empty() {
            self.selection.select_cell(0, 0);
        }

        let names = self.model.column_names();
        self.layout.retain_columns(&names);
        self.decorations
            .column_colors
            .retain(|name, _| names.contains(&name.as_str()));
        self.decorations.row_colors.retain(|&row, _| row < rows);
        if self
            .decorations
            .mask
            .as_ref()
            .is_some_and(|m| m.dimensions() != (rows, cols))
        {
            self.decorations.mask = None;
        }

        self.apply_geometry();
        Damage::Full
    }

    pub fn add_rows(&mut self, n: usize) -> Damage {
        if n == 0 {
            return Damage::None;
        }
        self.begin_structural_change();
        self.model.add_rows(n);
        let damage = self.after_structural_change();
        self.finish(damage)
    }

    pub fn delete_rows(&mut self, rows: &[usize]) -> Damage {
        let count = self.model.row_count();
        if !rows.iter().any(|&r| r < count) {
            return Damage::None;
        }
        self.begin_structural_change();
        self.model.delete_rows(rows);
        self.decorations.row_colors.clear();
        let damage = self.after_structural_change();
        self.finish(damage)
    }

    pub fn delete_selected_rows(&mut self) -> Damage {
        let rows = self.selection.multi_rows().to_vec();
        self.delete_rows(&rows)
    }

    /// Append a column; duplicate or blank names are refused unchanged
    pub fn add_column(&mut self, name: &str, kind: ColumnType) -> Result<Damage, ModelError> {
        let before = self.model.clone();
        self.model.add_column(name, kind)?;
        self.editor.cancel();
        self.undo = Some(before);
        let damage = self.after_structural_change();
        Ok(self.finish(damage))
    }

    pub fn delete_columns(&mut self, cols: &[usize]) -> Damage {
        let count = self.model.column_count();
        if !cols.iter().any(|&c| c < count) {
            return Damage::None;
        }
        self.begin_structural_change();
        self.model.delete_columns(cols);
        self.column_header.reset();
        let damage = self.after_structural_change();
        self.finish(damage)
    }

    pub fn delete_selected_columns(&mut self) -> Damage {
        let cols = self.selection.multi_cols().to_vec();
        self.delete_columns(&cols)
    }

    /// Move a column; the current cell follows it
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<Damage, ModelError> {
        let damage = self.move_column_inner(from, to)?;
        Ok(self.finish(damage))
    }

    fn move_column_inner(&mut self, from: usize, to: usize) -> Result<Damage, ModelError> {
        let before = self.model.clone();
        self.model.move_column(from, to)?;
        self.editor.cancel();
        self.undo = Some(before);
        self.column_header.reset();

        let (rows, cols) = (self.model.row_count(), self.model.column_count());
        self.selection.clamp(rows, cols);
        if let Some(current) = self.selection.current().filter(|c| c.col == from) {
            if self.selection.all_rows() {
                self.selection.select_column(to);
            } else {
                self.selection.select_cell(current.row, to);
            }
        }
        tracing::debug!("Moved column {} to {}", from, to);
        Ok(self.after_structural_change())
    }

    /// Sort by one column and show the direction in its header
    pub fn sort_by_column(&mut self, col: usize, ascending: bool) -> Damage {
        let damage = self.sort_inner(&[col], ascending);
        if damage.is_full() {
            self.column_header.set_sort_state(Some((col, ascending)));
        }
        self.finish(damage)
    }

    /// Stable sort by the given columns; empty values go last
    pub fn sort_by(&mut self, cols: &[usize], ascending: bool) -> Damage {
        let damage = self.sort_inner(cols, ascending);
        if damage.is_full() {
            self.column_header.set_sort_state(None);
        }
        self.finish(damage)
    }

    fn sort_inner(&mut self, cols: &[usize], ascending: bool) -> Damage {
        let count = self.model.column_count();
        let cols: Vec<usize> = cols.iter().copied().filter(|&c| c < count).collect();
        if cols.is_empty() {
            return Damage::None;
        }
        self.begin_structural_change();
        let order = self.model.sort_by(&cols, ascending);
        self.permute_row_decorations(&order);
        tracing::debug!("Sorted by {:?} ascending={}", cols, ascending);
        self.after_structural_change()
    }

    /// Row colors and the mask follow their rows through a reorder
    fn permute_row_decorations(&mut self, order: &[usize]) {
        let mut new_row = vec![0; order.len()];
        for (new, &old) in order.iter().enumerate() {
            new_row[old] = new;
        }
        self.decorations.row_colors = std::mem::take(&mut self.decorations.row_colors)
            .into_iter()
            .filter_map(|(old, color)| new_row.get(old).map(|&new| (new, color)))
            .collect();

        if let Some(mask) = self.decorations.mask.take() {
            let (rows, cols) = mask.dimensions();
            self.decorations.mask = Some(if rows == order.len() {
                HighlightMask::from_fn(rows, cols, |r, c| mask.get(order[r], c))
            } else {
                mask
            });
        }
    }

    /// Reset the row index to `0..n`
    pub fn reindex(&mut self) -> Damage {
        self.begin_structural_change();
        self.model.reindex();
        let damage = self.after_structural_change();
        self.finish(damage)
    }

    // ------------------------------------------------------------------
    // Navigation, scrolling and zoom
    // ------------------------------------------------------------------

    /// Move the current cell, extending the selection when `extend` is set
    pub fn navigate(&mut self, nav: Navigation, extend: bool) -> Damage {
        let from = self.selection.current().unwrap_or_default();
        let page = self.viewport.page_rows(self.layout.row_height());
        let Some(to) = nav.target(
            from,
            self.model.row_count(),
            self.model.column_count(),
            page,
        ) else {
            return Damage::None;
        };
        let changed = if extend {
            self.selection.extend_range(to.row, to.col)
        } else {
            self.selection.select_cell(to.row, to.col)
        };
        let damage = self.follow_current(changed);
        self.finish(damage)
    }

    /// Scroll by a pixel delta, clamped to the content
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> Damage {
        let (cw, ch) = self.content_size();
        let changed = self.viewport.scroll_by(dx, dy, cw, ch);
        self.finish(Damage::full_if(changed))
    }

    pub fn zoom_in(&mut self) -> Damage {
        self.set_font_size(self.config.font_size + 1.0)
    }

    pub fn zoom_out(&mut self) -> Damage {
        self.set_font_size(self.config.font_size - 1.0)
    }

    /// Change the font size; row and header heights scale along
    pub fn set_font_size(&mut self, size: f32) -> Damage {
        let size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        if size == self.config.font_size {
            return Damage::None;
        }
        let scale = (size / self.config.font_size) as f64;
        self.config.font_size = size;
        self.config.row_height = (self.config.row_height * scale).round().max(1.0);
        self.config.header_height = (self.config.header_height * scale).round().max(1.0);
        self.layout.set_row_height(self.config.row_height);
        self.apply_geometry();
        tracing::debug!("Font size {} (row height {})", size, self.config.row_height);
        self.finish(Damage::Full)
    }

    /// Switch row labels between sequence numbers and index labels
    pub fn toggle_index(&mut self) -> Damage {
        self.config.show_index = !self.config.show_index;
        self.finish(Damage::areas(vec![DamageArea::Headers]))
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Open the editor on the current cell
    pub fn begin_edit(&mut self) -> Damage {
        match self.selection.current() {
            Some(pos) => self.begin_edit_at(pos.row, pos.col),
            None => Damage::None,
        }
    }

    pub fn begin_edit_at(&mut self, row: usize, col: usize) -> Damage {
        if !self.editor.begin(&self.model, row, col) {
            return Damage::None;
        }
        if self.selection.current() != Some(CellPosition::new(row, col)) {
            self.selection.select_cell(row, col);
        }
        let damage = self.follow_current(true);
        self.finish(damage)
    }

    /// Typing: feeds an open editor or starts one with the character
    pub fn type_char(&mut self, ch: char) -> Damage {
        if self.editor.is_editing() {
            return self.edit(EditCommand::InsertChar(ch));
        }
        let Some(pos) = self.selection.current() else {
            return Damage::None;
        };
        if !self.editor.begin_with_char(&self.model, pos.row, pos.col, ch) {
            return Damage::None;
        }
        let damage = self.follow_current(true);
        self.finish(damage)
    }

    /// Apply a keystroke to the open editor
    pub fn edit(&mut self, command: EditCommand) -> Damage {
        if !self.editor.is_editing() {
            return Damage::None;
        }
        let handled = match command {
            EditCommand::ChoicePrev => self.editor.move_choice(-1),
            EditCommand::ChoiceNext => self.editor.move_choice(1),
            command => match self.editor.buffer_mut() {
                Some(buffer) => {
                    match command {
                        EditCommand::InsertChar(ch) => buffer.insert_char(ch),
                        EditCommand::InsertText(text) => buffer.insert_text(&text),
                        EditCommand::Backspace => buffer.delete_backward(),
                        EditCommand::Delete => buffer.delete_forward(),
                        EditCommand::DeleteWordBackward => buffer.delete_word_backward(),
                        EditCommand::MoveLeft { select } => buffer.move_left(select),
                        EditCommand::MoveRight { select } => buffer.move_right(select),
                        EditCommand::Home { select } => buffer.move_home(select),
                        EditCommand::End { select } => buffer.move_end(select),
                        EditCommand::WordLeft { select } => buffer.move_word_left(select),
                        EditCommand::WordRight { select } => buffer.move_word_right(select),
                        EditCommand::SelectAll => buffer.select_all(),
                        EditCommand::ChoicePrev | EditCommand::ChoiceNext => {}
                    }
                    true
                }
                None => false,
            },
        };
        self.finish(Damage::selection_if(handled))
    }

    /// Confirm the edit and move down one row
    pub fn commit_edit(&mut self) -> Damage {
        let damage = self.commit(true);
        self.finish(damage)
    }

    /// Confirm the edit without moving (Tab handles its own movement)
    pub fn commit_edit_in_place(&mut self) -> Damage {
        let damage = self.commit(false);
        self.finish(damage)
    }

    fn commit(&mut self, advance: bool) -> Damage {
        let outcome = self.editor.commit(&mut self.model);
        self.after_edit(outcome, advance)
    }

    fn after_edit(&mut self, outcome: EditOutcome, advance: bool) -> Damage {
        match outcome {
            EditOutcome::Committed(pos) => {
                let mut damage = Damage::cells(vec![pos]).and(Damage::selection());
                if advance && pos.row + 1 < self.model.row_count() {
                    self.selection.select_cell(pos.row + 1, pos.col);
                    damage.merge(self.follow_current(true));
                }
                damage
            }
            EditOutcome::Rejected(_) | EditOutcome::Cancelled(_) => Damage::selection(),
            EditOutcome::Idle => Damage::None,
        }
    }

    /// Close the editor without writing
    pub fn cancel_edit(&mut self) -> Damage {
        let damage = self.close_editor();
        self.finish(damage)
    }

    fn close_editor(&mut self) -> Damage {
        match self.editor.cancel() {
            EditOutcome::Idle => Damage::None,
            _ => Damage::selection(),
        }
    }

    /// Pick a choice of the category drop-down; commits immediately
    pub fn choose(&mut self, index: usize) -> Damage {
        let outcome = self.editor.choose(index, &mut self.model);
        let damage = self.after_edit(outcome, false);
        self.finish(damage)
    }

    /// Drop-down entry under a canvas point
    fn choice_at(&self, x: f64, y: f64) -> Option<usize> {
        let session = self.editor.session()?;
        let EditMode::Choice { options, .. } = &session.mode else {
            return None;
        };
        let cell = self
            .layout
            .cell_rect(session.position.row, session.position.col);
        (0..options.len()).find(|&i| choice_rect(&self.layout, cell, i).contains(x, y))
    }

    // ------------------------------------------------------------------
    // Pointer input (window coordinates, headers included)
    // ------------------------------------------------------------------

    fn hit(&self, x: f64, y: f64) -> Hit {
        let (rw, hh) = (self.config.row_header_width, self.config.header_height);
        let cx = x - rw + self.viewport.scroll_x;
        let cy = y - hh + self.viewport.scroll_y;
        match (x < rw, y < hh) {
            (true, true) => Hit::Corner,
            (false, true) => Hit::ColumnHeader(cx),
            (true, false) => Hit::RowHeader(cy),
            (false, false) => Hit::Grid(cx, cy),
        }
    }

    pub fn mouse_down(&mut self, x: f64, y: f64, modifiers: ClickModifiers) -> Damage {
        let hit = self.hit(x, y);
        if let Hit::Grid(cx, cy) = hit {
            if let Some(index) = self.choice_at(cx, cy) {
                self.pointer = Pointer::None;
                return self.choose(index);
            }
        }

        // Clicking anywhere else abandons an open edit
        let mut damage = self.close_editor();
        self.pointer = Pointer::None;
        match hit {
            Hit::Corner => {
                let event = self.index_header.press();
                damage.merge(self.apply_header_event(event));
            }
            Hit::ColumnHeader(cx) => {
                self.pointer = Pointer::ColumnHeader;
                let event = self.column_header.press(cx, modifiers.shift, &self.layout);
                damage.merge(self.apply_header_event(event));
            }
            Hit::RowHeader(cy) => {
                self.pointer = Pointer::RowHeader;
                let event = self.row_header.press(cy, modifiers.shift, &self.layout);
                damage.merge(self.apply_header_event(event));
            }
            Hit::Grid(cx, cy) => {
                if let Some((row, col)) = self.layout.cell_at(cx, cy) {
                    self.pointer = Pointer::Grid;
                    let changed = if modifiers.shift {
                        self.selection.extend_range(row, col)
                    } else if modifiers.ctrl {
                        self.selection.toggle_cell(row, col)
                    } else {
                        self.selection.select_cell(row, col)
                    };
                    damage.merge(Damage::selection_if(changed));
                }
            }
        }
        self.finish(damage)
    }

    pub fn mouse_drag(&mut self, x: f64, y: f64) -> Damage {
        let damage = match self.pointer {
            Pointer::None => Damage::None,
            Pointer::Grid => self.drag_grid(x, y),
            Pointer::ColumnHeader => {
                let cx = x - self.config.row_header_width + self.viewport.scroll_x;
                let event = self.column_header.drag(cx, &self.layout);
                self.apply_header_event(event)
            }
            Pointer::RowHeader => {
                let cy = y - self.config.header_height + self.viewport.scroll_y;
                let event = self.row_header.drag(cy, &self.layout);
                self.apply_header_event(event)
            }
        };
        self.finish(damage)
    }

    /// Extend the range to the cell under the pointer, clamped to the table
    fn drag_grid(&mut self, x: f64, y: f64) -> Damage {
        let (rows, cols) = (self.model.row_count(), self.model.column_count());
        if rows == 0 || cols == 0 {
            return Damage::None;
        }
        let cx = x - self.config.row_header_width + self.viewport.scroll_x;
        let cy = y - self.config.header_height + self.viewport.scroll_y;
        let row = self.layout.row_at(cy).min(rows - 1);
        let col = self.layout.col_at(cx).min(cols - 1);
        if self.selection.current() == Some(CellPosition::new(row, col)) {
            return Damage::None;
        }
        let changed = self.selection.extend_range(row, col);
        self.follow_current(changed)
    }

    pub fn mouse_up(&mut self, x: f64, _y: f64) -> Damage {
        let damage = match self.pointer {
            Pointer::ColumnHeader => {
                let cx = x - self.config.row_header_width + self.viewport.scroll_x;
                let event = self.column_header.release(cx, &self.layout);
                // A drag that ends without a commit still has a ghost to erase
                self.apply_header_event(event)
                    .and(Damage::areas(vec![DamageArea::Headers]))
            }
            Pointer::RowHeader => {
                let event = self.row_header.release();
                self.apply_header_event(event)
            }
            Pointer::Grid | Pointer::None => Damage::None,
        };
        self.pointer = Pointer::None;
        self.finish(damage)
    }

    /// Double-click edits a cell or sorts/autofits a column
    pub fn double_click(&mut self, x: f64, y: f64) -> Damage {
        self.pointer = Pointer::None;
        match self.hit(x, y) {
            Hit::Grid(cx, cy) => match self.layout.cell_at(cx, cy) {
                Some((row, col)) => self.begin_edit_at(row, col),
                None => Damage::None,
            },
            Hit::ColumnHeader(cx) => {
                let event = self.column_header.double_click(cx, &self.layout);
                let damage = self.apply_header_event(event);
                self.finish(damage)
            }
            Hit::RowHeader(_) | Hit::Corner => Damage::None,
        }
    }

    /// Pointer shape for a hover position
    pub fn hover(&self, x: f64, y: f64) -> CursorHint {
        match self.hit(x, y) {
            Hit::ColumnHeader(cx) => self.column_header.hover(cx, &self.layout),
            _ => CursorHint::Default,
        }
    }

    fn apply_header_event(&mut self, event: HeaderEvent) -> Damage {
        match event {
            HeaderEvent::None => Damage::None,
            HeaderEvent::SelectColumn(col) => {
                Damage::selection_if(self.selection.select_column(col))
            }
            HeaderEvent::ExtendColumns(col) => {
                Damage::selection_if(self.selection.extend_columns(col))
            }
            HeaderEvent::SelectRow(row) => Damage::selection_if(self.selection.select_row(row)),
            HeaderEvent::ExtendRows(row) => {
                let changed = self.selection.extend_rows(row);
                self.follow_current(changed)
            }
            HeaderEvent::SelectAll => Damage::selection_if(self.selection.select_all()),
            HeaderEvent::Resizing { .. } | HeaderEvent::Reordering { .. } => {
                Damage::areas(vec![DamageArea::Headers])
            }
            HeaderEvent::ResizeColumn { col, width } => {
                let resized = self.layout.resize(col, width).is_some();
                if resized {
                    self.apply_geometry();
                }
                Damage::full_if(resized)
            }
            HeaderEvent::MoveColumn { from, to } => match self.move_column_inner(from, to) {
                Ok(damage) => damage,
                Err(e) => {
                    tracing::warn!("Column move refused: {}", e);
                    Damage::None
                }
            },
            HeaderEvent::SortColumn { col, ascending } => self.sort_inner(&[col], ascending),
            HeaderEvent::AutofitColumn(col) => self.autofit(&[col]),
        }
    }
}
