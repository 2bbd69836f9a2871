//! Viewport renderer
//!
//! Builds the retained scenes for the grid canvas and the three header
//! strips from the model, layout and selection. Only the visible window of
//! the table is ever walked. A full redraw rebuilds every grid layer; a
//! selection redraw rebuilds the selection layers, the edit overlay and the
//! headers; a cell redraw replaces a single cell's text.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use super::editor::{CellEditor, EditMode};
use super::format::{display_text, estimate_width, truncate_to_width};
use super::header::{ColumnHeader, HeaderContext, IndexHeader, RowHeader};
use super::layout::{CellRect, ColumnLayout};
use super::scene::{Layer, Scene, SceneKey, Shape};
use super::selection::SelectionState;
use super::surface::{ClipRect, Surface, TextAnchor};
use super::viewport::ViewportState;
use crate::config::{Align, EngineConfig};
use crate::data::{CellValue, TabularModel};
use crate::theme::{Color, Theme};

/// Boolean mask aligned to the dataset; `true` cells get highlighted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl HighlightMask {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Build a mask by evaluating `f` for every cell
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                mask.cells[row * cols + col] = f(row, col);
            }
        }
        mask
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = on;
        }
    }

    /// False outside the mask
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&on| on).count()
    }
}

/// User-applied coloring drawn beneath cell text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decorations {
    /// Column fills, keyed by column name so they follow reorders
    pub column_colors: HashMap<String, Color>,
    pub row_colors: HashMap<usize, Color>,
    pub mask: Option<HighlightMask>,
}

impl Decorations {
    pub fn clear(&mut self) {
        self.column_colors.clear();
        self.row_colors.clear();
        self.mask = None;
    }
}

/// Inputs of one redraw pass
pub struct RenderContext<'a> {
    pub model: &'a dyn TabularModel,
    pub selection: &'a SelectionState,
    pub decorations: &'a Decorations,
    pub editor: &'a CellEditor,
    pub config: &'a EngineConfig,
    pub theme: &'a Theme,
    pub column_header: &'a ColumnHeader,
    pub row_header: &'a RowHeader,
    pub index_header: &'a IndexHeader,
}

/// Counters for benchmarks and debugging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub full_redraws: u64,
    pub selection_redraws: u64,
    pub cell_redraws: u64,
    /// Cell texts produced by the last full redraw
    pub last_cells_drawn: usize,
}

/// Retained scenes for the grid and its headers
#[derive(Debug, Clone, Default)]
pub struct ViewportRenderer {
    grid: Scene,
    column_header: Scene,
    row_header: Scene,
    index_header: Scene,
    stats: RenderStats,
}

impl ViewportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> &Scene {
        &self.grid
    }

    pub fn column_header(&self) -> &Scene {
        &self.column_header
    }

    pub fn row_header(&self) -> &Scene {
        &self.row_header
    }

    pub fn index_header(&self) -> &Scene {
        &self.index_header
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Rebuild the scenes for the current viewport.
    ///
    /// With `full` unset only the selection layers, the edit overlay and the
    /// headers are rebuilt; cell text and fills are kept from the last full
    /// pass.
    pub fn redraw(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &mut ColumnLayout,
        viewport: &mut ViewportState,
        full: bool,
    ) {
        let rows = ctx.model.row_count();
        let cols = ctx.model.column_count();
        layout.recompute(ctx.model);

        if rows == 0 || cols == 0 {
            // Degenerate table: nothing on the canvas, headers still shown
            self.grid.clear();
            viewport.clear_ranges();
            self.draw_headers(ctx, layout, viewport);
            self.stats.full_redraws += 1;
            self.stats.last_cells_drawn = 0;
            return;
        }

        viewport.update(layout);
        let visible_rows = viewport.visible_rows.clone();
        let visible_cols = viewport.visible_cols.clone();

        if full {
            self.grid.clear();
            self.draw_background(ctx, layout, &visible_rows, &visible_cols);
            self.draw_grid_lines(ctx, layout, &visible_rows, &visible_cols);
            self.draw_fills(ctx, layout, &visible_rows, &visible_cols);
            self.draw_mask(ctx, layout, &visible_rows, &visible_cols);
            self.stats.last_cells_drawn =
                self.draw_cell_text(ctx, layout, &visible_rows, &visible_cols);
            self.stats.full_redraws += 1;
            tracing::trace!(
                "Full redraw: rows {:?}, cols {:?}, {} cells",
                visible_rows,
                visible_cols,
                self.stats.last_cells_drawn
            );
        } else {
            self.stats.selection_redraws += 1;
        }

        self.draw_selection(ctx, layout, &visible_rows, &visible_cols);
        self.draw_edit_overlay(ctx, layout);
        self.draw_headers(ctx, layout, viewport);
    }

    /// Replace the text of one cell without touching the rest of the scene.
    ///
    /// Cells outside the visible window are skipped. Returns true when the
    /// cell was redrawn.
    pub fn redraw_cell(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        viewport: &ViewportState,
        row: usize,
        col: usize,
    ) -> bool {
        if !viewport.is_row_visible(row) || !viewport.is_col_visible(col) {
            return false;
        }
        let value = ctx.model.get_value(row, col);
        let shapes = cell_text_shape(ctx, layout, row, col, &value)
            .into_iter()
            .collect();
        self.grid.set(SceneKey::cell(Layer::CellText, row, col), shapes);
        self.stats.cell_redraws += 1;
        true
    }

    /// Replay all scenes onto a surface.
    ///
    /// Each scene is clipped to its strip and shifted by the scroll offsets.
    /// A surface that is no longer valid is skipped.
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        layout: &ColumnLayout,
        viewport: &ViewportState,
        config: &EngineConfig,
    ) {
        if !surface.is_valid() {
            tracing::trace!("Skipping paint on invalid surface");
            return;
        }
        let (rw, hh) = (config.row_header_width, config.header_height);
        surface.set_scroll_region(layout.total_width(), layout.total_height());

        surface.set_clip(Some(ClipRect {
            x: rw,
            y: hh,
            width: viewport.width,
            height: viewport.height,
        }));
        self.grid
            .paint(surface, rw - viewport.scroll_x, hh - viewport.scroll_y);

        surface.set_clip(Some(ClipRect {
            x: rw,
            y: 0.0,
            width: viewport.width,
            height: hh,
        }));
        self.column_header.paint(surface, rw - viewport.scroll_x, 0.0);

        surface.set_clip(Some(ClipRect {
            x: 0.0,
            y: hh,
            width: rw,
            height: viewport.height,
        }));
        self.row_header.paint(surface, 0.0, hh - viewport.scroll_y);

        surface.set_clip(Some(ClipRect {
            x: 0.0,
            y: 0.0,
            width: rw,
            height: hh,
        }));
        self.index_header.paint(surface, 0.0, 0.0);
        surface.set_clip(None);
    }

    fn draw_background(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        rows: &Range<usize>,
        cols: &Range<usize>,
    ) {
        let Some(area) = span_rect(layout, rows, cols) else {
            return;
        };
        self.grid.push(
            SceneKey::whole(Layer::Background),
            Shape::fill(
                area.x1,
                area.y1,
                area.width(),
                area.height(),
                ctx.theme.grid.background,
            ),
        );
    }

    /// Boundary lines only; cells are never filled individually
    fn draw_grid_lines(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        rows: &Range<usize>,
        cols: &Range<usize>,
    ) {
        let Some(area) = span_rect(layout, rows, cols) else {
            return;
        };
        let color = ctx.theme.grid.grid_line;
        let positions = layout.column_positions();

        for col in cols.start..=cols.end {
            let x = positions[col];
            self.grid.push(
                SceneKey::col(Layer::GridLine, col),
                Shape::Line {
                    x1: x,
                    y1: area.y1,
                    x2: x,
                    y2: area.y2,
                    color,
                },
            );
        }
        for row in rows.start..=rows.end {
            let y = layout.cell_rect(row, 0).y1;
            self.grid.push(
                SceneKey::row(Layer::GridLine, row),
                Shape::Line {
                    x1: area.x1,
                    y1: y,
                    x2: area.x2,
                    y2: y,
                    color,
                },
            );
        }
    }

    fn draw_fills(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        rows: &Range<usize>,
        cols: &Range<usize>,
    ) {
        let Some(area) = span_rect(layout, rows, cols) else {
            return;
        };
        let decorations = ctx.decorations;

        if !decorations.column_colors.is_empty() {
            for col in cols.clone() {
                let Some(color) = ctx
                    .model
                    .column_name(col)
                    .and_then(|name| decorations.column_colors.get(name))
                else {
                    continue;
                };
                let rect = layout.cell_rect(rows.start, col);
                self.grid.push(
                    SceneKey::col(Layer::ColumnFill, col),
                    Shape::fill(rect.x1, area.y1, rect.width(), area.height(), *color),
                );
            }
        }

        for row in rows.clone() {
            if let Some(color) = decorations.row_colors.get(&row) {
                let rect = layout.cell_rect(row, cols.start);
                self.grid.push(
                    SceneKey::row(Layer::RowFill, row),
                    Shape::fill(area.x1, rect.y1, area.width(), rect.height(), *color),
                );
            }
        }
    }

    fn draw_mask(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        rows: &Range<usize>,
        cols: &Range<usize>,
    ) {
        let Some(mask) = &ctx.decorations.mask else {
            return;
        };
        let color = ctx.theme.grid.mask_highlight;
        for row in rows.clone() {
            for col in cols.clone() {
                if mask.get(row, col) {
                    let rect = layout.cell_rect(row, col);
                    self.grid.push(
                        SceneKey::cell(Layer::MaskHighlight, row, col),
                        Shape::fill(rect.x1, rect.y1, rect.width(), rect.height(), color),
                    );
                }
            }
        }
    }

    /// One batch fetch per visible column; returns the number of texts drawn
    fn draw_cell_text(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        rows: &Range<usize>,
        cols: &Range<usize>,
    ) -> usize {
        let mut drawn = 0;
        for col in cols.clone() {
            if layout.width_of(col) < ctx.config.min_text_width {
                continue;
            }
            let values = ctx.model.column_slice(col, rows.clone());
            for (row, value) in rows.clone().zip(values.iter()) {
                if let Some(shape) = cell_text_shape(ctx, layout, row, col, value) {
                    self.grid.push(SceneKey::cell(Layer::CellText, row, col), shape);
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn draw_selection(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        rows: &Range<usize>,
        cols: &Range<usize>,
    ) {
        for layer in Layer::SELECTION {
            self.grid.clear_layer(layer);
        }
        let selection = ctx.selection;
        let Some(current) = selection.current() else {
            return;
        };
        let Some(area) = span_rect(layout, rows, cols) else {
            return;
        };
        let colors = &ctx.theme.grid;

        // Current row band
        if rows.contains(&current.row) {
            let rect = layout.cell_rect(current.row, cols.start);
            self.grid.push(
                SceneKey::row(Layer::RowSelection, current.row),
                Shape::fill(
                    area.x1,
                    rect.y1,
                    area.width(),
                    rect.height(),
                    colors.row_selection,
                ),
            );
        }

        let selected_rows: HashSet<usize> = selection.multi_rows().iter().copied().collect();
        let selected_cols: HashSet<usize> = selection.multi_cols().iter().copied().collect();

        if selection.all_rows() {
            // Whole columns: one band per visible selected column
            for col in cols.clone().filter(|c| selected_cols.contains(c)) {
                let rect = layout.cell_rect(rows.start, col);
                self.grid.push(
                    SceneKey::col(Layer::ColumnSelection, col),
                    Shape::fill(
                        rect.x1,
                        area.y1,
                        rect.width(),
                        area.height(),
                        colors.column_selection,
                    ),
                );
            }
        } else if selection.cell_count() > 1 {
            for row in rows.clone().filter(|r| selected_rows.contains(r)) {
                for col in cols.clone().filter(|c| selected_cols.contains(c)) {
                    let rect = layout.cell_rect(row, col);
                    self.grid.push(
                        SceneKey::cell(Layer::MultiSelection, row, col),
                        Shape::fill(
                            rect.x1,
                            rect.y1,
                            rect.width(),
                            rect.height(),
                            colors.multi_selection,
                        ),
                    );
                }
            }
        }

        if rows.contains(&current.row) && cols.contains(&current.col) {
            let rect = layout.cell_rect(current.row, current.col);
            self.grid.push(
                SceneKey::whole(Layer::CurrentCell),
                Shape::outline(
                    rect.x1 + 1.0,
                    rect.y1 + 1.0,
                    rect.width() - 2.0,
                    rect.height() - 2.0,
                    colors.current_cell,
                    2.0,
                ),
            );
        }
    }

    fn draw_edit_overlay(&mut self, ctx: &RenderContext<'_>, layout: &ColumnLayout) {
        self.grid.clear_layer(Layer::EditOverlay);
        let Some(session) = ctx.editor.session() else {
            return;
        };
        let (row, col) = (session.position.row, session.position.col);
        let rect = layout.cell_rect(row, col);
        let colors = &ctx.theme.grid;
        let config = ctx.config;
        let char_width = config.char_width();
        let key = SceneKey::whole(Layer::EditOverlay);
        let mid_y = (rect.y1 + rect.y2) / 2.0;

        let mut shapes = vec![Shape::Rect {
            x: rect.x1,
            y: rect.y1,
            width: rect.width(),
            height: rect.height(),
            fill: Some(colors.edit_background),
            outline: Some(colors.current_cell),
            outline_width: 2.0,
        }];

        match &session.mode {
            EditMode::Text(buffer) => {
                let text = buffer.text();
                let available = rect.width() - 2.0 * config.cell_padding;
                shapes.push(Shape::Text {
                    x: rect.x1 + config.cell_padding,
                    y: mid_y,
                    text: truncate_to_width(&text, available, char_width).to_string(),
                    color: colors.edit_foreground,
                    anchor: TextAnchor::West,
                });
                let before: String = text.chars().take(buffer.cursor()).collect();
                let cursor_x = (rect.x1 + config.cell_padding + estimate_width(&before, char_width))
                    .min(rect.x2 - 1.0);
                shapes.push(Shape::Line {
                    x1: cursor_x,
                    y1: rect.y1 + 3.0,
                    x2: cursor_x,
                    y2: rect.y2 - 3.0,
                    color: colors.edit_cursor,
                });
            }
            EditMode::Choice {
                options,
                highlighted,
            } => {
                shapes.push(Shape::Text {
                    x: rect.x1 + config.cell_padding,
                    y: mid_y,
                    text: session.original.clone(),
                    color: colors.edit_foreground,
                    anchor: TextAnchor::West,
                });
                for (i, option) in options.iter().enumerate() {
                    let option_rect = choice_rect(layout, rect, i);
                    let fill = if i == *highlighted {
                        colors.multi_selection
                    } else {
                        colors.edit_background
                    };
                    shapes.push(Shape::Rect {
                        x: option_rect.x1,
                        y: option_rect.y1,
                        width: option_rect.width(),
                        height: option_rect.height(),
                        fill: Some(fill),
                        outline: Some(colors.grid_line),
                        outline_width: 1.0,
                    });
                    shapes.push(Shape::Text {
                        x: option_rect.x1 + config.cell_padding,
                        y: (option_rect.y1 + option_rect.y2) / 2.0,
                        text: option.clone(),
                        color: colors.edit_foreground,
                        anchor: TextAnchor::West,
                    });
                }
            }
        }
        self.grid.set(key, shapes);
    }

    fn draw_headers(
        &mut self,
        ctx: &RenderContext<'_>,
        layout: &ColumnLayout,
        viewport: &ViewportState,
    ) {
        let header_ctx = HeaderContext {
            model: ctx.model,
            layout,
            selection: ctx.selection,
            theme: &ctx.theme.header,
            config: ctx.config,
        };
        ctx.column_header.render(
            &mut self.column_header,
            &header_ctx,
            viewport.header_cols(layout),
        );
        ctx.row_header.render(
            &mut self.row_header,
            &header_ctx,
            viewport.visible_rows.clone(),
        );
        ctx.index_header
            .render(&mut self.index_header, &header_ctx);
    }
}

/// Rectangle of choice `index` in the drop-down below an edited cell
pub fn choice_rect(layout: &ColumnLayout, cell: CellRect, index: usize) -> CellRect {
    let height = layout.row_height();
    let y1 = cell.y2 + index as f64 * height;
    CellRect {
        x1: cell.x1,
        y1,
        x2: cell.x1 + cell.width().max(layout.default_width()),
        y2: y1 + height,
    }
}

/// Canvas rectangle spanned by the visible rows and columns
fn span_rect(layout: &ColumnLayout, rows: &Range<usize>, cols: &Range<usize>) -> Option<CellRect> {
    if rows.is_empty() || cols.is_empty() {
        return None;
    }
    let top_left = layout.cell_rect(rows.start, cols.start);
    let bottom_right = layout.cell_rect(rows.end - 1, cols.end - 1);
    Some(CellRect {
        x1: top_left.x1,
        y1: top_left.y1,
        x2: bottom_right.x2,
        y2: bottom_right.y2,
    })
}

/// Formatted, truncated and aligned text of one cell
fn cell_text_shape(
    ctx: &RenderContext<'_>,
    layout: &ColumnLayout,
    row: usize,
    col: usize,
    value: &CellValue,
) -> Option<Shape> {
    let config = ctx.config;
    let rect = layout.cell_rect(row, col);
    if rect.width() < config.min_text_width {
        return None;
    }
    let text = display_text(value, config.float_precision);
    if text.is_empty() {
        return None;
    }
    let available = rect.width() - 2.0 * config.cell_padding;
    let shown = truncate_to_width(&text, available, config.char_width());
    if shown.is_empty() {
        return None;
    }

    let numeric = value.as_f64().is_some();
    let align = match config.align {
        Align::Auto if numeric => Align::Right,
        Align::Auto => Align::Left,
        other => other,
    };
    let (x, anchor) = match align {
        Align::Right => (rect.x2 - config.cell_padding, TextAnchor::East),
        Align::Center => ((rect.x1 + rect.x2) / 2.0, TextAnchor::Center),
        _ => (rect.x1 + config.cell_padding, TextAnchor::West),
    };
    let colors = &ctx.theme.grid;

    Some(Shape::Text {
        x,
        y: (rect.y1 + rect.y2) / 2.0,
        text: shown.to_string(),
        color: if numeric {
            colors.number_foreground
        } else {
            colors.foreground
        },
        anchor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, ColumnType, DataFrame};
    use crate::grid::surface::{DrawOp, RecordingSurface};

    struct Fixture {
        model: DataFrame,
        selection: SelectionState,
        decorations: Decorations,
        editor: CellEditor,
        config: EngineConfig,
        theme: Theme,
        column_header: ColumnHeader,
        row_header: RowHeader,
        index_header: IndexHeader,
        layout: ColumnLayout,
        viewport: ViewportState,
        renderer: ViewportRenderer,
    }

    impl Fixture {
        fn new(model: DataFrame) -> Self {
            let config = EngineConfig::default();
            let selection = SelectionState::new(model.row_count(), model.column_count());
            Self {
                layout: ColumnLayout::new(&config),
                editor: CellEditor::new(&config),
                model,
                selection,
                decorations: Decorations::default(),
                config,
                theme: Theme::default(),
                column_header: ColumnHeader::new(),
                row_header: RowHeader::new(),
                index_header: IndexHeader,
                viewport: ViewportState::new(400.0, 220.0),
                renderer: ViewportRenderer::new(),
            }
        }

        fn redraw(&mut self, full: bool) {
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
    }

    fn numbers() -> DataFrame {
        DataFrame::from_columns(vec![
            Column::from_values(
                "small",
                ColumnType::Float,
                vec![0.333333.into(), CellValue::Float(f64::NAN)],
            ),
            Column::from_values("big", ColumnType::Float, vec![12.3456.into(), 2.0.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_table_draws_headers_only() {
        let mut fx = Fixture::new(DataFrame::empty(0, 5));
        fx.redraw(true);

        assert_eq!(fx.renderer.grid().count(Layer::CellText), 0);
        assert!(fx.viewport.visible_rows.is_empty());
        assert_eq!(
            fx.renderer.column_header().texts(Layer::CellText),
            vec!["A", "B", "C", "D", "E"]
        );
    }

    #[test]
    fn test_deleting_all_rows_then_redraw() {
        let mut fx = Fixture::new(DataFrame::empty(20, 3));
        fx.redraw(true);
        assert!(!fx.viewport.visible_rows.is_empty());

        let all: Vec<usize> = (0..20).collect();
        fx.model.delete_rows(&all);
        fx.selection.clamp(0, 3);
        fx.redraw(true);
        assert!(fx.viewport.visible_rows.is_empty());
        assert!(fx.renderer.grid().is_empty());
    }

    #[test]
    fn test_cell_text_is_formatted() {
        let mut fx = Fixture::new(numbers());
        fx.config.float_precision = 2;
        fx.redraw(true);

        let texts = fx.renderer.grid().texts(Layer::CellText);
        assert_eq!(texts, vec!["0.33", "12.35", "2.00"]);
        assert_eq!(fx.renderer.stats().last_cells_drawn, 3);
    }

    #[test]
    fn test_narrow_column_draws_no_text() {
        let mut fx = Fixture::new(numbers());
        fx.layout.set_width("small", 30.0);
        fx.config.min_text_width = 40.0;
        fx.redraw(true);
        assert_eq!(fx.renderer.grid().texts(Layer::CellText), vec!["12.346", "2.000"]);
    }

    #[test]
    fn test_only_visible_window_is_drawn() {
        let mut fx = Fixture::new(DataFrame::empty(1000, 50));
        for col in 0..50 {
            fx.model.set_value(CellValue::from("x"), 0, col).unwrap();
        }
        fx.redraw(true);
        // 400px wide canvas with 100px columns covers 5 columns
        assert_eq!(fx.viewport.visible_cols, 0..5);
        assert_eq!(fx.renderer.grid().count(Layer::CellText), 5);
        assert!(fx.viewport.visible_rows.end <= 12);
    }

    #[test]
    fn test_selection_redraw_keeps_text() {
        let mut fx = Fixture::new(numbers());
        fx.selection.select_cell(0, 0);
        fx.redraw(true);
        assert_eq!(fx.renderer.grid().count(Layer::CurrentCell), 1);

        fx.selection.extend_range(1, 1);
        fx.redraw(false);
        assert_eq!(fx.renderer.grid().count(Layer::MultiSelection), 4);
        assert_eq!(fx.renderer.grid().count(Layer::CellText), 3);
        assert_eq!(fx.renderer.stats().selection_redraws, 1);
    }

    #[test]
    fn test_redraw_cell_replaces_one_text() {
        let mut fx = Fixture::new(numbers());
        fx.config.float_precision = 2;
        fx.redraw(true);

        fx.model.set_value(CellValue::Float(5.5), 1, 1).unwrap();
        let ctx = RenderContext {
            model: &fx.model,
            selection: &fx.selection,
            decorations: &fx.decorations,
            editor: &fx.editor,
            config: &fx.config,
            theme: &fx.theme,
            column_header: &fx.column_header,
            row_header: &fx.row_header,
            index_header: &fx.index_header,
        };
        assert!(fx
            .renderer
            .redraw_cell(&ctx, &fx.layout, &fx.viewport, 1, 1));
        assert!(!fx
            .renderer
            .redraw_cell(&ctx, &fx.layout, &fx.viewport, 500, 1));
        assert_eq!(
            fx.renderer.grid().texts(Layer::CellText),
            vec!["0.33", "12.35", "5.50"]
        );
    }

    #[test]
    fn test_mask_and_column_color() {
        let mut fx = Fixture::new(numbers());
        fx.decorations
            .column_colors
            .insert("big".to_string(), Color::rgb(1, 2, 3));
        fx.decorations.mask = Some(HighlightMask::from_fn(2, 2, |r, c| r == c));
        fx.redraw(true);
        assert_eq!(fx.renderer.grid().count(Layer::ColumnFill), 1);
        assert_eq!(fx.renderer.grid().count(Layer::MaskHighlight), 2);
    }

    #[test]
    fn test_paint_skips_invalid_surface() {
        let mut fx = Fixture::new(numbers());
        fx.redraw(true);

        let mut surface = RecordingSurface::new();
        surface.valid = false;
        fx.renderer
            .paint(&mut surface, &fx.layout, &fx.viewport, &fx.config);
        assert!(surface.ops.is_empty());

        let mut surface = RecordingSurface::new();
        fx.renderer
            .paint(&mut surface, &fx.layout, &fx.viewport, &fx.config);
        assert!(matches!(surface.ops.first(), Some(DrawOp::ScrollRegion(..))));
        assert!(surface.texts().contains(&"big"));
        assert_eq!(surface.ops.last(), Some(&DrawOp::Clip(None)));
    }
}
