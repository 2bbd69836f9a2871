//! Column, row and index header strips
//!
//! Headers keep only their own drag state. Pointer handlers translate
//! presses into [`HeaderEvent`]s; the table applies them to the selection,
//! layout and model. Rendering fills a per-header [`Scene`] in header-local
//! coordinates: the column header scrolls horizontally with the grid, the row
//! header vertically.

use std::collections::HashSet;
use std::ops::Range;

use super::format::{estimate_width, truncate_to_width};
use super::layout::ColumnLayout;
use super::scene::{Layer, Scene, SceneKey, Shape};
use super::selection::SelectionState;
use super::surface::TextAnchor;
use crate::config::EngineConfig;
use crate::data::TabularModel;
use crate::theme::HeaderTheme;

/// Pointer distance from a column boundary that starts a resize
pub const RESIZE_TOLERANCE: f64 = 4.0;

/// Horizontal travel before a pressed column header starts a reorder drag
pub const DRAG_THRESHOLD: f64 = 5.0;

/// What a header interaction asks the table to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderEvent {
    None,
    SelectColumn(usize),
    ExtendColumns(usize),
    /// Live resize feedback; nothing committed yet
    Resizing { col: usize, width: f64 },
    ResizeColumn { col: usize, width: f64 },
    /// Live reorder feedback; nothing committed yet
    Reordering { from: usize, to: usize },
    MoveColumn { from: usize, to: usize },
    SortColumn { col: usize, ascending: bool },
    AutofitColumn(usize),
    SelectRow(usize),
    ExtendRows(usize),
    SelectAll,
}

/// Everything a header needs to draw itself
pub struct HeaderContext<'a> {
    pub model: &'a dyn TabularModel,
    pub layout: &'a ColumnLayout,
    pub selection: &'a SelectionState,
    pub theme: &'a HeaderTheme,
    pub config: &'a EngineConfig,
}

/// Pointer shape the viewer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    ResizeColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum ColumnDrag {
    #[default]
    Idle,
    Pressed {
        col: usize,
        x: f64,
    },
    Reordering {
        from: usize,
        x: f64,
    },
    Resizing {
        col: usize,
        origin: f64,
        start_width: f64,
        width: f64,
    },
}

/// Column header strip: labels, selection, resize, reorder and sort
#[derive(Debug, Clone, Default)]
pub struct ColumnHeader {
    drag: ColumnDrag,
    /// Last sorted column and direction
    sort: Option<(usize, bool)>,
}

impl ColumnHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, ColumnDrag::Idle)
    }

    pub fn sort_state(&self) -> Option<(usize, bool)> {
        self.sort
    }

    /// Record a sort applied from outside the header
    pub fn set_sort_state(&mut self, sort: Option<(usize, bool)>) {
        self.sort = sort;
    }

    /// Forget sort direction and any drag (dataset replaced)
    pub fn reset(&mut self) {
        self.drag = ColumnDrag::Idle;
        self.sort = None;
    }

    /// Pointer press at canvas `x` within the strip
    pub fn press(&mut self, x: f64, shift: bool, layout: &ColumnLayout) -> HeaderEvent {
        if let Some(col) = layout.boundary_near(x, RESIZE_TOLERANCE) {
            let start_width = layout.width_of(col);
            self.drag = ColumnDrag::Resizing {
                col,
                origin: x,
                start_width,
                width: start_width,
            };
            tracing::debug!("Resize of column {} started at width {}", col, start_width);
            return HeaderEvent::Resizing {
                col,
                width: start_width,
            };
        }

        let col = layout.col_at(x);
        if col >= layout.column_count() {
            self.drag = ColumnDrag::Idle;
            return HeaderEvent::None;
        }
        self.drag = ColumnDrag::Pressed { col, x };
        if shift {
            HeaderEvent::ExtendColumns(col)
        } else {
            HeaderEvent::SelectColumn(col)
        }
    }

    pub fn drag(&mut self, x: f64, layout: &ColumnLayout) -> HeaderEvent {
        match self.drag {
            ColumnDrag::Idle => HeaderEvent::None,
            ColumnDrag::Resizing {
                col,
                origin,
                start_width,
                ..
            } => {
                let width =
                    (start_width + x - origin).clamp(layout.min_width(), layout.max_width());
                self.drag = ColumnDrag::Resizing {
                    col,
                    origin,
                    start_width,
                    width,
                };
                HeaderEvent::Resizing { col, width }
            }
            ColumnDrag::Pressed { col, x: start } => {
                if (x - start).abs() <= DRAG_THRESHOLD {
                    return HeaderEvent::None;
                }
                self.drag = ColumnDrag::Reordering { from: col, x };
                HeaderEvent::Reordering {
                    from: col,
                    to: drop_target(x, layout),
                }
            }
            ColumnDrag::Reordering { from, .. } => {
                self.drag = ColumnDrag::Reordering { from, x };
                HeaderEvent::Reordering {
                    from,
                    to: drop_target(x, layout),
                }
            }
        }
    }

    /// Pointer release; commits a pending resize or reorder
    pub fn release(&mut self, x: f64, layout: &ColumnLayout) -> HeaderEvent {
        let event = match std::mem::take(&mut self.drag) {
            ColumnDrag::Resizing { col, width, .. } => HeaderEvent::ResizeColumn { col, width },
            ColumnDrag::Reordering { from, .. } => {
                let to = drop_target(x, layout);
                if to == from {
                    HeaderEvent::None
                } else {
                    HeaderEvent::MoveColumn { from, to }
                }
            }
            ColumnDrag::Pressed { .. } | ColumnDrag::Idle => HeaderEvent::None,
        };
        if event != HeaderEvent::None {
            tracing::debug!("Column header release: {:?}", event);
        }
        event
    }

    /// Double-click: autofit on a boundary, otherwise toggle sort
    pub fn double_click(&mut self, x: f64, layout: &ColumnLayout) -> HeaderEvent {
        self.drag = ColumnDrag::Idle;
        if let Some(col) = layout.boundary_near(x, RESIZE_TOLERANCE) {
            return HeaderEvent::AutofitColumn(col);
        }
        let col = layout.col_at(x);
        if col >= layout.column_count() {
            return HeaderEvent::None;
        }
        let ascending = !matches!(self.sort, Some((c, true)) if c == col);
        self.sort = Some((col, ascending));
        HeaderEvent::SortColumn { col, ascending }
    }

    pub fn hover(&self, x: f64, layout: &ColumnLayout) -> CursorHint {
        if matches!(self.drag, ColumnDrag::Resizing { .. })
            || layout.boundary_near(x, RESIZE_TOLERANCE).is_some()
        {
            CursorHint::ResizeColumn
        } else {
            CursorHint::Default
        }
    }

    /// Rebuild the strip for the visible columns
    pub fn render(&self, scene: &mut Scene, ctx: &HeaderContext<'_>, cols: Range<usize>) {
        let HeaderContext {
            model,
            layout,
            selection,
            theme,
            config,
        } = *ctx;
        scene.clear();
        let height = config.header_height;
        let char_width = config.char_width();
        let selected: HashSet<usize> = selection.multi_cols().iter().copied().collect();

        scene.push(
            SceneKey::whole(Layer::Background),
            Shape::fill(0.0, 0.0, layout.total_width(), height, theme.background),
        );
        scene.push(
            SceneKey::whole(Layer::GridLine),
            Shape::Line {
                x1: 0.0,
                y1: height - 1.0,
                x2: layout.total_width(),
                y2: height - 1.0,
                color: theme.border,
            },
        );

        for col in cols {
            let rect = layout.cell_rect(0, col);
            let is_selected = selected.contains(&col);
            if is_selected {
                scene.push(
                    SceneKey::col(Layer::ColumnSelection, col),
                    Shape::fill(rect.x1, 0.0, rect.width(), height, theme.selected_background),
                );
            }
            scene.push(
                SceneKey::col(Layer::GridLine, col),
                Shape::Line {
                    x1: rect.x2,
                    y1: 0.0,
                    x2: rect.x2,
                    y2: height,
                    color: theme.border,
                },
            );

            let name = model.column_name(col).unwrap_or_default();
            let label = match self.sort {
                Some((c, true)) if c == col => format!("{} ▲", name),
                Some((c, false)) if c == col => format!("{} ▼", name),
                _ => name.to_string(),
            };
            let available = rect.width() - 2.0 * config.cell_padding;
            let fits = estimate_width(&label, char_width) <= available;
            let text = truncate_to_width(&label, available, char_width);
            if text.is_empty() {
                continue;
            }
            // Labels that fit are centered, clipped ones start at the left edge
            let (x, anchor) = if fits {
                ((rect.x1 + rect.x2) / 2.0, TextAnchor::Center)
            } else {
                (rect.x1 + config.cell_padding, TextAnchor::West)
            };
            scene.push(
                SceneKey::col(Layer::CellText, col),
                Shape::Text {
                    x,
                    y: height / 2.0,
                    text: text.to_string(),
                    color: if is_selected {
                        theme.selected_foreground
                    } else {
                        theme.foreground
                    },
                    anchor,
                },
            );
        }

        match self.drag {
            ColumnDrag::Reordering { from, x } => {
                let width = layout.width_of(from);
                scene.push(
                    SceneKey::whole(Layer::EditOverlay),
                    Shape::fill(x - width / 2.0, 0.0, width, height, theme.drag_ghost),
                );
                let to = drop_target(x, layout);
                let marker = layout.cell_rect(0, to);
                let marker_x = if to > from { marker.x2 } else { marker.x1 };
                scene.push(
                    SceneKey::whole(Layer::EditOverlay),
                    Shape::Line {
                        x1: marker_x,
                        y1: 0.0,
                        x2: marker_x,
                        y2: height,
                        color: theme.resize_line,
                    },
                );
            }
            ColumnDrag::Resizing { col, width, .. } => {
                let x = layout.cell_rect(0, col).x1 + width;
                scene.push(
                    SceneKey::whole(Layer::EditOverlay),
                    Shape::Line {
                        x1: x,
                        y1: 0.0,
                        x2: x,
                        y2: height,
                        color: theme.resize_line,
                    },
                );
            }
            ColumnDrag::Pressed { .. } | ColumnDrag::Idle => {}
        }
    }
}

/// Column a dragged header would land on
fn drop_target(x: f64, layout: &ColumnLayout) -> usize {
    layout
        .col_at(x)
        .min(layout.column_count().saturating_sub(1))
}

/// Row header strip: row labels plus click/drag row selection
#[derive(Debug, Clone, Default)]
pub struct RowHeader {
    pressed: bool,
}

impl RowHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, y: f64, shift: bool, layout: &ColumnLayout) -> HeaderEvent {
        let row = layout.row_at(y);
        if row >= layout.row_count() {
            self.pressed = false;
            return HeaderEvent::None;
        }
        self.pressed = true;
        if shift {
            HeaderEvent::ExtendRows(row)
        } else {
            HeaderEvent::SelectRow(row)
        }
    }

    /// Drag extends the row range, clamped to the last row
    pub fn drag(&mut self, y: f64, layout: &ColumnLayout) -> HeaderEvent {
        if !self.pressed || layout.row_count() == 0 {
            return HeaderEvent::None;
        }
        HeaderEvent::ExtendRows(layout.row_at(y).min(layout.row_count() - 1))
    }

    pub fn release(&mut self) -> HeaderEvent {
        self.pressed = false;
        HeaderEvent::None
    }

    /// Rebuild the strip for the visible rows.
    ///
    /// Rows are labelled 1, 2, 3, ... or by index label when `show_index`
    /// is set.
    pub fn render(&self, scene: &mut Scene, ctx: &HeaderContext<'_>, rows: Range<usize>) {
        let HeaderContext {
            model,
            layout,
            selection,
            theme,
            config,
        } = *ctx;
        scene.clear();
        let width = config.row_header_width;
        let char_width = config.char_width();
        let selected: HashSet<usize> = selection.multi_rows().iter().copied().collect();

        scene.push(
            SceneKey::whole(Layer::Background),
            Shape::fill(0.0, 0.0, width, layout.total_height(), theme.background),
        );
        scene.push(
            SceneKey::whole(Layer::GridLine),
            Shape::Line {
                x1: width - 1.0,
                y1: 0.0,
                x2: width - 1.0,
                y2: layout.total_height(),
                color: theme.border,
            },
        );

        for row in rows {
            let rect = layout.cell_rect(row, 0);
            let is_selected = selected.contains(&row);
            if is_selected {
                scene.push(
                    SceneKey::row(Layer::RowSelection, row),
                    Shape::fill(0.0, rect.y1, width, rect.height(), theme.selected_background),
                );
            }
            scene.push(
                SceneKey::row(Layer::GridLine, row),
                Shape::Line {
                    x1: 0.0,
                    y1: rect.y2,
                    x2: width,
                    y2: rect.y2,
                    color: theme.border,
                },
            );

            let label = if config.show_index {
                model.index_label(row)
            } else {
                (row + 1).to_string()
            };
            let text = truncate_to_width(&label, width - 2.0 * config.cell_padding, char_width);
            if text.is_empty() {
                continue;
            }
            scene.push(
                SceneKey::row(Layer::CellText, row),
                Shape::Text {
                    x: width - config.cell_padding,
                    y: (rect.y1 + rect.y2) / 2.0,
                    text: text.to_string(),
                    color: if is_selected {
                        theme.selected_foreground
                    } else {
                        theme.foreground
                    },
                    anchor: TextAnchor::East,
                },
            );
        }
    }
}

/// Corner strip above the row header
#[derive(Debug, Clone, Default)]
pub struct IndexHeader;

impl IndexHeader {
    /// Clicking the corner selects everything
    pub fn press(&self) -> HeaderEvent {
        HeaderEvent::SelectAll
    }

    /// Shows the index name when index labels are on and the index is named
    pub fn render(&self, scene: &mut Scene, ctx: &HeaderContext<'_>) {
        let HeaderContext {
            model,
            theme,
            config,
            ..
        } = *ctx;
        scene.clear();
        let (width, height) = (config.row_header_width, config.header_height);
        scene.push(
            SceneKey::whole(Layer::Background),
            Shape::fill(0.0, 0.0, width, height, theme.background),
        );
        scene.push(
            SceneKey::whole(Layer::GridLine),
            Shape::outline(0.0, 0.0, width, height, theme.border, 1.0),
        );

        let Some(name) = model.index_name().filter(|_| config.show_index) else {
            return;
        };
        let text = truncate_to_width(
            name,
            width - 2.0 * config.cell_padding,
            config.char_width(),
        );
        if !text.is_empty() {
            scene.push(
                SceneKey::whole(Layer::CellText),
                Shape::Text {
                    x: config.cell_padding,
                    y: height / 2.0,
                    text: text.to_string(),
                    color: theme.foreground,
                    anchor: TextAnchor::West,
                },
            );
        }
    }
}
