//! The grid engine: layout, selection, rendering, editing and headers

pub mod editor;
pub mod format;
pub mod header;
pub mod layout;
pub mod navigation;
pub mod render;
pub mod scene;
pub mod selection;
pub mod surface;
pub mod table;
pub mod viewport;

pub use editor::{CellEditor, EditBuffer, EditMode, EditOutcome, EditSession};
pub use header::{ColumnHeader, CursorHint, HeaderEvent, IndexHeader, RowHeader};
pub use layout::{CellRect, ColumnLayout};
pub use navigation::Navigation;
pub use render::{Decorations, HighlightMask, RenderContext, RenderStats, ViewportRenderer};
pub use scene::{Layer, Scene, SceneKey, Shape};
pub use selection::SelectionState;
pub use surface::{ClipRect, DrawOp, RecordingSurface, Surface, TextAnchor};
pub use table::{ClickModifiers, EditCommand, Table};
pub use viewport::ViewportState;

/// Cell position in the grid (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}
