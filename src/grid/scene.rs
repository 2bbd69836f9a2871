//! Retained scene for the grid canvas
//!
//! Every shape is filed under a [`SceneKey`] of layer, row and column, so a
//! single cell or a whole layer can be replaced by an indexed lookup. Shapes
//! are stored in canvas coordinates and replayed in key order, which is the
//! fixed z-order of the layers.

use std::collections::BTreeMap;

use super::surface::{Surface, TextAnchor};
use crate::theme::Color;

/// Drawing layers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    ColumnFill,
    RowFill,
    GridLine,
    RowSelection,
    ColumnSelection,
    MaskHighlight,
    CellText,
    MultiSelection,
    CurrentCell,
    EditOverlay,
}

impl Layer {
    /// Layers rebuilt when only the selection changed
    pub const SELECTION: [Layer; 4] = [
        Layer::RowSelection,
        Layer::ColumnSelection,
        Layer::MultiSelection,
        Layer::CurrentCell,
    ];
}

/// Address of a group of shapes.
///
/// `row`/`col` are `None` for shapes spanning a whole row, column or the
/// canvas (a vertical grid line has only a column, the current-cell outline
/// neither).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneKey {
    pub layer: Layer,
    pub row: Option<usize>,
    pub col: Option<usize>,
}

impl SceneKey {
    pub fn cell(layer: Layer, row: usize, col: usize) -> Self {
        Self {
            layer,
            row: Some(row),
            col: Some(col),
        }
    }

    pub fn row(layer: Layer, row: usize) -> Self {
        Self {
            layer,
            row: Some(row),
            col: None,
        }
    }

    pub fn col(layer: Layer, col: usize) -> Self {
        Self {
            layer,
            row: None,
            col: Some(col),
        }
    }

    pub fn whole(layer: Layer) -> Self {
        Self {
            layer,
            row: None,
            col: None,
        }
    }
}

/// A drawing primitive in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        outline: Option<Color>,
        outline_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Color,
        anchor: TextAnchor,
    },
}

impl Shape {
    pub fn fill(x: f64, y: f64, width: f64, height: f64, color: Color) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill: Some(color),
            outline: None,
            outline_width: 0.0,
        }
    }

    pub fn outline(x: f64, y: f64, width: f64, height: f64, color: Color, line: f64) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            outline: Some(color),
            outline_width: line,
        }
    }

    /// Text content, if this is a text shape
    pub fn text(&self) -> Option<&str> {
        match self {
            Shape::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    fn paint(&self, surface: &mut dyn Surface, dx: f64, dy: f64) {
        match self {
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => surface.line(x1 + dx, y1 + dy, x2 + dx, y2 + dy, *color),
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
                outline,
                outline_width,
            } => surface.rect(
                x + dx,
                y + dy,
                *width,
                *height,
                *fill,
                outline.map(|c| (c, *outline_width)),
            ),
            Shape::Text {
                x,
                y,
                text,
                color,
                anchor,
            } => surface.text(x + dx, y + dy, text, *color, *anchor),
        }
    }
}

/// Shapes grouped by key, iterated in z-order
#[derive(Debug, Clone, Default)]
pub struct Scene {
    items: BTreeMap<SceneKey, Vec<Shape>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape under `key`, keeping existing ones
    pub fn push(&mut self, key: SceneKey, shape: Shape) {
        self.items.entry(key).or_default().push(shape);
    }

    /// Replace all shapes under `key`
    pub fn set(&mut self, key: SceneKey, shapes: Vec<Shape>) {
        if shapes.is_empty() {
            self.items.remove(&key);
        } else {
            self.items.insert(key, shapes);
        }
    }

    pub fn remove(&mut self, key: &SceneKey) -> Option<Vec<Shape>> {
        self.items.remove(key)
    }

    pub fn get(&self, key: &SceneKey) -> Option<&[Shape]> {
        self.items.get(key).map(|v| v.as_slice())
    }

    /// Remove every shape on one layer
    pub fn clear_layer(&mut self, layer: Layer) {
        self.items.retain(|key, _| key.layer != layer);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of keys on a layer
    pub fn count(&self, layer: Layer) -> usize {
        self.items.keys().filter(|k| k.layer == layer).count()
    }

    /// All keys and shapes in z-order
    pub fn iter(&self) -> impl Iterator<Item = (&SceneKey, &[Shape])> {
        self.items.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Text strings drawn on a layer, in key order
    pub fn texts(&self, layer: Layer) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(k, _)| k.layer == layer)
            .flat_map(|(_, shapes)| shapes.iter().filter_map(Shape::text))
            .collect()
    }

    /// Replay every shape onto a surface, offset by `(dx, dy)`
    pub fn paint(&self, surface: &mut dyn Surface, dx: f64, dy: f64) {
        for shapes in self.items.values() {
            for shape in shapes {
                shape.paint(surface, dx, dy);
            }
        }
    }
}
