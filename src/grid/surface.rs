//! Drawing surface abstraction
//!
//! The grid never touches pixels directly; it replays its scene onto a
//! [`Surface`]. The viewer implements it over a softbuffer frame, tests use
//! [`RecordingSurface`].

use crate::theme::Color;

/// Which point of the text box `(x, y)` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Left edge, vertically centered
    #[default]
    West,
    /// Horizontally and vertically centered
    Center,
    /// Right edge, vertically centered
    East,
}

/// Clip rectangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A 2D target with line, rectangle and text primitives
pub trait Surface {
    /// False once the underlying window or buffer has been torn down.
    ///
    /// Drawing against an invalid surface is skipped, never an error.
    fn is_valid(&self) -> bool;

    /// Size of the full scrollable content
    fn set_scroll_region(&mut self, width: f64, height: f64);

    /// Restrict subsequent drawing to a rectangle (`None` lifts the clip)
    fn set_clip(&mut self, clip: Option<ClipRect>);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color);

    fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        outline: Option<(Color, f64)>,
    );

    fn text(&mut self, x: f64, y: f64, text: &str, color: Color, anchor: TextAnchor);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    ScrollRegion(f64, f64),
    Clip(Option<ClipRect>),
    Line(f64, f64, f64, f64),
    Rect(f64, f64, f64, f64),
    Text(f64, f64, String),
}

/// Surface that records calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    /// Simulates a destroyed window when false
    pub valid: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            valid: true,
        }
    }

    /// Text strings drawn so far, in call order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(_, _, s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn set_scroll_region(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::ScrollRegion(width, height));
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.ops.push(DrawOp::Clip(clip));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, _color: Color) {
        self.ops.push(DrawOp::Line(x1, y1, x2, y2));
    }

    fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        _fill: Option<Color>,
        _outline: Option<(Color, f64)>,
    ) {
        self.ops.push(DrawOp::Rect(x, y, width, height));
    }

    fn text(&mut self, x: f64, y: f64, text: &str, _color: Color, _anchor: TextAnchor) {
        self.ops.push(DrawOp::Text(x, y, text.to_string()));
    }
}
