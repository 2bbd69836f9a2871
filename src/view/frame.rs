//! Frame abstraction for drawing primitives
//!
//! [`Frame`] wraps a softbuffer pixel buffer with clipped fill, blend and
//! line operations. [`FrameSurface`] adapts it (plus a [`TextPainter`]) to
//! the grid's [`Surface`] trait so scenes can be replayed onto the window.

use fontdue::Font;

use gridview::grid::{ClipRect, Surface, TextAnchor};
use gridview::theme::Color;

use super::GlyphCache;

/// Blend a foreground color onto a background color using alpha compositing.
///
/// Both colors are in ARGB format (0xAARRGGBB). Returns an opaque color.
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let bg_r = ((bg >> 16) & 0xFF) as f32;
    let bg_g = ((bg >> 8) & 0xFF) as f32;
    let bg_b = (bg & 0xFF) as f32;

    let fg_r = ((fg >> 16) & 0xFF) as f32;
    let fg_g = ((fg >> 8) & 0xFF) as f32;
    let fg_b = (fg & 0xFF) as f32;

    let r = (bg_r * (1.0 - alpha) + fg_r * alpha) as u32;
    let g = (bg_g * (1.0 - alpha) + fg_g * alpha) as u32;
    let b = (bg_b * (1.0 - alpha) + fg_b * alpha) as u32;

    0xFF000000 | (r << 16) | (g << 8) | b
}

/// Pixel clip (inclusive start, exclusive end)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelClip {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// A pixel buffer with clipped drawing primitives.
///
/// Out-of-bounds operations are clipped, never a panic.
pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    clip: Option<PixelClip>,
}

impl<'a> Frame<'a> {
    /// Wrap a buffer; a buffer shorter than `width * height` shrinks the
    /// usable height.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let height = if width > 0 {
            height.min(buffer.len() / width)
        } else {
            0
        };
        Self {
            buffer,
            width,
            height,
            clip: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Restrict drawing to a pixel rectangle (`None` restores the full frame)
    pub fn set_clip(&mut self, rect: Option<(f64, f64, f64, f64)>) {
        self.clip = rect.map(|(x, y, w, h)| PixelClip {
            x0: (x.max(0.0) as usize).min(self.width),
            y0: (y.max(0.0) as usize).min(self.height),
            x1: ((x + w).max(0.0) as usize).min(self.width),
            y1: ((y + h).max(0.0) as usize).min(self.height),
        });
    }

    #[inline]
    fn bounds(&self) -> PixelClip {
        self.clip.unwrap_or(PixelClip {
            x0: 0,
            y0: 0,
            x1: self.width,
            y1: self.height,
        })
    }

    /// Clear the whole buffer (ignores the clip)
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill a rectangle, alpha blending translucent colors
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: u32) {
        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        if alpha <= 0.0 || w <= 0.0 || h <= 0.0 {
            return;
        }
        let clip = self.bounds();
        let x0 = (x.max(0.0).round() as usize).max(clip.x0);
        let y0 = (y.max(0.0).round() as usize).max(clip.y0);
        let x1 = ((x + w).max(0.0).round() as usize).min(clip.x1);
        let y1 = ((y + h).max(0.0).round() as usize).min(clip.y1);

        for py in y0..y1 {
            let row = py * self.width;
            if alpha >= 1.0 {
                self.buffer[row + x0..row + x1.max(x0)].fill(color | 0xFF000000);
            } else {
                for px in x0..x1 {
                    self.buffer[row + px] = blend_colors(self.buffer[row + px], color, alpha);
                }
            }
        }
    }

    /// Blend a single pixel (bounds-checked, respects the clip)
    #[inline]
    pub fn blend_pixel(&mut self, x: isize, y: isize, color: u32, alpha: f32) {
        let clip = self.bounds();
        if x < clip.x0 as isize || y < clip.y0 as isize {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= clip.x1 || y >= clip.y1 || alpha <= 0.0 {
            return;
        }
        let idx = y * self.width + x;
        self.buffer[idx] = if alpha >= 1.0 {
            color | 0xFF000000
        } else {
            blend_colors(self.buffer[idx], color, alpha)
        };
    }

    /// 1px line; axis-aligned lines are filled spans, others use Bresenham
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: u32) {
        if y1 == y2 {
            let (a, b) = (x1.min(x2), x1.max(x2));
            self.fill_rect(a, y1.floor(), (b - a).max(1.0), 1.0, color);
            return;
        }
        if x1 == x2 {
            let (a, b) = (y1.min(y2), y1.max(y2));
            self.fill_rect(x1.floor(), a, 1.0, (b - a).max(1.0), color);
            return;
        }

        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        let (mut x, mut y) = (x1.round() as isize, y1.round() as isize);
        let (xe, ye) = (x2.round() as isize, y2.round() as isize);
        let dx = (xe - x).abs();
        let dy = -(ye - y).abs();
        let sx = if x < xe { 1 } else { -1 };
        let sy = if y < ye { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_pixel(x, y, color, alpha);
            if x == xe && y == ye {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rectangle border of `thickness` pixels drawn inside the rectangle
    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, thickness: f64, color: u32) {
        let t = thickness.max(1.0).min(w / 2.0).min(h / 2.0);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y + t, t, h - 2.0 * t, color);
        self.fill_rect(x + w - t, y + t, t, h - 2.0 * t, color);
    }
}

/// Text rendering context wrapping a font and its glyph cache
pub struct TextPainter<'a> {
    font: &'a Font,
    glyph_cache: &'a mut GlyphCache,
    font_size: f32,
    ascent: f32,
    descent: f32,
}

impl<'a> TextPainter<'a> {
    pub fn new(font: &'a Font, glyph_cache: &'a mut GlyphCache, font_size: f32) -> Self {
        let (ascent, descent) = font
            .horizontal_line_metrics(font_size)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((font_size * 0.8, -font_size * 0.2));
        Self {
            font,
            glyph_cache,
            font_size,
            ascent,
            descent,
        }
    }

    /// Measure text width in pixels
    pub fn measure_width(&mut self, text: &str) -> f32 {
        let mut width = 0.0;
        for ch in text.chars() {
            let key = (ch, self.font_size.to_bits());
            let (metrics, _) = self
                .glyph_cache
                .entry(key)
                .or_insert_with(|| self.font.rasterize(ch, self.font_size));
            width += metrics.advance_width;
        }
        width
    }

    /// Draw text with its left edge at `x` and vertical center at `center_y`
    pub fn draw(&mut self, frame: &mut Frame, x: f32, center_y: f32, text: &str, color: u32) {
        let baseline = (center_y + (self.ascent + self.descent) / 2.0).round();
        let mut pen_x = x;

        for ch in text.chars() {
            let key = (ch, self.font_size.to_bits());
            let (metrics, bitmap) = self
                .glyph_cache
                .entry(key)
                .or_insert_with(|| self.font.rasterize(ch, self.font_size));

            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;
            for by in 0..metrics.height {
                for bx in 0..metrics.width {
                    let coverage = bitmap.get(by * metrics.width + bx).copied().unwrap_or(0);
                    if coverage == 0 {
                        continue;
                    }
                    let px = pen_x as isize + bx as isize + metrics.xmin as isize;
                    let py = (glyph_top + by as f32) as isize;
                    frame.blend_pixel(px, py, color, coverage as f32 / 255.0);
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}

/// The grid's drawing surface over a window frame.
///
/// Grid coordinates are logical pixels; everything is multiplied by `scale`
/// on the way to the buffer.
pub struct FrameSurface<'f, 'a> {
    frame: &'f mut Frame<'a>,
    text: TextPainter<'f>,
    scale: f64,
    scroll_region: (f64, f64),
}

impl<'f, 'a> FrameSurface<'f, 'a> {
    pub fn new(frame: &'f mut Frame<'a>, text: TextPainter<'f>, scale: f64) -> Self {
        Self {
            frame,
            text,
            scale,
            scroll_region: (0.0, 0.0),
        }
    }

    /// Content size last announced by the grid (logical pixels)
    pub fn scroll_region(&self) -> (f64, f64) {
        self.scroll_region
    }

    /// Fill a logical rectangle directly (scrollbars and other chrome)
    pub fn fill(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let s = self.scale;
        self.frame
            .fill_rect(x * s, y * s, w * s, h * s, color.to_argb_u32());
    }
}

impl Surface for FrameSurface<'_, '_> {
    fn is_valid(&self) -> bool {
        self.frame.width() > 0 && self.frame.height() > 0
    }

    fn set_scroll_region(&mut self, width: f64, height: f64) {
        self.scroll_region = (width, height);
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        let s = self.scale;
        self.frame
            .set_clip(clip.map(|c| (c.x * s, c.y * s, c.width * s, c.height * s)));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
        let s = self.scale;
        self.frame
            .line(x1 * s, y1 * s, x2 * s, y2 * s, color.to_argb_u32());
    }

    fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        outline: Option<(Color, f64)>,
    ) {
        let s = self.scale;
        let (x, y, w, h) = (x * s, y * s, width * s, height * s);
        if let Some(fill) = fill {
            self.frame.fill_rect(x, y, w, h, fill.to_argb_u32());
        }
        if let Some((color, thickness)) = outline {
            self.frame
                .stroke_rect(x, y, w, h, (thickness * s).round(), color.to_argb_u32());
        }
    }

    fn text(&mut self, x: f64, y: f64, text: &str, color: Color, anchor: TextAnchor) {
        if text.is_empty() {
            return;
        }
        let s = self.scale;
        let (x, y) = ((x * s) as f32, (y * s) as f32);
        let left = match anchor {
            TextAnchor::West => x,
            TextAnchor::Center => x - self.text.measure_width(text) / 2.0,
            TextAnchor::East => x - self.text.measure_width(text),
        };
        self.text
            .draw(self.frame, left, y, text, color.to_argb_u32());
    }
}
