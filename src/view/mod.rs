//! Window presentation: softbuffer surface, font and scrollbars
//!
//! The grid keeps its own retained scene; presenting a frame means clearing
//! the pixel buffer, replaying the scene through a [`FrameSurface`] and
//! drawing the scrollbar thumbs on top.

pub mod frame;

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use fontdue::{Font, FontSettings, Metrics};
use softbuffer::Surface;
use winit::window::Window;

use gridview::grid::Table;
use gridview::theme::Color;

use frame::{Frame, FrameSurface, TextPainter};

/// Glyph cache key: (character, font_size as bits)
pub type GlyphCacheKey = (char, u32);
pub type GlyphCache = HashMap<GlyphCacheKey, (Metrics, Vec<u8>)>;

/// Scrollbar thickness in logical pixels
const SCROLLBAR_SIZE: f64 = 6.0;
const SCROLLBAR_MIN_THUMB: f64 = 20.0;

/// Fonts tried when the config names none
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Geneva.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the configured font, or the first system font found
pub fn load_font(configured: Option<&str>) -> Result<Font> {
    let path = match configured {
        Some(path) => Path::new(path).to_path_buf(),
        None => FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .map(Path::to_path_buf)
            .context("No usable font found; set font_path in the config or pass --font")?,
    };
    let bytes =
        std::fs::read(&path).with_context(|| format!("Failed to read font {}", path.display()))?;
    let font = Font::from_bytes(bytes, FontSettings::default())
        .map_err(|e| anyhow::anyhow!("Failed to load font {}: {}", path.display(), e))?;
    tracing::info!("Using font {}", path.display());
    Ok(font)
}

pub struct Painter {
    font: Font,
    surface: Surface<Rc<Window>, Rc<Window>>,
    glyph_cache: GlyphCache,
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Painter {
    pub fn new(
        window: Rc<Window>,
        context: &softbuffer::Context<Rc<Window>>,
        font: Font,
    ) -> Result<Self> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let surface = Surface::new(context, Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;

        let mut painter = Self {
            font,
            surface,
            glyph_cache: HashMap::new(),
            width: 0,
            height: 0,
            scale_factor,
        };
        painter.resize(size.width, size.height)?;
        Ok(painter)
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Window size in logical pixels
    pub fn logical_size(&self) -> (f64, f64) {
        (
            self.width as f64 / self.scale_factor,
            self.height as f64 / self.scale_factor,
        )
    }

    /// Resize the surface to a physical size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            // Minimized: keep the old buffer, nothing will be presented
            self.width = 0;
            self.height = 0;
            return Ok(());
        };
        self.surface
            .resize(w, h)
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Present the table's current scene
    pub fn render(&mut self, table: &Table) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let (width, height) = (self.width as usize, self.height as usize);
        let scale = self.scale_factor;
        let font_size = table.config().font_size * scale as f32;
        let theme = table.theme();

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get buffer: {}", e))?;
        let mut frame = Frame::new(&mut buffer, width, height);
        frame.clear(theme.grid.background.to_argb_u32());

        let text = TextPainter::new(&self.font, &mut self.glyph_cache, font_size);
        let mut surface = FrameSurface::new(&mut frame, text, scale);
        table.paint(&mut surface);
        draw_scrollbars(&mut surface, table, theme.header.border);

        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present buffer: {}", e))?;
        Ok(())
    }
}

/// Thin thumbs along the right and bottom edges of the grid area
fn draw_scrollbars(surface: &mut FrameSurface<'_, '_>, table: &Table, color: Color) {
    let (content_w, content_h) = surface.scroll_region();
    let viewport = table.viewport();
    let config = table.config();
    let (left, top) = (config.row_header_width, config.header_height);

    if content_h > viewport.height && content_h > 0.0 {
        let track = viewport.height;
        let thumb = (track * viewport.height / content_h).max(SCROLLBAR_MIN_THUMB);
        let y = top + (track - thumb) * viewport.scroll_y / (content_h - viewport.height);
        let x = left + viewport.width - SCROLLBAR_SIZE;
        surface.fill(x, y, SCROLLBAR_SIZE, thumb, color);
    }
    if content_w > viewport.width && content_w > 0.0 {
        let track = viewport.width;
        let thumb = (track * viewport.width / content_w).max(SCROLLBAR_MIN_THUMB);
        let x = left + (track - thumb) * viewport.scroll_x / (content_w - viewport.width);
        let y = top + viewport.height - SCROLLBAR_SIZE;
        surface.fill(x, y, thumb, SCROLLBAR_SIZE, color);
    }
}
