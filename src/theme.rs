//! Theme system for the grid
//!
//! Provides YAML-based theming support with compile-time embedded themes
//! and user-defined themes from config directories.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/gridview/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::path::Path;

use serde::Deserialize;

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/gridview/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub id: String,
    /// Display name from YAML (e.g., "Default Dark")
    pub name: String,
    pub source: ThemeSource,
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// List all available themes; user themes override builtins with the same id
pub fn list_available_themes() -> Vec<ThemeInfo> {
    list_themes_in(crate::config_paths::themes_dir().as_deref())
}

/// Themes found in `user_dir` followed by the builtins it does not shadow
pub fn list_themes_in(user_dir: Option<&Path>) -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = user_dir {
        if let Ok(entries) = std::fs::read_dir(user_dir) {
            for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
                if !path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    continue;
                }
                if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                    if seen_ids.insert(id.to_string()) {
                        let name = extract_theme_name(&path).unwrap_or_else(|| id.to_string());
                        themes.push(ThemeInfo {
                            id: id.to_string(),
                            name,
                            source: ThemeSource::User,
                        });
                    }
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}

/// Extract theme name from YAML file without full parsing
fn extract_theme_name(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix("name:")?.trim();
        Some(value.trim_matches('"').trim_matches('\'').to_string())
    })
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to ARGB u32 for softbuffer
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |i: usize| {
            s.get(i..i + 2)
                .ok_or_else(|| format!("Invalid color format: {}", s))
                .and_then(|c| u8::from_str_radix(c, 16).map_err(|e| e.to_string()))
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub ui: UiThemeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiThemeData {
    pub grid: GridThemeData,
    #[serde(default)]
    pub header: HeaderThemeData,
}

/// Cell area colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct GridThemeData {
    pub background: String,
    pub foreground: String,
    pub grid_line: String,
    pub current_cell: String,
    #[serde(default)]
    pub number_foreground: Option<String>,
    #[serde(default)]
    pub row_selection: Option<String>,
    #[serde(default)]
    pub column_selection: Option<String>,
    #[serde(default)]
    pub multi_selection: Option<String>,
    #[serde(default)]
    pub mask_highlight: Option<String>,
    #[serde(default)]
    pub edit_background: Option<String>,
    #[serde(default)]
    pub edit_foreground: Option<String>,
    #[serde(default)]
    pub edit_cursor: Option<String>,
}

/// Header strip colors (all optional)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HeaderThemeData {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub selected_background: Option<String>,
    #[serde(default)]
    pub selected_foreground: Option<String>,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub drag_ghost: Option<String>,
    #[serde(default)]
    pub resize_line: Option<String>,
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub grid: GridTheme,
    pub header: HeaderTheme,
}

/// Cell area colors (resolved)
#[derive(Debug, Clone, PartialEq)]
pub struct GridTheme {
    pub background: Color,
    pub foreground: Color,
    /// Text color for numeric cells
    pub number_foreground: Color,
    pub grid_line: Color,
    pub row_selection: Color,
    pub column_selection: Color,
    pub multi_selection: Color,
    /// Outline of the current cell
    pub current_cell: Color,
    pub mask_highlight: Color,
    pub edit_background: Color,
    pub edit_foreground: Color,
    pub edit_cursor: Color,
}

impl GridTheme {
    pub fn default_dark() -> Self {
        Self {
            background: Color::rgb(0x1E, 0x1E, 0x1E),
            foreground: Color::rgb(0xD4, 0xD4, 0xD4),
            number_foreground: Color::rgb(0xB5, 0xCE, 0xA8),
            grid_line: Color::rgb(0x3C, 0x3C, 0x3C),
            row_selection: Color::rgba(0x26, 0x4F, 0x78, 0x40),
            column_selection: Color::rgba(0x26, 0x4F, 0x78, 0x40),
            multi_selection: Color::rgba(0x26, 0x4F, 0x78, 0x80),
            current_cell: Color::rgb(0x37, 0x94, 0xFF),
            mask_highlight: Color::rgba(0xE2, 0xC0, 0x8D, 0x60),
            edit_background: Color::rgb(0x25, 0x25, 0x26),
            edit_foreground: Color::rgb(0xFF, 0xFF, 0xFF),
            edit_cursor: Color::rgb(0xAE, 0xAF, 0xAD),
        }
    }
}

/// Header strip colors (resolved)
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderTheme {
    pub background: Color,
    pub foreground: Color,
    /// Background of headers whose row/column is selected
    pub selected_background: Color,
    pub selected_foreground: Color,
    pub border: Color,
    /// Ghost rectangle shown while dragging a column
    pub drag_ghost: Color,
    /// Guide line shown while resizing a column
    pub resize_line: Color,
}

impl HeaderTheme {
    pub fn default_dark() -> Self {
        Self {
            background: Color::rgb(0x25, 0x25, 0x26),
            foreground: Color::rgb(0xA0, 0xA0, 0xA0),
            selected_background: Color::rgb(0x09, 0x47, 0x71),
            selected_foreground: Color::rgb(0xFF, 0xFF, 0xFF),
            border: Color::rgb(0x3C, 0x3C, 0x3C),
            drag_ghost: Color::rgba(0x37, 0x94, 0xFF, 0x60),
            resize_line: Color::rgb(0x37, 0x94, 0xFF),
        }
    }
}

fn optional(value: &Option<String>, fallback: Color) -> Result<Color, String> {
    value
        .as_ref()
        .map(|s| Color::from_hex(s))
        .transpose()
        .map(|c| c.unwrap_or(fallback))
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let grid = &data.ui.grid;
        let foreground = Color::from_hex(&grid.foreground)?;
        let grid_defaults = GridTheme::default_dark();
        let header = &data.ui.header;
        let header_defaults = HeaderTheme::default_dark();

        Ok(Theme {
            name: data.name,
            grid: GridTheme {
                background: Color::from_hex(&grid.background)?,
                foreground,
                number_foreground: optional(&grid.number_foreground, foreground)?,
                grid_line: Color::from_hex(&grid.grid_line)?,
                row_selection: optional(&grid.row_selection, grid_defaults.row_selection)?,
                column_selection: optional(
                    &grid.column_selection,
                    grid_defaults.column_selection,
                )?,
                multi_selection: optional(&grid.multi_selection, grid_defaults.multi_selection)?,
                current_cell: Color::from_hex(&grid.current_cell)?,
                mask_highlight: optional(&grid.mask_highlight, grid_defaults.mask_highlight)?,
                edit_background: optional(&grid.edit_background, grid_defaults.edit_background)?,
                edit_foreground: optional(&grid.edit_foreground, foreground)?,
                edit_cursor: optional(&grid.edit_cursor, foreground)?,
            },
            header: HeaderTheme {
                background: optional(&header.background, header_defaults.background)?,
                foreground: optional(&header.foreground, header_defaults.foreground)?,
                selected_background: optional(
                    &header.selected_background,
                    header_defaults.selected_background,
                )?,
                selected_foreground: optional(
                    &header.selected_foreground,
                    header_defaults.selected_foreground,
                )?,
                border: optional(&header.border, header_defaults.border)?,
                drag_ghost: optional(&header.drag_ghost, header_defaults.drag_ghost)?,
                resize_line: optional(&header.resize_line, header_defaults.resize_line)?,
            },
        })
    }

    /// Default dark theme (YAML-backed with Rust fallback)
    pub fn default_dark() -> Self {
        Theme::from_yaml(DEFAULT_DARK_YAML).unwrap_or_else(|_| Theme {
            name: "Default Dark".to_string(),
            grid: GridTheme::default_dark(),
            header: HeaderTheme::default_dark(),
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(
            Color::from_hex("#10203040").unwrap(),
            Color::rgba(0x10, 0x20, 0x30, 0x40)
        );
        assert!(Color::from_hex("#FFF").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_builtin_themes_parse() {
        for builtin in BUILTIN_THEMES {
            let theme = Theme::from_yaml(builtin.yaml)
                .unwrap_or_else(|e| panic!("{} failed: {}", builtin.id, e));
            assert!(!theme.name.is_empty());
        }
    }

    #[test]
    fn test_minimal_theme_fills_defaults() {
        let yaml = r##"
version: 1
name: "Minimal"
ui:
  grid:
    background: "#000000"
    foreground: "#FFFFFF"
    grid_line: "#333333"
    current_cell: "#FF0000"
"##;
        let theme = Theme::from_yaml(yaml).unwrap();
        assert_eq!(theme.grid.number_foreground, Color::rgb(255, 255, 255));
        assert_eq!(theme.header, HeaderTheme::default_dark());
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(Theme::from_builtin("no-such-theme").is_err());
    }
}
