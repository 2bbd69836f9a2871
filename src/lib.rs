//! gridview - spreadsheet-style grid engine
//!
//! This crate provides a viewport-culled, retained-scene grid for tabular
//! data: column layout, selection, incremental rendering, cell editing and
//! header interaction. The `gridview` binary puts it in a window.

pub mod action;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod damage;
pub mod data;
pub mod grid;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use action::{dispatch, UserAction};
pub use config::EngineConfig;
pub use damage::Damage;
pub use data::{CellValue, ColumnType, DataFrame, TabularModel};
pub use grid::{CellPosition, Table};
pub use theme::Theme;
