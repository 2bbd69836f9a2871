//! Shared helpers for benchmarks

use gridview::data::sample;
use gridview::{DataFrame, EngineConfig, Table, Theme};

/// Full HD window, large enough to show about fifty rows
pub const WINDOW: (f64, f64) = (1920.0, 1080.0);

/// Mixed-type dataset with a fixed seed
#[allow(dead_code)]
pub fn make_frame(rows: usize, cols: usize) -> DataFrame {
    sample::generate(rows, cols, 42)
}

/// Table over a sample dataset, already drawn once
#[allow(dead_code)]
pub fn make_table(rows: usize, cols: usize) -> Table {
    Table::new(
        make_frame(rows, cols),
        EngineConfig::default(),
        Theme::default(),
        WINDOW.0,
        WINDOW.1,
    )
}
