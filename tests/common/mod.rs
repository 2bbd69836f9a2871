//! Shared test helpers
//!
//! Tables are created for a 450 × 244 window: with the default 50 px row
//! header and 24 px column header this leaves a 400 × 220 canvas, i.e. four
//! 100 px columns and ten 22 px rows.

#![allow(dead_code)]

use gridview::data::Column;
use gridview::grid::{ClickModifiers, Table};
use gridview::{CellValue, ColumnType, DataFrame, EngineConfig, Theme};

pub const WINDOW_WIDTH: f64 = 450.0;
pub const WINDOW_HEIGHT: f64 = 244.0;

/// Table over a blank `rows` × `cols` text dataset
pub fn grid(rows: usize, cols: usize) -> Table {
    table_for(DataFrame::empty(rows, cols))
}

pub fn table_for(model: DataFrame) -> Table {
    Table::new(
        model,
        EngineConfig::default(),
        Theme::default(),
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
    )
}

/// Four rows with one column of each editable type:
/// name (text), age (int), score (float), team (category)
pub fn people() -> DataFrame {
    DataFrame::from_columns(vec![
        Column::from_values(
            "name",
            ColumnType::Text,
            vec!["ann".into(), "bob".into(), "cy".into(), "dee".into()],
        ),
        Column::from_values(
            "age",
            ColumnType::Integer,
            vec![
                CellValue::Int(34),
                CellValue::Int(27),
                CellValue::Empty,
                CellValue::Int(41),
            ],
        ),
        Column::from_values(
            "score",
            ColumnType::Float,
            vec![
                CellValue::Float(1.5),
                CellValue::Float(0.25),
                CellValue::Float(3.0),
                CellValue::Float(2.125),
            ],
        ),
        Column::from_values(
            "team",
            ColumnType::Category,
            vec!["red".into(), "blue".into(), "red".into(), "green".into()],
        ),
    ])
    .unwrap()
}

/// Dataset whose every cell holds text, `rows` × `cols`
pub fn filled(rows: usize, cols: usize) -> DataFrame {
    let columns = (0..cols)
        .map(|c| {
            let values = (0..rows)
                .map(|r| CellValue::Text(format!("r{}c{}", r, c)))
                .collect();
            Column::from_values(format!("col{}", c), ColumnType::Text, values)
        })
        .collect();
    DataFrame::from_columns(columns).unwrap()
}

/// Window coordinates of a cell's center at the current scroll position
pub fn cell_center(table: &Table, row: usize, col: usize) -> (f64, f64) {
    let rect = table.layout().cell_rect(row, col);
    let config = table.config();
    let viewport = table.viewport();
    (
        config.row_header_width + (rect.x1 + rect.x2) / 2.0 - viewport.scroll_x,
        config.header_height + (rect.y1 + rect.y2) / 2.0 - viewport.scroll_y,
    )
}

/// Plain click on a cell
pub fn click(table: &mut Table, row: usize, col: usize) {
    let (x, y) = cell_center(table, row, col);
    table.mouse_down(x, y, ClickModifiers::default());
    table.mouse_up(x, y);
}

pub fn shift_click(table: &mut Table, row: usize, col: usize) {
    let (x, y) = cell_center(table, row, col);
    table.mouse_down(
        x,
        y,
        ClickModifiers {
            shift: true,
            ctrl: false,
        },
    );
    table.mouse_up(x, y);
}

pub fn ctrl_click(table: &mut Table, row: usize, col: usize) {
    let (x, y) = cell_center(table, row, col);
    table.mouse_down(
        x,
        y,
        ClickModifiers {
            shift: false,
            ctrl: true,
        },
    );
    table.mouse_up(x, y);
}
