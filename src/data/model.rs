//! The data model boundary consumed by the grid engine

use std::ops::Range;

use thiserror::Error;

use super::value::{CellValue, ColumnType};

/// Errors from structural or typed mutations of a dataset.
///
/// A failed operation never mutates the dataset.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("column name must not be blank")]
    BlankName,
    #[error("column {index} out of range (column count {count})")]
    ColumnOutOfRange { index: usize, count: usize },
    #[error("row {index} out of range (row count {count})")]
    RowOutOfRange { index: usize, count: usize },
    #[error("value '{value}' is not valid for {kind} column '{column}'")]
    TypeMismatch {
        value: String,
        kind: &'static str,
        column: String,
    },
    #[error("column lengths differ: '{column}' has {len} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },
}

/// Tabular data as seen by the grid.
///
/// Positions are always 0-based (row, column) indices; row labels are
/// available separately through [`TabularModel::index_label`].
pub trait TabularModel {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn column_name(&self, col: usize) -> Option<&str>;
    fn column_type(&self, col: usize) -> Option<ColumnType>;

    /// Value at a position, `Empty` when out of range
    fn get_value(&self, row: usize, col: usize) -> CellValue;

    /// Write a value, coercing it to the column type
    fn set_value(&mut self, value: CellValue, row: usize, col: usize) -> Result<(), ModelError>;

    /// Values of `rows` within one column, fetched in one pass
    fn column_slice(&self, col: usize, rows: Range<usize>) -> Vec<CellValue>;

    fn add_column(&mut self, name: &str, kind: ColumnType) -> Result<(), ModelError>;
    fn delete_columns(&mut self, cols: &[usize]);
    fn add_rows(&mut self, n: usize);
    fn delete_rows(&mut self, rows: &[usize]);
    fn move_column(&mut self, from: usize, to: usize) -> Result<(), ModelError>;
    /// Stable sort; returns the permutation with `order[new_row] = old_row`
    fn sort_by(&mut self, cols: &[usize], ascending: bool) -> Vec<usize>;

    /// Label of a row in the index
    fn index_label(&self, row: usize) -> String;

    /// Name of the index, if it is a named index
    fn index_name(&self) -> Option<&str>;

    /// Known category values for a category column
    fn category_values(&self, col: usize) -> Vec<String>;

    /// Reset the index to the dense `0..n` sequence
    fn reindex(&mut self);
}
