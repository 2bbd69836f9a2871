//! Tabular datasets: values, columns, the model trait and file I/O

pub mod column;
pub mod csv;
pub mod frame;
pub mod model;
pub mod sample;
pub mod value;

pub use column::Column;
pub use frame::DataFrame;
pub use model::{ModelError, TabularModel};
pub use value::{CellValue, ColumnType};
