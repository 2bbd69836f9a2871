//! A named, typed column of cell values

use super::value::{CellValue, ColumnType};

/// One column of a [`super::DataFrame`]
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Create a column of `len` empty values
    pub fn empty(name: impl Into<String>, kind: ColumnType, len: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            values: vec![CellValue::Empty; len],
        }
    }

    /// Create a column from values, coercing each into `kind`.
    ///
    /// Values that cannot be coerced become `Empty`.
    pub fn from_values(name: impl Into<String>, kind: ColumnType, values: Vec<CellValue>) -> Self {
        let values = values
            .into_iter()
            .map(|v| kind.coerce(v).unwrap_or_default())
            .collect();
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distinct non-empty values in first-seen order
    pub fn distinct_values(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.values
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| v.to_plain_string())
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }
}
