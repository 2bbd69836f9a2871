//! Column-oriented in-memory dataset

use std::cmp::Ordering;
use std::collections::HashSet;
use std::ops::Range;

use super::column::Column;
use super::model::{ModelError, TabularModel};
use super::value::{CellValue, ColumnType};
use crate::grid::format::column_to_letters;

/// An ordered collection of equally long, uniquely named columns plus a row
/// index.
///
/// Datasets are replaced wholesale by the grid; derived datasets (sorted
/// copies, sub-frames) are new values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
    index: Vec<String>,
    index_name: Option<String>,
    rows: usize,
}

impl DataFrame {
    /// Placeholder dataset of `rows` × `cols` empty text columns named A, B, C, ...
    pub fn empty(rows: usize, cols: usize) -> Self {
        let columns = (0..cols)
            .map(|c| Column::empty(column_to_letters(c), ColumnType::Text, rows))
            .collect();
        Self {
            columns,
            index: default_index(0, rows),
            index_name: None,
            rows,
        }
    }

    /// Build a dataset from columns, validating length and name invariants
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, ModelError> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        let mut names = HashSet::new();

        for column in &columns {
            if column.name.trim().is_empty() {
                return Err(ModelError::BlankName);
            }
            if !names.insert(column.name.as_str()) {
                return Err(ModelError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != rows {
                return Err(ModelError::LengthMismatch {
                    column: column.name.clone(),
                    len: column.len(),
                    expected: rows,
                });
            }
        }

        Ok(Self {
            columns,
            index: default_index(0, rows),
            index_name: None,
            rows,
        })
    }

    /// Replace the row index with explicit labels
    pub fn with_index(
        mut self,
        labels: Vec<String>,
        name: Option<String>,
    ) -> Result<Self, ModelError> {
        if labels.len() != self.rows {
            return Err(ModelError::LengthMismatch {
                column: name.unwrap_or_else(|| "index".to_string()),
                len: labels.len(),
                expected: self.rows,
            });
        }
        self.index = labels;
        self.index_name = name;
        Ok(self)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, col: usize) -> Option<&Column> {
        self.columns.get(col)
    }

    pub fn column_mut(&mut self, col: usize) -> Option<&mut Column> {
        self.columns.get_mut(col)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns.is_empty()
    }

    /// Whether the index is the dense `0..n` sequence
    pub fn has_default_index(&self) -> bool {
        self.index
            .iter()
            .enumerate()
            .all(|(i, label)| label.parse::<usize>().ok() == Some(i))
    }

    /// Copy of the given rows and columns, in the order given
    pub fn sub_frame(&self, rows: &[usize], cols: &[usize]) -> DataFrame {
        let rows: Vec<usize> = rows.iter().copied().filter(|&r| r < self.rows).collect();
        let columns = cols
            .iter()
            .filter_map(|&c| self.columns.get(c))
            .map(|column| Column {
                name: column.name.clone(),
                kind: column.kind,
                values: rows.iter().map(|&r| column.values[r].clone()).collect(),
            })
            .collect();

        DataFrame {
            columns,
            index: rows.iter().map(|&r| self.index[r].clone()).collect(),
            index_name: self.index_name.clone(),
            rows: rows.len(),
        }
    }

    /// Rename a column, refusing blank or duplicate names
    pub fn rename_column(&mut self, col: usize, name: &str) -> Result<(), ModelError> {
        let count = self.columns.len();
        if col >= count {
            return Err(ModelError::ColumnOutOfRange { index: col, count });
        }
        self.check_new_name(name)?;
        self.columns[col].name = name.to_string();
        Ok(())
    }

    fn check_new_name(&self, name: &str) -> Result<(), ModelError> {
        if name.trim().is_empty() {
            return Err(ModelError::BlankName);
        }
        if self.column_index(name).is_some() {
            return Err(ModelError::DuplicateColumn(name.to_string()));
        }
        Ok(())
    }

    fn sort_permutation(&self, cols: &[usize], ascending: bool) -> Vec<usize> {
        let keys: Vec<&Column> = cols.iter().filter_map(|&c| self.columns.get(c)).collect();
        let mut order: Vec<usize> = (0..self.rows).collect();

        // Stable sort; empty values go last in both directions
        order.sort_by(|&a, &b| {
            for column in &keys {
                let (va, vb) = (&column.values[a], &column.values[b]);
                let ord = match (va.is_empty(), vb.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) if ascending => va.sort_cmp(vb),
                    (false, false) => vb.sort_cmp(va),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        order
    }
}

fn default_index(start: usize, len: usize) -> Vec<String> {
    (start..start + len).map(|i| i.to_string()).collect()
}

impl TabularModel for DataFrame {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, col: usize) -> Option<&str> {
        self.columns.get(col).map(|c| c.name.as_str())
    }

    fn column_type(&self, col: usize) -> Option<ColumnType> {
        self.columns.get(col).map(|c| c.kind)
    }

    fn get_value(&self, row: usize, col: usize) -> CellValue {
        self.columns
            .get(col)
            .and_then(|c| c.values.get(row))
            .cloned()
            .unwrap_or_default()
    }

    fn set_value(&mut self, value: CellValue, row: usize, col: usize) -> Result<(), ModelError> {
        let rows = self.rows;
        let count = self.columns.len();
        let column = self
            .columns
            .get_mut(col)
            .ok_or(ModelError::ColumnOutOfRange { index: col, count })?;
        if row >= rows {
            return Err(ModelError::RowOutOfRange { index: row, count: rows });
        }

        let text = value.to_plain_string();
        let coerced = column
            .kind
            .coerce(value)
            .ok_or_else(|| ModelError::TypeMismatch {
                value: text,
                kind: column.kind.label(),
                column: column.name.clone(),
            })?;
        column.values[row] = coerced;
        Ok(())
    }

    fn column_slice(&self, col: usize, rows: Range<usize>) -> Vec<CellValue> {
        let Some(column) = self.columns.get(col) else {
            return Vec::new();
        };
        let end = rows.end.min(column.values.len());
        let start = rows.start.min(end);
        column.values[start..end].to_vec()
    }

    fn add_column(&mut self, name: &str, kind: ColumnType) -> Result<(), ModelError> {
        self.check_new_name(name)?;
        self.columns.push(Column::empty(name, kind, self.rows));
        tracing::debug!("Added {} column '{}'", kind.label(), name);
        Ok(())
    }

    fn delete_columns(&mut self, cols: &[usize]) {
        let doomed: HashSet<usize> = cols.iter().copied().collect();
        let mut i = 0;
        self.columns.retain(|_| {
            let keep = !doomed.contains(&i);
            i += 1;
            keep
        });
    }

    fn add_rows(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let next = if self.has_default_index() {
            self.rows
        } else {
            self.index
                .iter()
                .filter_map(|l| l.parse::<usize>().ok())
                .max()
                .map(|m| m + 1)
                .unwrap_or(self.rows)
        };
        for column in &mut self.columns {
            column.values.extend(std::iter::repeat(CellValue::Empty).take(n));
        }
        self.index.extend(default_index(next, n));
        self.rows += n;
    }

    fn delete_rows(&mut self, rows: &[usize]) {
        let doomed: HashSet<usize> = rows.iter().copied().filter(|&r| r < self.rows).collect();
        if doomed.is_empty() {
            return;
        }
        let retain_rows = |values: &mut Vec<CellValue>| {
            let mut i = 0;
            values.retain(|_| {
                let keep = !doomed.contains(&i);
                i += 1;
                keep
            });
        };
        for column in &mut self.columns {
            retain_rows(&mut column.values);
        }
        let mut i = 0;
        self.index.retain(|_| {
            let keep = !doomed.contains(&i);
            i += 1;
            keep
        });
        self.rows -= doomed.len();
    }

    fn move_column(&mut self, from: usize, to: usize) -> Result<(), ModelError> {
        let count = self.columns.len();
        for index in [from, to] {
            if index >= count {
                return Err(ModelError::ColumnOutOfRange { index, count });
            }
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        Ok(())
    }

    fn sort_by(&mut self, cols: &[usize], ascending: bool) -> Vec<usize> {
        let order = self.sort_permutation(cols, ascending);
        for column in &mut self.columns {
            column.values = order.iter().map(|&r| column.values[r].clone()).collect();
        }
        self.index = order.iter().map(|&r| self.index[r].clone()).collect();
        order
    }

    fn index_label(&self, row: usize) -> String {
        self.index.get(row).cloned().unwrap_or_default()
    }

    fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    fn category_values(&self, col: usize) -> Vec<String> {
        self.columns
            .get(col)
            .map(|c| c.distinct_values())
            .unwrap_or_default()
    }

    fn reindex(&mut self) {
        self.index = default_index(0, self.rows);
        self.index_name = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> DataFrame {
        DataFrame::from_columns(vec![
            Column::from_values(
                "name",
                ColumnType::Text,
                vec!["carol".into(), "alice".into(), "bob".into()],
            ),
            Column::from_values(
                "age",
                ColumnType::Integer,
                vec![CellValue::Int(35), CellValue::Empty, CellValue::Int(25)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_placeholder() {
        let df = DataFrame::empty(0, 5);
        assert_eq!(df.row_count(), 0);
        assert_eq!(df.column_count(), 5);
        assert_eq!(df.column_names(), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_from_columns_rejects_duplicates_and_ragged() {
        let dup = DataFrame::from_columns(vec![
            Column::empty("a", ColumnType::Text, 1),
            Column::empty("a", ColumnType::Text, 1),
        ]);
        assert_eq!(dup, Err(ModelError::DuplicateColumn("a".to_string())));

        let ragged = DataFrame::from_columns(vec![
            Column::empty("a", ColumnType::Text, 1),
            Column::empty("b", ColumnType::Text, 2),
        ]);
        assert!(matches!(ragged, Err(ModelError::LengthMismatch { .. })));
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut df = people();
        df.set_value(CellValue::from("41"), 1, 1).unwrap();
        assert_eq!(df.get_value(1, 1), CellValue::Int(41));

        df.set_value(CellValue::from("dave"), 0, 0).unwrap();
        assert_eq!(df.get_value(0, 0), CellValue::from("dave"));
    }

    #[test]
    fn test_set_value_type_mismatch_leaves_value() {
        let mut df = people();
        let err = df.set_value(CellValue::from("old"), 0, 1);
        assert!(matches!(err, Err(ModelError::TypeMismatch { .. })));
        assert_eq!(df.get_value(0, 1), CellValue::Int(35));
    }

    #[test]
    fn test_get_value_out_of_range_is_empty() {
        let df = people();
        assert_eq!(df.get_value(10, 0), CellValue::Empty);
        assert_eq!(df.get_value(0, 10), CellValue::Empty);
    }

    #[test]
    fn test_add_column_refuses_duplicate_and_blank() {
        let mut df = people();
        assert!(df.add_column("name", ColumnType::Text).is_err());
        assert_eq!(df.add_column("  ", ColumnType::Text), Err(ModelError::BlankName));
        assert_eq!(df.column_count(), 2);

        df.add_column("score", ColumnType::Float).unwrap();
        assert_eq!(df.column_count(), 3);
        assert_eq!(df.column(2).unwrap().len(), 3);
    }

    #[test]
    fn test_add_and_delete_rows_keep_index_aligned() {
        let mut df = people();
        df.add_rows(2);
        assert_eq!(df.row_count(), 5);
        assert_eq!(df.index_label(4), "4");

        df.delete_rows(&[0, 4, 99]);
        assert_eq!(df.row_count(), 3);
        assert_eq!(df.index(), &["1", "2", "3"]);
        assert_eq!(df.get_value(0, 0), CellValue::from("alice"));
    }

    #[test]
    fn test_sort_by_puts_empty_last() {
        let mut df = people();
        assert_eq!(df.sort_by(&[1], true), vec![2, 0, 1]);
        assert_eq!(df.get_value(0, 1), CellValue::Int(25));
        assert_eq!(df.get_value(1, 1), CellValue::Int(35));
        assert_eq!(df.get_value(2, 1), CellValue::Empty);
        assert_eq!(df.index(), &["2", "0", "1"]);

        df.sort_by(&[1], false);
        assert_eq!(df.get_value(0, 1), CellValue::Int(35));
        assert_eq!(df.get_value(2, 1), CellValue::Empty);
    }

    #[test]
    fn test_move_column() {
        let mut df = people();
        df.move_column(1, 0).unwrap();
        assert_eq!(df.column_names(), vec!["age", "name"]);
        assert!(df.move_column(0, 5).is_err());
    }

    #[test]
    fn test_sub_frame() {
        let df = people();
        let sub = df.sub_frame(&[2, 0], &[0]);
        assert_eq!(sub.row_count(), 2);
        assert_eq!(sub.column_count(), 1);
        assert_eq!(sub.get_value(0, 0), CellValue::from("bob"));
        assert_eq!(sub.index(), &["2", "0"]);
    }

    #[test]
    fn test_column_slice_clamps() {
        let df = people();
        assert_eq!(df.column_slice(0, 1..10).len(), 2);
        assert!(df.column_slice(9, 0..2).is_empty());
    }
}
