//! Deterministic sample datasets for demos and benchmarks

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::column::Column;
use super::frame::DataFrame;
use super::value::{CellValue, ColumnType};
use crate::grid::format::column_to_letters;

const CATEGORIES: &[&str] = &["red", "green", "blue", "amber", "violet"];
const WORDS: &[&str] = &[
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
];

/// Generate `rows` × `cols` of mixed-type data from a fixed seed.
///
/// Column kinds cycle through float, integer, text, category and datetime,
/// so any dataset with five or more columns contains every type. Roughly
/// one float in twenty is NaN.
pub fn generate(rows: usize, cols: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns = (0..cols)
        .map(|c| sample_column(&mut rng, c, rows))
        .collect();

    // Names are unique and lengths equal by construction
    DataFrame::from_columns(columns).unwrap_or_else(|e| {
        tracing::warn!("Sample generation failed: {}", e);
        DataFrame::empty(rows, cols)
    })
}

fn kind_for(col: usize) -> ColumnType {
    match col % 5 {
        0 => ColumnType::Float,
        1 => ColumnType::Integer,
        2 => ColumnType::Text,
        3 => ColumnType::Category,
        _ => ColumnType::DateTime,
    }
}

fn sample_column(rng: &mut StdRng, col: usize, rows: usize) -> Column {
    let kind = kind_for(col);
    let epoch = NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    let values = (0..rows)
        .map(|_| match kind {
            ColumnType::Float => {
                if rng.gen_ratio(1, 20) {
                    CellValue::Float(f64::NAN)
                } else {
                    // Mix of magnitudes exercises both number formats
                    let scale = [0.01, 1.0, 100.0][rng.gen_range(0..3)];
                    CellValue::Float(rng.gen_range(-1.0..1.0) * scale)
                }
            }
            ColumnType::Integer => CellValue::Int(rng.gen_range(-500..5000)),
            ColumnType::Text => {
                let a = WORDS[rng.gen_range(0..WORDS.len())];
                let b = WORDS[rng.gen_range(0..WORDS.len())];
                CellValue::Text(format!("{} {}", a, b))
            }
            ColumnType::Category => {
                CellValue::Category(CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string())
            }
            ColumnType::DateTime => {
                let minutes = rng.gen_range(0..(3 * 365 * 24 * 60));
                CellValue::DateTime(epoch + Duration::minutes(minutes))
            }
        })
        .collect();

    Column::from_values(column_to_letters(col), kind, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TabularModel;

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(50, 6, 7);
        let b = generate(50, 6, 7);
        for col in 0..6 {
            for row in 0..50 {
                let (va, vb) = (a.get_value(row, col), b.get_value(row, col));
                // NaN != NaN, compare display form instead
                assert_eq!(va.to_plain_string(), vb.to_plain_string());
            }
        }
    }

    #[test]
    fn test_contains_every_type() {
        let df = generate(10, 5, 1);
        assert_eq!(df.row_count(), 10);
        let kinds: Vec<ColumnType> = (0..5).filter_map(|c| df.column_type(c)).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnType::Float,
                ColumnType::Integer,
                ColumnType::Text,
                ColumnType::Category,
                ColumnType::DateTime,
            ]
        );
        assert!(!df.category_values(3).is_empty());
        assert!(matches!(df.get_value(0, 4), CellValue::DateTime(_)));
    }

    #[test]
    fn test_zero_sized() {
        let df = generate(0, 3, 1);
        assert_eq!(df.row_count(), 0);
        assert_eq!(df.column_count(), 3);
    }
}
