//! CSV import and export using the csv crate
//!
//! RFC 4180 compliant parsing with support for quoted fields, escaped quotes
//! and custom delimiters. The first record is the header row; column types
//! are inferred from the values that follow.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use super::column::Column;
use super::frame::DataFrame;
use super::model::{ModelError, TabularModel};
use super::value::{parse_datetime, CellValue, ColumnType};

/// A column with at most this share of distinct values is read as a category
const CATEGORY_MAX_RATIO: f64 = 0.5;
/// Categories need at least this many rows to be worth detecting
const CATEGORY_MIN_ROWS: usize = 8;

/// Error type for CSV import/export
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("CSV I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV write error: {0}")]
    Write(#[from] csv::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Get the byte for this delimiter
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
            Delimiter::Semicolon => b';',
        }
    }

    /// Detect delimiter from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "tsv" => Some(Delimiter::Tab),
            "psv" => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// Detect delimiter by analyzing first few lines
pub fn detect_delimiter(content: &str) -> Delimiter {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let pipe_count = first_lines.matches('|').count();
    let semi_count = first_lines.matches(';').count();

    let max = comma_count.max(tab_count).max(pipe_count).max(semi_count);

    if max == 0 {
        return Delimiter::Comma;
    }

    if tab_count == max {
        Delimiter::Tab
    } else if pipe_count == max {
        Delimiter::Pipe
    } else if semi_count == max {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Parse CSV text into a dataset, inferring column types
pub fn parse_csv(content: &str, delimiter: Delimiter) -> Result<DataFrame, CsvError> {
    read_csv(content.as_bytes(), delimiter)
}

/// Read CSV from any reader into a dataset
pub fn read_csv<R: Read>(input: R, delimiter: Delimiter) -> Result<DataFrame, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = reader.records().enumerate();

    let header: Vec<String> = match records.next() {
        Some((_, Ok(record))) => record.iter().map(|s| s.trim().to_string()).collect(),
        Some((line_num, Err(e))) => {
            return Err(CsvError::Parse {
                line: line_num + 1,
                message: e.to_string(),
            })
        }
        None => return Ok(DataFrame::default()),
    };

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); header.len()];
    for (line_num, result) in records {
        let record = result.map_err(|e| CsvError::Parse {
            line: line_num + 1,
            message: e.to_string(),
        })?;
        // Ragged rows are padded with blanks; extra fields are dropped
        for (col, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(col).unwrap_or("").to_string());
        }
    }

    let names = unique_names(&header);
    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| {
            let kind = infer_type(&cells);
            let values = cells.iter().map(|s| CellValue::Text(s.clone())).collect();
            Column::from_values(name, kind, values)
        })
        .collect();

    let frame = DataFrame::from_columns(columns)?;
    tracing::info!(
        "Parsed CSV: {} rows x {} columns",
        frame.row_count(),
        frame.column_count()
    );
    Ok(frame)
}

/// Load a CSV/TSV file, picking the delimiter from the extension or content
pub fn load_file(path: &Path) -> Result<DataFrame, CsvError> {
    let content = std::fs::read_to_string(path)?;
    let delimiter = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Delimiter::from_extension)
        .unwrap_or_else(|| detect_delimiter(&content));
    parse_csv(&content, delimiter)
}

/// Write a dataset as CSV, header row first
pub fn write_csv<W: Write>(
    frame: &DataFrame,
    output: W,
    delimiter: Delimiter,
) -> Result<(), CsvError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .from_writer(output);

    writer.write_record(frame.column_names())?;
    for row in 0..frame.row_count() {
        let record: Vec<String> = (0..frame.column_count())
            .map(|col| frame.get_value(row, col).to_plain_string())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save a dataset to disk, picking the delimiter from the extension
pub fn save_file(frame: &DataFrame, path: &Path) -> Result<(), CsvError> {
    let delimiter = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Delimiter::from_extension)
        .unwrap_or_default();
    let file = std::fs::File::create(path)?;
    write_csv(frame, file, delimiter)?;
    tracing::info!("Saved {} rows to {}", frame.row_count(), path.display());
    Ok(())
}

/// Header names must be non-blank and unique.
///
/// Blank headers become `column_{position}`; a repeated name gets the
/// smallest `_{n}` suffix not taken by any header, raw or generated.
fn unique_names(header: &[String]) -> Vec<String> {
    let raw: HashSet<&str> = header.iter().map(String::as_str).collect();
    let mut taken: HashSet<String> = HashSet::new();

    header
        .iter()
        .enumerate()
        .map(|(position, name)| {
            if !name.is_empty() && taken.insert(name.clone()) {
                return name.clone();
            }
            let (base, mut n) = if name.is_empty() {
                ("column", position)
            } else {
                (name.as_str(), 1)
            };
            loop {
                let candidate = format!("{}_{}", base, n);
                // Later headers keep their own names
                if !raw.contains(candidate.as_str()) && taken.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// Pick the narrowest column type every non-blank cell parses as
pub fn infer_type(cells: &[String]) -> ColumnType {
    let filled: Vec<&str> = cells
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if filled.is_empty() {
        return ColumnType::Text;
    }
    if filled.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnType::Integer;
    }
    if filled.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float;
    }
    if filled.iter().all(|s| parse_datetime(s).is_some()) {
        return ColumnType::DateTime;
    }

    let distinct: HashSet<&str> = filled.iter().copied().collect();
    if filled.len() >= CATEGORY_MIN_ROWS
        && (distinct.len() as f64) <= filled.len() as f64 * CATEGORY_MAX_RATIO
    {
        return ColumnType::Category;
    }

    ColumnType::Text
}
