//! Cell text formatting
//!
//! Converts cell values to display strings and fits them into a column:
//! - Float precision (significant digits below 1, fixed decimals above)
//! - Column letters (A, B, ..., Z, AA, ...)
//! - Width-based truncation using estimated character widths

use crate::data::value::{format_datetime, CellValue};

/// Convert column index to letter(s): 0->A, 1->B, ..., 25->Z, 26->AA, etc.
pub fn column_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Format a float for display.
///
/// Magnitudes below 1 keep `precision` significant digits so small values
/// stay legible (`0.000123` at precision 2 is `0.00012`, not `0.00`).
/// Magnitudes of 1 and above use `precision` fixed decimals.
/// Negative values are bucketed by magnitude, so `-0.5` takes the
/// significant-digit path and `-12.5` the fixed-decimal one.
pub fn format_number(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.abs() >= 1.0 {
        return format!("{:.*}", precision, value);
    }

    let digits = precision.max(1);
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 {
        return format!("{:.*e}", digits - 1, value);
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    // Trailing zeros carry no significant digits
    trim_fraction_zeros(&text)
}

fn trim_fraction_zeros(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Text shown for a cell value; blank for `Empty` and NaN
pub fn display_text(value: &CellValue, precision: usize) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Float(f) => format_number(*f, precision),
        CellValue::Int(i) => i.to_string(),
        CellValue::DateTime(dt) => format_datetime(dt),
        CellValue::Text(s) | CellValue::Category(s) => s.clone(),
    }
}

/// Estimated advance of one character relative to the average glyph width
pub fn char_width_units(ch: char) -> f64 {
    match ch {
        'i' | 'l' | 'j' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | ' ' => 0.5,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 1.5,
        c if is_wide(c) => 2.0,
        _ => 1.0,
    }
}

/// CJK and other double-width ranges
fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x20000..=0x3FFFD)
}

/// Estimated pixel width of `text` given the average glyph width
pub fn estimate_width(text: &str, char_width: f64) -> f64 {
    text.chars().map(char_width_units).sum::<f64>() * char_width
}

/// Cut `text` at the first character whose accumulated estimated width
/// exceeds `max_width`.
pub fn truncate_to_width(text: &str, max_width: f64, char_width: f64) -> &str {
    if max_width <= 0.0 {
        return "";
    }
    let mut used = 0.0;
    for (i, ch) in text.char_indices() {
        used += char_width_units(ch) * char_width;
        if used > max_width {
            return &text[..i];
        }
    }
    text
}
