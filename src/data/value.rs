//! Cell values and column types
//!
//! Every column declares a [`ColumnType`]; values written into a column are
//! coerced through [`ColumnType::coerce`] so a column never holds a value of
//! a foreign type.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Display/parse format for datetime values with a time component
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Display/parse format for datetime values at midnight
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single value stored in the dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Category(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for `Empty` and for floating point NaN (both render as blank)
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Unformatted string form, used for editing and export.
    ///
    /// Floats keep full precision here; display precision is applied by the
    /// renderer only.
    pub fn to_plain_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) | CellValue::Category(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.is_nan() => String::new(),
            CellValue::Float(f) => f.to_string(),
            CellValue::DateTime(dt) => format_datetime(dt),
        }
    }

    /// Total order used for sorting within a single column.
    ///
    /// Numbers sort before datetimes, datetimes before text. Empty values are
    /// placed by the caller, not here.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        fn rank(v: &CellValue) -> u8 {
            match v {
                CellValue::Int(_) | CellValue::Float(_) => 0,
                CellValue::DateTime(_) => 1,
                CellValue::Text(_) | CellValue::Category(_) => 2,
                CellValue::Empty => 3,
            }
        }

        match (self, other) {
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => match rank(self).cmp(&rank(other)) {
                    Ordering::Equal => self.to_plain_string().cmp(&other.to_plain_string()),
                    ord => ord,
                },
            },
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    #[default]
    Text,
    Integer,
    Float,
    Category,
    DateTime,
}

impl ColumnType {
    /// Whether values of this type are shown right-aligned
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Whether the cell editor uses a free-text entry for this type
    pub fn is_free_text(self) -> bool {
        !matches!(self, ColumnType::Category)
    }

    /// Short label shown in tooltips and logs
    pub fn label(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "int",
            ColumnType::Float => "float",
            ColumnType::Category => "category",
            ColumnType::DateTime => "datetime",
        }
    }

    /// Parse user-entered text into a value of this type.
    ///
    /// Blank input always yields `Empty`. Returns `None` when the text cannot
    /// be coerced.
    pub fn parse(self, text: &str) -> Option<CellValue> {
        let s = text.trim();
        if s.is_empty() {
            return Some(CellValue::Empty);
        }

        match self {
            ColumnType::Text => Some(CellValue::Text(text.to_string())),
            ColumnType::Category => Some(CellValue::Category(s.to_string())),
            ColumnType::Integer => {
                if let Ok(i) = s.parse::<i64>() {
                    return Some(CellValue::Int(i));
                }
                // "3.0" is an acceptable integer, "3.5" is not
                let f = s.parse::<f64>().ok()?;
                integral(f).map(CellValue::Int)
            }
            ColumnType::Float => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(CellValue::Float),
            ColumnType::DateTime => parse_datetime(s).map(CellValue::DateTime),
        }
    }

    /// Coerce an arbitrary value into this type.
    ///
    /// Returns `None` when the value has no representation in this type.
    pub fn coerce(self, value: CellValue) -> Option<CellValue> {
        if value.is_empty() {
            return Some(CellValue::Empty);
        }

        match (self, value) {
            (ColumnType::Text, CellValue::Text(s)) => Some(CellValue::Text(s)),
            (ColumnType::Text, v) => Some(CellValue::Text(v.to_plain_string())),
            (ColumnType::Category, CellValue::Category(s)) => Some(CellValue::Category(s)),
            (ColumnType::Category, v) => Some(CellValue::Category(v.to_plain_string())),
            (ColumnType::Integer, CellValue::Int(i)) => Some(CellValue::Int(i)),
            (ColumnType::Integer, CellValue::Float(f)) => integral(f).map(CellValue::Int),
            (ColumnType::Float, CellValue::Float(f)) => Some(CellValue::Float(f)),
            (ColumnType::Float, CellValue::Int(i)) => Some(CellValue::Float(i as f64)),
            (ColumnType::DateTime, CellValue::DateTime(dt)) => Some(CellValue::DateTime(dt)),
            (kind, CellValue::Text(s)) | (kind, CellValue::Category(s)) => kind.parse(&s),
            _ => None,
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Format a datetime, dropping the time component at midnight
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time() == chrono::NaiveTime::MIN {
        dt.format(DATE_FORMAT).to_string()
    } else {
        dt.format(DATETIME_FORMAT).to_string()
    }
}

/// Parse the ISO-ish datetime spellings accepted by datetime columns
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_column() {
        assert_eq!(ColumnType::Integer.parse("42"), Some(CellValue::Int(42)));
        assert_eq!(ColumnType::Integer.parse(" 7.0 "), Some(CellValue::Int(7)));
        assert_eq!(ColumnType::Integer.parse("7.5"), None);
        assert_eq!(ColumnType::Integer.parse("abc"), None);
        assert_eq!(ColumnType::Integer.parse(""), Some(CellValue::Empty));
    }

    #[test]
    fn test_parse_float_column() {
        assert_eq!(ColumnType::Float.parse("1.5"), Some(CellValue::Float(1.5)));
        assert_eq!(ColumnType::Float.parse("3"), Some(CellValue::Float(3.0)));
        assert_eq!(ColumnType::Float.parse("inf"), None);
        assert_eq!(ColumnType::Float.parse("x1"), None);
    }

    #[test]
    fn test_parse_datetime_column() {
        let parsed = ColumnType::DateTime.parse("2024-03-01").unwrap();
        assert_eq!(parsed.to_plain_string(), "2024-03-01");

        let parsed = ColumnType::DateTime.parse("2024-03-01 12:30").unwrap();
        assert_eq!(parsed.to_plain_string(), "2024-03-01 12:30:00");

        assert_eq!(ColumnType::DateTime.parse("yesterday"), None);
    }

    #[test]
    fn test_coerce_across_types() {
        assert_eq!(
            ColumnType::Float.coerce(CellValue::Int(2)),
            Some(CellValue::Float(2.0))
        );
        assert_eq!(
            ColumnType::Integer.coerce(CellValue::Float(2.0)),
            Some(CellValue::Int(2))
        );
        assert_eq!(ColumnType::Integer.coerce(CellValue::Float(2.5)), None);
        assert_eq!(
            ColumnType::Text.coerce(CellValue::Int(9)),
            Some(CellValue::Text("9".to_string()))
        );
        assert_eq!(
            ColumnType::Integer.coerce(CellValue::Text("12".to_string())),
            Some(CellValue::Int(12))
        );
    }

    #[test]
    fn test_nan_is_empty() {
        assert!(CellValue::Float(f64::NAN).is_empty());
        assert_eq!(CellValue::Float(f64::NAN).to_plain_string(), "");
        assert!(!CellValue::Float(0.0).is_empty());
    }

    #[test]
    fn test_sort_cmp_mixed() {
        let a = CellValue::Int(3);
        let b = CellValue::Float(2.5);
        assert_eq!(a.sort_cmp(&b), Ordering::Greater);

        let text = CellValue::Text("a".to_string());
        assert_eq!(b.sort_cmp(&text), Ordering::Less);
    }
}
