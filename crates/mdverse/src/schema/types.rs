//! Core type definitions for column storage and semantic kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inference::parse_iso_date;

/// Declared storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text/string values.
    String,
    /// Boolean values (true/false).
    Boolean,
    /// Date only (no time component).
    Date,
    /// Date and time values.
    DateTime,
    /// Unable to determine type.
    #[default]
    Unknown,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Check whether a non-null cell is a valid value of this type.
    pub fn accepts(&self, value: &str) -> bool {
        let trimmed = value.trim();
        match self {
            ColumnType::Integer => parse_integer(trimmed).is_some(),
            ColumnType::Float => trimmed.parse::<f64>().is_ok(),
            ColumnType::Boolean => parse_bool(trimmed).is_some(),
            ColumnType::Date | ColumnType::DateTime => parse_iso_date(trimmed).is_some(),
            ColumnType::String | ColumnType::Unknown => true,
        }
    }

    /// Infer a storage type from non-null cells, the way a dataframe reader would.
    ///
    /// Every value must fit; a single stray string makes the column `String`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnType {
        let mut all_int = true;
        let mut all_float = true;
        let mut all_bool = true;
        let mut seen = false;

        for value in values {
            seen = true;
            let trimmed = value.trim();
            if all_int && trimmed.parse::<i64>().is_err() {
                all_int = false;
            }
            if all_float && trimmed.parse::<f64>().is_err() {
                all_float = false;
            }
            if all_bool && parse_bool(trimmed).is_none() {
                all_bool = false;
            }
            if !all_int && !all_float && !all_bool {
                return ColumnType::String;
            }
        }

        if !seen {
            ColumnType::Unknown
        } else if all_int {
            ColumnType::Integer
        } else if all_float {
            ColumnType::Float
        } else if all_bool {
            ColumnType::Boolean
        } else {
            ColumnType::String
        }
    }

    /// Common type of a column that appears in several concatenated tables.
    pub fn unify(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Unknown, b) => b,
            (a, ColumnType::Unknown) => a,
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                ColumnType::Float
            }
            (ColumnType::Date, ColumnType::DateTime) | (ColumnType::DateTime, ColumnType::Date) => {
                ColumnType::DateTime
            }
            _ => ColumnType::String,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Semantic kind of a column, which decides the filter it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Few distinct values; filtered by set membership.
    Categorical,
    /// Numeric storage; filtered by an inclusive range.
    Numeric,
    /// ISO-8601 dates; filtered by an inclusive day range.
    Temporal,
    /// Everything else; filtered by substring.
    FreeText,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Categorical => "categorical",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Temporal => "temporal",
            ColumnKind::FreeText => "free text",
        };
        f.write_str(name)
    }
}

/// Parse an integer cell.
///
/// Integral floats such as `1200.0` are accepted: dataframe writers emit them
/// for integer columns holding missing values.
pub fn parse_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    let f = trimmed.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_storage_type() {
        assert_eq!(ColumnType::infer(["1", "2", "300"]), ColumnType::Integer);
        assert_eq!(ColumnType::infer(["1", "2.5"]), ColumnType::Float);
        assert_eq!(ColumnType::infer(["True", "false"]), ColumnType::Boolean);
        assert_eq!(ColumnType::infer(["1", "abc"]), ColumnType::String);
        assert_eq!(ColumnType::infer(std::iter::empty()), ColumnType::Unknown);
    }

    #[test]
    fn test_accepts() {
        assert!(ColumnType::Integer.accepts(" 42 "));
        assert!(!ColumnType::Integer.accepts("4.2"));
        assert!(ColumnType::Integer.accepts("1200.0"));
        assert!(!ColumnType::Integer.accepts("inf"));
        assert!(!ColumnType::Integer.accepts("NaN"));
        assert!(ColumnType::Float.accepts("4.2"));
        assert!(ColumnType::Date.accepts("2021-03-04"));
        assert!(!ColumnType::Date.accepts("04/03/2021"));
        assert!(ColumnType::String.accepts("anything"));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("1200.0"), Some(1200));
        assert_eq!(parse_integer("-3.00"), Some(-3));
        assert_eq!(parse_integer("1e3"), Some(1000));
        assert_eq!(parse_integer("12.5"), None);
        assert_eq!(parse_integer("lots"), None);
    }

    #[test]
    fn test_unify() {
        assert_eq!(ColumnType::Integer.unify(ColumnType::Float), ColumnType::Float);
        assert_eq!(ColumnType::Unknown.unify(ColumnType::Date), ColumnType::Date);
        assert_eq!(ColumnType::Integer.unify(ColumnType::String), ColumnType::String);
        assert_eq!(ColumnType::Boolean.unify(ColumnType::Boolean), ColumnType::Boolean);
    }
}
