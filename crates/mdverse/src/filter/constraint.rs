//! User-supplied column constraints.

use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{MdverseError, Result};
use crate::inference::parse_iso_date;
use crate::schema::{ColumnKind, ColumnProfile};

/// A constraint a user places on one column.
///
/// Open bounds stand for the column's observed bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be one of the allowed values.
    OneOf { values: IndexSet<String> },
    /// Numeric value within an inclusive range.
    Between { min: Option<f64>, max: Option<f64> },
    /// Date within an inclusive day range.
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// Case-insensitive literal substring.
    Contains { text: String },
}

impl Constraint {
    /// Set-membership constraint from any list of values.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Closed numeric range.
    pub fn between(min: f64, max: f64) -> Self {
        Constraint::Between {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Closed date range.
    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Self {
        Constraint::DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Substring constraint.
    pub fn contains(text: impl Into<String>) -> Self {
        Constraint::Contains { text: text.into() }
    }

    /// The column kind this constraint applies to.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Constraint::OneOf { .. } => ColumnKind::Categorical,
            Constraint::Between { .. } => ColumnKind::Numeric,
            Constraint::DateRange { .. } => ColumnKind::Temporal,
            Constraint::Contains { .. } => ColumnKind::FreeText,
        }
    }

    /// Parse the textual constraint syntax for a column of the given kind.
    ///
    /// - categorical: `a,b,c`
    /// - numeric: `lo..hi`, `lo..`, `..hi` or a single value
    /// - temporal: the same with `YYYY-MM-DD` bounds
    /// - free text: the text itself
    pub fn parse(kind: ColumnKind, column: &str, text: &str) -> Result<Self> {
        let invalid = |message: String| MdverseError::InvalidConstraint {
            column: column.to_string(),
            message,
        };

        match kind {
            ColumnKind::Categorical => Ok(Constraint::OneOf {
                values: text
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect(),
            }),
            ColumnKind::Numeric => {
                let (lo, hi) = split_range(text);
                let parse = |s: &str| -> Result<Option<f64>> {
                    if s.is_empty() {
                        return Ok(None);
                    }
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(Some)
                        .ok_or_else(|| invalid(format!("'{}' is not a finite number", s)))
                };
                let min = parse(lo)?;
                let max = parse(hi)?;
                Ok(Constraint::Between { min, max })
            }
            ColumnKind::Temporal => {
                let (lo, hi) = split_range(text);
                let parse = |s: &str| -> Result<Option<NaiveDate>> {
                    if s.is_empty() {
                        return Ok(None);
                    }
                    parse_iso_date(s)
                        .map(Some)
                        .ok_or_else(|| invalid(format!("'{}' is not an ISO-8601 date", s)))
                };
                let start = parse(lo)?;
                let end = parse(hi)?;
                Ok(Constraint::DateRange { start, end })
            }
            ColumnKind::FreeText => Ok(Constraint::Contains {
                text: text.to_string(),
            }),
        }
    }
}

/// Split `lo..hi` into trimmed halves; a lone value is both bounds.
fn split_range(text: &str) -> (&str, &str) {
    match text.split_once("..") {
        Some((lo, hi)) => (lo.trim(), hi.trim()),
        None => (text.trim(), text.trim()),
    }
}

/// A constraint request naming its column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Underlying column name or display label.
    pub column: String,
    /// Typed constraint or text to parse once the column kind is known.
    pub value: FilterValue,
}

/// Constraint as supplied by a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Already typed.
    Constraint(Constraint),
    /// Textual syntax, see [`Constraint::parse`].
    Text(String),
}

impl FilterSpec {
    /// Filter with a typed constraint.
    pub fn new(column: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            column: column.into(),
            value: FilterValue::Constraint(constraint),
        }
    }

    /// Filter with textual syntax.
    pub fn text(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: FilterValue::Text(text.into()),
        }
    }

    /// Parse a `COLUMN=EXPR` argument.
    pub fn parse_arg(arg: &str) -> Result<Self> {
        let (column, expr) = arg.split_once('=').ok_or_else(|| {
            MdverseError::InvalidConstraint {
                column: arg.to_string(),
                message: "expected COLUMN=EXPR".to_string(),
            }
        })?;
        let column = column.trim();
        if column.is_empty() {
            return Err(MdverseError::InvalidConstraint {
                column: arg.to_string(),
                message: "column name is empty".to_string(),
            });
        }
        Ok(Self::text(column, expr))
    }

    /// Turn the requested value into a constraint for the profiled column.
    pub fn resolve(&self, profile: &ColumnProfile) -> Result<Constraint> {
        match &self.value {
            FilterValue::Constraint(c) => Ok(c.clone()),
            FilterValue::Text(text) => Constraint::parse(profile.kind, &profile.name, text),
        }
    }
}
