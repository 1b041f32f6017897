//! Row predicates built from classified columns.

use std::collections::HashSet;

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use super::constraint::Constraint;
use crate::error::{MdverseError, Result};
use crate::inference::parse_iso_date;
use crate::input::DataTable;
use crate::schema::{ColumnKind, ColumnProfile};

/// Boolean test over one column of a row.
///
/// An inactive predicate is the "no filtering" case: it accepts every row,
/// null cells included. An active one rejects null cells.
#[derive(Debug, Clone)]
pub struct Predicate {
    column: String,
    position: usize,
    test: Test,
}

#[derive(Debug, Clone)]
enum Test {
    Always,
    OneOf(HashSet<String>),
    Between(f64, f64),
    DateRange(NaiveDate, NaiveDate),
    Contains(Regex),
}

impl Predicate {
    /// Column the predicate reads.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Whether this predicate can reject anything.
    pub fn is_active(&self) -> bool {
        !matches!(self.test, Test::Always)
    }

    /// Evaluate against a full row of the joined table.
    pub fn evaluate(&self, row: &[String]) -> bool {
        if !self.is_active() {
            return true;
        }
        match row.get(self.position).map(|v| v.trim()) {
            Some(value) if !DataTable::is_null_value(value) => self.test.matches(value),
            _ => false,
        }
    }
}

impl Test {
    fn matches(&self, value: &str) -> bool {
        match self {
            Test::Always => true,
            Test::OneOf(allowed) => allowed.contains(value),
            Test::Between(lo, hi) => value
                .parse::<f64>()
                .map(|v| *lo <= v && v <= *hi)
                .unwrap_or(false),
            Test::DateRange(start, end) => parse_iso_date(value)
                .map(|d| *start <= d && d <= *end)
                .unwrap_or(false),
            Test::Contains(re) => re.is_match(value),
        }
    }
}

/// Build the predicate for a profiled column and a user constraint.
///
/// Numeric and temporal bounds are clamped to the observed range; a constraint
/// equal to the column's default yields an inactive predicate.
pub fn build(profile: &ColumnProfile, constraint: &Constraint) -> Result<Predicate> {
    let mismatch = || MdverseError::InvalidConstraint {
        column: profile.name.clone(),
        message: format!(
            "a {} constraint does not apply to a {} column",
            constraint.kind(),
            profile.kind
        ),
    };

    let test = match (profile.kind, constraint) {
        (ColumnKind::Categorical, Constraint::OneOf { values }) => {
            if profile.distinct_values.iter().all(|v| values.contains(v)) {
                Test::Always
            } else {
                Test::OneOf(values.iter().map(|v| v.trim().to_string()).collect())
            }
        }
        (ColumnKind::Numeric, Constraint::Between { min, max })
            if min.iter().chain(max.iter()).any(|v| !v.is_finite()) =>
        {
            return Err(MdverseError::InvalidConstraint {
                column: profile.name.clone(),
                message: "numeric bounds must be finite".to_string(),
            });
        }
        (ColumnKind::Numeric, Constraint::Between { min, max }) => match profile.numeric_range {
            Some((observed_lo, observed_hi)) => {
                let (lo, hi) = ordered(
                    min.unwrap_or(observed_lo),
                    max.unwrap_or(observed_hi),
                );
                let lo = lo.clamp(observed_lo, observed_hi);
                let hi = hi.clamp(observed_lo, observed_hi);
                if lo <= observed_lo && hi >= observed_hi {
                    Test::Always
                } else {
                    Test::Between(lo, hi)
                }
            }
            None => Test::Always,
        },
        (ColumnKind::Temporal, Constraint::DateRange { start, end }) => match profile.date_range {
            Some((observed_start, observed_end)) => {
                let (lo, hi) = ordered(
                    start.unwrap_or(observed_start),
                    end.unwrap_or(observed_end),
                );
                let lo = lo.clamp(observed_start, observed_end);
                let hi = hi.clamp(observed_start, observed_end);
                if lo <= observed_start && hi >= observed_end {
                    Test::Always
                } else {
                    Test::DateRange(lo, hi)
                }
            }
            None => Test::Always,
        },
        (ColumnKind::FreeText, Constraint::Contains { text }) => {
            if text.is_empty() {
                Test::Always
            } else {
                let re = RegexBuilder::new(&regex::escape(text))
                    .case_insensitive(true)
                    .build()?;
                Test::Contains(re)
            }
        }
        _ => return Err(mismatch()),
    };

    Ok(Predicate {
        column: profile.name.clone(),
        position: profile.position,
        test,
    })
}

/// True when every active predicate accepts the row.
pub fn all_match(predicates: &[Predicate], row: &[String]) -> bool {
    predicates
        .iter()
        .filter(|p| p.is_active())
        .all(|p| p.evaluate(row))
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}
