//! Per-column profile used to build filters.

use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::types::{ColumnKind, ColumnType};
use crate::filter::Constraint;

/// What a collaborator needs to know about a column before filtering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name in the joined table.
    pub name: String,
    /// Zero-based position in the joined table.
    pub position: usize,
    /// Declared storage type.
    pub storage: ColumnType,
    /// Semantic kind assigned by the classifier.
    pub kind: ColumnKind,
    /// Number of rows profiled (including nulls).
    pub count: usize,
    /// Number of null cells.
    pub null_count: usize,
    /// Distinct non-null values in first-seen order.
    ///
    /// Only filled for categorical columns.
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub distinct_values: IndexSet<String>,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    /// Observed numeric range for numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_range: Option<(f64, f64)>,
    /// Observed date range for temporal columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl ColumnProfile {
    /// The constraint that filters nothing out.
    pub fn default_constraint(&self) -> Constraint {
        match self.kind {
            ColumnKind::Categorical => Constraint::OneOf {
                values: self.distinct_values.clone(),
            },
            ColumnKind::Numeric => Constraint::Between {
                min: self.numeric_range.map(|(lo, _)| lo),
                max: self.numeric_range.map(|(_, hi)| hi),
            },
            ColumnKind::Temporal => Constraint::DateRange {
                start: self.date_range.map(|(lo, _)| lo),
                end: self.date_range.map(|(_, hi)| hi),
            },
            ColumnKind::FreeText => Constraint::Contains {
                text: String::new(),
            },
        }
    }

    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.count as f64) * 100.0
        }
    }
}
