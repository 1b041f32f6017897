//! Immutable result sets and their projections.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{MdverseError, Result};
use crate::filter::{all_match, Predicate};
use crate::inference::ColumnClassifier;
use crate::input::DataTable;
use crate::schema::{ColumnProfile, DisplaySchema};

/// Whether a query was issued at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Empty keyword without show-all: nothing was searched.
    NotIssued,
    /// A query ran; the rows are its matches (possibly none).
    Matched,
}

/// Ordered snapshot of rows drawn from a joined table.
///
/// Narrowing, selecting and sorting return new sets; the table is shared
/// and never modified.
#[derive(Debug, Clone)]
pub struct ResultSet {
    table: Arc<DataTable>,
    rows: Vec<usize>,
    status: QueryStatus,
}

impl ResultSet {
    /// Result of a query that was never issued.
    pub fn not_issued(table: Arc<DataTable>) -> Self {
        Self {
            table,
            rows: Vec::new(),
            status: QueryStatus::NotIssued,
        }
    }

    /// Result of a query over the given row indices.
    pub fn matched(table: Arc<DataTable>, rows: Vec<usize>) -> Self {
        Self {
            table,
            rows,
            status: QueryStatus::Matched,
        }
    }

    /// Table the rows belong to.
    pub fn table(&self) -> &Arc<DataTable> {
        &self.table
    }

    /// Row indices into the table, in result order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// No query was issued yet.
    pub fn is_empty_query(&self) -> bool {
        self.status == QueryStatus::NotIssued
    }

    /// A query was issued and matched nothing.
    pub fn is_no_match(&self) -> bool {
        self.status == QueryStatus::Matched && self.rows.is_empty()
    }

    /// Full underlying row at a result position.
    pub fn row(&self, position: usize) -> Option<&[String]> {
        let index = *self.rows.get(position)?;
        self.table.rows.get(index).map(|r| r.as_slice())
    }

    /// Cell of a named column at a result position.
    pub fn value(&self, position: usize, column: &str) -> Option<&str> {
        let col = self.table.column_index(column)?;
        self.row(position)?.get(col).map(|s| s.as_str())
    }

    /// Keep only rows every active predicate accepts.
    pub fn narrow(&self, predicates: &[Predicate]) -> ResultSet {
        if !predicates.iter().any(|p| p.is_active()) {
            return self.clone();
        }
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&r| all_match(predicates, &self.table.rows[r]))
            .collect();
        Self {
            table: Arc::clone(&self.table),
            rows,
            status: self.status,
        }
    }

    /// Subset at the given result positions, in result order.
    ///
    /// Out-of-range and repeated positions are ignored.
    pub fn select(&self, positions: &[usize]) -> ResultSet {
        let wanted: HashSet<usize> = positions.iter().copied().collect();
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(pos, _)| wanted.contains(pos))
            .map(|(_, &r)| r)
            .collect();
        Self {
            table: Arc::clone(&self.table),
            rows,
            status: self.status,
        }
    }

    /// Profile every column over the rows of this set.
    pub fn profiles(&self, classifier: &ColumnClassifier) -> Vec<ColumnProfile> {
        classifier.profile_all(&self.table, &self.rows)
    }

    /// Profile one column by name.
    pub fn profile(&self, classifier: &ColumnClassifier, column: &str) -> Result<ColumnProfile> {
        let col = self.require_column(column)?;
        Ok(classifier.profile(&self.table, &self.rows, col))
    }

    /// Project onto a display schema.
    pub fn project(&self, schema: &DisplaySchema) -> Result<ResultView> {
        let positions = schema
            .columns
            .iter()
            .map(|c| self.require_column(&c.source))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|&r| {
                let row = &self.table.rows[r];
                positions
                    .iter()
                    .map(|&c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(ResultView {
            headers: schema.columns.iter().map(|c| c.label.clone()).collect(),
            rows,
        })
    }

    /// Detail panel of the row at a result position.
    pub fn detail(&self, position: usize) -> Option<RecordDetail> {
        self.rows.get(position)?;
        let field = |column: &str| self.value(position, column).unwrap_or("").to_string();
        Some(RecordDetail {
            dataset: field("dataset_origin"),
            id: field("dataset_id"),
            url: field("dataset_url"),
            creation_date: field("date_creation"),
            authors: field("author"),
            title: field("title"),
            description: field("description"),
        })
    }

    /// Stable re-sort on one column.
    ///
    /// Numeric columns compare as numbers. Null cells go last in both
    /// directions.
    pub fn sorted_by(&self, column: &str, descending: bool) -> Result<ResultSet> {
        let col = self.require_column(column)?;
        let numeric = self.table.column_type(col).is_numeric();
        let table = &self.table;

        let mut rows = self.rows.clone();
        rows.sort_by(|&a, &b| {
            let (a, b) = match (table.cell(a, col), table.cell(b, col)) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Greater,
                (Some(_), None) => return Ordering::Less,
                (Some(a), Some(b)) => (a, b),
            };
            let ord = if numeric {
                match (a.parse::<f64>(), b.parse::<f64>()) {
                    (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                    _ => a.cmp(b),
                }
            } else {
                a.cmp(b)
            };
            if descending { ord.reverse() } else { ord }
        });

        Ok(Self {
            table: Arc::clone(&self.table),
            rows,
            status: self.status,
        })
    }

    fn require_column(&self, column: &str) -> Result<usize> {
        self.table
            .column_index(column)
            .ok_or_else(|| MdverseError::MissingColumn {
                table: self.table.name.clone(),
                column: column.to_string(),
            })
    }
}

/// Labelled, projected rows ready for rendering or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Summary of one record, as shown next to the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDetail {
    pub dataset: String,
    pub id: String,
    pub url: String,
    pub creation_date: String,
    pub authors: String,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{build, Constraint};
    use crate::schema::ColumnType;

    fn table() -> Arc<DataTable> {
        let rows = [
            ["1", "zenodo", "POPC bilayer", "1200", "https://zenodo.org/record/1"],
            ["2", "osf", "Protein in water", "", "https://osf.io/2"],
            ["3", "figshare", "DPPC vesicle", "300", "https://figshare.com/3"],
        ];
        Arc::new(DataTable::with_types(
            "datasets",
            ["dataset_id", "dataset_origin", "title", "file_number", "dataset_url"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            vec![
                ColumnType::String,
                ColumnType::String,
                ColumnType::String,
                ColumnType::Integer,
                ColumnType::String,
            ],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        ))
    }

    #[test]
    fn test_status_distinguishes_empty_query_from_no_match() {
        let none = ResultSet::not_issued(table());
        assert!(none.is_empty_query());
        assert!(!none.is_no_match());

        let zero = ResultSet::matched(table(), Vec::new());
        assert!(zero.is_no_match());
        assert!(!zero.is_empty_query());
    }

    #[test]
    fn test_narrow_and_select() {
        let all = ResultSet::matched(table(), vec![0, 1, 2]);
        let classifier = ColumnClassifier::new();
        let profile = all.profile(&classifier, "file_number").unwrap();
        let predicate = build(&profile, &Constraint::between(1000.0, 2000.0)).unwrap();

        let narrowed = all.narrow(&[predicate]);
        assert_eq!(narrowed.rows(), &[0]);

        let picked = all.select(&[2, 0, 0, 7]);
        assert_eq!(picked.rows(), &[0, 2]);
    }

    #[test]
    fn test_project_and_detail() {
        let set = ResultSet::matched(table(), vec![2]);
        let schema = DisplaySchema::new(&[("dataset_origin", "Dataset"), ("title", "Title")]);
        let view = set.project(&schema).unwrap();
        assert_eq!(view.headers, vec!["Dataset", "Title"]);
        assert_eq!(view.rows, vec![vec!["figshare", "DPPC vesicle"]]);

        let detail = set.detail(0).unwrap();
        assert_eq!(detail.id, "3");
        assert_eq!(detail.url, "https://figshare.com/3");
        assert_eq!(detail.authors, "");
        assert!(set.detail(1).is_none());

        let missing = DisplaySchema::new(&[("barostat", "Barostat")]);
        assert!(set.project(&missing).is_err());
    }

    #[test]
    fn test_sorted_by_is_numeric_aware_with_nulls_last() {
        let set = ResultSet::matched(table(), vec![0, 1, 2]);
        assert_eq!(set.sorted_by("file_number", false).unwrap().rows(), &[2, 0, 1]);
        assert_eq!(set.sorted_by("file_number", true).unwrap().rows(), &[0, 2, 1]);
        assert_eq!(set.sorted_by("title", false).unwrap().rows(), &[2, 0, 1]);
    }
}
