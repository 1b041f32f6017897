//! Column classification into filter kinds.

use chrono::NaiveDate;
use indexmap::IndexSet;

use super::temporal::parse_iso_date;
use crate::input::DataTable;
use crate::schema::{ColumnKind, ColumnProfile, ColumnType};

/// Default number of distinct values below which a column is categorical.
pub const DEFAULT_CATEGORICAL_THRESHOLD: usize = 10;

/// Assigns each column one of the four filter kinds.
///
/// Rules are checked in order and the first match wins:
/// 1. every non-null value is an ISO-8601 date: temporal;
/// 2. the declared storage type is numeric: numeric;
/// 3. fewer distinct non-null values than the threshold: categorical;
/// 4. otherwise free text.
///
/// A column with no non-null value is categorical with an empty value set.
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    categorical_threshold: usize,
}

impl ColumnClassifier {
    /// Create a classifier with the default threshold.
    pub fn new() -> Self {
        Self {
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
        }
    }

    /// Create a classifier with a custom categorical threshold.
    pub fn with_threshold(categorical_threshold: usize) -> Self {
        Self {
            categorical_threshold,
        }
    }

    /// Get the categorical threshold.
    pub fn categorical_threshold(&self) -> usize {
        self.categorical_threshold
    }

    /// Classify raw cell values given the column's declared storage type.
    pub fn classify<'a>(
        &self,
        values: impl IntoIterator<Item = &'a str>,
        storage: ColumnType,
    ) -> ColumnKind {
        let non_null: Vec<&str> = values
            .into_iter()
            .filter(|v| !DataTable::is_null_value(v))
            .collect();
        self.classify_non_null(&non_null, storage)
    }

    fn classify_non_null(&self, non_null: &[&str], storage: ColumnType) -> ColumnKind {
        if non_null.is_empty() {
            return ColumnKind::Categorical;
        }
        if non_null.iter().all(|v| parse_iso_date(v).is_some()) {
            return ColumnKind::Temporal;
        }
        if storage.is_numeric() {
            return ColumnKind::Numeric;
        }

        let mut distinct: IndexSet<&str> = IndexSet::new();
        for value in non_null {
            distinct.insert(value);
            if distinct.len() >= self.categorical_threshold {
                return ColumnKind::FreeText;
            }
        }
        ColumnKind::Categorical
    }

    /// Profile one column over a subset of rows.
    pub fn profile(&self, table: &DataTable, rows: &[usize], column: usize) -> ColumnProfile {
        let storage = table.column_type(column);
        let values: Vec<&str> = rows
            .iter()
            .map(|&r| table.get(r, column).unwrap_or(""))
            .collect();
        let non_null: Vec<&str> = values
            .iter()
            .copied()
            .filter(|v| !DataTable::is_null_value(v))
            .collect();

        let kind = self.classify_non_null(&non_null, storage);

        let mut distinct: IndexSet<String> = IndexSet::new();
        for value in &non_null {
            distinct.insert(value.to_string());
        }
        let unique_count = distinct.len();

        let numeric_range = match kind {
            ColumnKind::Numeric => {
                observed_range(non_null.iter().filter_map(|v| v.trim().parse::<f64>().ok()))
            }
            _ => None,
        };
        let date_range: Option<(NaiveDate, NaiveDate)> = match kind {
            ColumnKind::Temporal => non_null
                .iter()
                .filter_map(|v| parse_iso_date(v))
                .fold(None, |acc, d| match acc {
                    None => Some((d, d)),
                    Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
                }),
            _ => None,
        };

        ColumnProfile {
            name: table.headers.get(column).cloned().unwrap_or_default(),
            position: column,
            storage,
            kind,
            count: values.len(),
            null_count: values.len() - non_null.len(),
            distinct_values: if kind == ColumnKind::Categorical {
                distinct
            } else {
                IndexSet::new()
            },
            unique_count,
            numeric_range,
            date_range,
        }
    }

    /// Profile every column of a table over a subset of rows.
    pub fn profile_all(&self, table: &DataTable, rows: &[usize]) -> Vec<ColumnProfile> {
        (0..table.column_count())
            .map(|column| self.profile(table, rows, column))
            .collect()
    }
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn observed_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(headers: Vec<&str>, types: Vec<ColumnType>, rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::with_types(
            "test",
            headers.into_iter().map(String::from).collect(),
            types,
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_temporal_wins_first() {
        let classifier = ColumnClassifier::new();
        let kind = classifier.classify(["2020-01-01", "2021-06-30", ""], ColumnType::String);
        assert_eq!(kind, ColumnKind::Temporal);
    }

    #[test]
    fn test_numeric_storage_beats_low_cardinality() {
        let classifier = ColumnClassifier::new();
        let kind = classifier.classify(["1", "2", "1"], ColumnType::Integer);
        assert_eq!(kind, ColumnKind::Numeric);
    }

    #[test]
    fn test_categorical_below_threshold() {
        let classifier = ColumnClassifier::new();
        let kind = classifier.classify(["zenodo", "osf", "zenodo"], ColumnType::String);
        assert_eq!(kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_free_text_at_threshold() {
        let classifier = ColumnClassifier::with_threshold(3);
        let kind = classifier.classify(["a", "b", "c"], ColumnType::String);
        assert_eq!(kind, ColumnKind::FreeText);
        let kind = classifier.classify(["a", "b", "a"], ColumnType::String);
        assert_eq!(kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_all_null_is_empty_categorical() {
        let classifier = ColumnClassifier::new();
        assert_eq!(
            classifier.classify(["", "NA"], ColumnType::Float),
            ColumnKind::Categorical
        );

        let table = make_table(vec!["x"], vec![ColumnType::Float], vec![vec![""], vec![""]]);
        let profile = classifier.profile(&table, &[0, 1], 0);
        assert_eq!(profile.kind, ColumnKind::Categorical);
        assert!(profile.distinct_values.is_empty());
        assert_eq!(profile.null_count, 2);
    }

    #[test]
    fn test_profile_numeric_range() {
        let table = make_table(
            vec!["atom_number"],
            vec![ColumnType::Integer],
            vec![vec!["100"], vec!["50000"], vec![""], vec!["1500"]],
        );
        let profile = ColumnClassifier::new().profile(&table, &[0, 1, 2, 3], 0);

        assert_eq!(profile.kind, ColumnKind::Numeric);
        assert_eq!(profile.numeric_range, Some((100.0, 50000.0)));
        assert_eq!(profile.null_count, 1);
    }

    #[test]
    fn test_profile_subset_of_rows() {
        let table = make_table(
            vec!["origin"],
            vec![ColumnType::String],
            vec![vec!["zenodo"], vec!["osf"], vec!["figshare"]],
        );
        let profile = ColumnClassifier::new().profile(&table, &[0, 2], 0);
        let values: Vec<&str> = profile.distinct_values.iter().map(|s| s.as_str()).collect();
        assert_eq!(values, vec!["zenodo", "figshare"]);
    }
}
