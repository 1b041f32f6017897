//! Keyword search over a joined table.

mod result;
mod scope;

pub use result::{QueryStatus, RecordDetail, ResultSet, ResultView};
pub use scope::SearchScope;

use std::sync::Arc;

use tracing::debug;

use crate::input::DataTable;

/// Run a keyword search.
///
/// With `show_all` every row is returned whatever the keyword. Otherwise an
/// empty (or whitespace-only) keyword issues no query, and a non-empty one
/// keeps the rows where any searchable column contains it, ignoring case.
/// Searchable columns absent from the table are skipped.
pub fn search(table: Arc<DataTable>, scope: &SearchScope, keyword: &str, show_all: bool) -> ResultSet {
    if show_all {
        let rows = (0..table.row_count()).collect();
        return ResultSet::matched(table, rows);
    }

    let keyword = keyword.trim();
    if keyword.is_empty() {
        return ResultSet::not_issued(table);
    }

    let needle = keyword.to_lowercase();
    let columns: Vec<usize> = scope
        .searchable
        .iter()
        .filter_map(|c| table.column_index(c))
        .collect();

    let rows: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            columns.iter().any(|&c| {
                row.get(c)
                    .is_some_and(|cell| cell.to_lowercase().contains(&needle))
            })
        })
        .map(|(i, _)| i)
        .collect();

    debug!(table = %table.name, keyword, matches = rows.len(), "keyword search");
    ResultSet::matched(table, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TableKind;

    fn table() -> Arc<DataTable> {
        let rows = [
            ["1", "zenodo", "POPC bilayer", "lipids", ""],
            ["2", "osf", "Protein in water", "GROMACS", "Solvated lysozyme"],
            ["42", "figshare", "Ions", "", "Sodium chloride"],
        ];
        Arc::new(DataTable::new(
            "datasets",
            ["dataset_id", "dataset_origin", "title", "keywords", "description"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        ))
    }

    fn scope() -> SearchScope {
        SearchScope::for_table(TableKind::Datasets)
    }

    #[test]
    fn test_keyword_matches_title() {
        let result = search(table(), &scope(), "popc", false);
        assert_eq!(result.rows(), &[0]);
    }

    #[test]
    fn test_keyword_is_case_insensitive_across_columns() {
        let upper = search(table(), &scope(), "GROMACS", false);
        let lower = search(table(), &scope(), "gromacs", false);
        assert_eq!(upper.rows(), lower.rows());
        assert_eq!(upper.rows(), &[1]);

        assert_eq!(search(table(), &scope(), "SODIUM", false).rows(), &[2]);
        assert_eq!(search(table(), &scope(), "42", false).rows(), &[2]);
    }

    #[test]
    fn test_empty_keyword_is_not_a_query() {
        let result = search(table(), &scope(), "   ", false);
        assert!(result.is_empty_query());
        assert!(result.is_empty());
    }

    #[test]
    fn test_show_all_ignores_keyword() {
        let result = search(table(), &scope(), "nothing matches this", true);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_no_match() {
        let result = search(table(), &scope(), "xtc", false);
        assert!(result.is_no_match());
    }

    #[test]
    fn test_origin_is_not_searched() {
        assert!(search(table(), &scope(), "zenodo", false).is_no_match());
    }
}
