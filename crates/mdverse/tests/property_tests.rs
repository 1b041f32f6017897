//! Property-based tests for search, filtering and browsing.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p mdverse --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p mdverse --test property_tests
//! ```

use std::sync::Arc;

use proptest::prelude::*;

use mdverse::filter::build;
use mdverse::inference::ColumnClassifier;
use mdverse::{
    search, ColumnKind, ColumnType, Constraint, DataTable, SearchScope, SelectionCursor, TableKind,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Short titles mixing case, with the odd empty cell.
fn title() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[A-Za-z ]{0,24}",
        1 => Just(String::new()),
        1 => Just("POPC bilayer".to_string()),
        1 => Just("GROMACS run".to_string()),
    ]
}

/// Atom counts, sometimes missing.
fn atom_number() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (1u32..100_000).prop_map(|n| n.to_string()),
        1 => Just(String::new()),
    ]
}

fn origin() -> impl Strategy<Value = String> {
    prop_oneof![Just("zenodo"), Just("figshare"), Just("osf")].prop_map(|s| s.to_string())
}

/// A structure-file-like table.
fn table() -> impl Strategy<Value = Arc<DataTable>> {
    prop::collection::vec((title(), atom_number(), origin()), 0..40).prop_map(|rows| {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, (title, atoms, origin))| {
                vec![i.to_string(), origin, title, format!("f{}.gro", i), atoms]
            })
            .collect();
        Arc::new(DataTable::with_types(
            "gro",
            ["dataset_id", "dataset_origin", "title", "file_name", "atom_number"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            vec![
                ColumnType::String,
                ColumnType::String,
                ColumnType::String,
                ColumnType::String,
                ColumnType::Integer,
            ],
            rows,
        ))
    })
}

fn scope() -> SearchScope {
    SearchScope::for_table(TableKind::StructureFiles)
}

// =============================================================================
// Search Properties
// =============================================================================

proptest! {
    /// An empty keyword never returns rows, whatever the table.
    #[test]
    fn empty_query_is_always_empty(table in table(), blanks in "[ \t]{0,3}") {
        let result = search(table, &scope(), &blanks, false);
        prop_assert!(result.is_empty());
        prop_assert!(result.is_empty_query());
    }

    /// Keyword case never changes the result.
    #[test]
    fn search_ignores_case(table in table(), keyword in "[a-zA-Z]{1,4}") {
        let upper = search(Arc::clone(&table), &scope(), &keyword.to_uppercase(), false);
        let lower = search(table, &scope(), &keyword.to_lowercase(), false);
        prop_assert_eq!(upper.rows(), lower.rows());
    }

    /// Matches keep table order.
    #[test]
    fn search_preserves_row_order(table in table(), keyword in "[a-z]{1,2}") {
        let result = search(table, &scope(), &keyword, false);
        prop_assert!(result.rows().windows(2).all(|w| w[0] < w[1]));
    }

    /// Show-all returns the whole table regardless of keyword.
    #[test]
    fn show_all_returns_everything(table in table(), keyword in ".{0,8}") {
        let rows = table.row_count();
        let result = search(table, &scope(), &keyword, true);
        prop_assert_eq!(result.len(), rows);
    }
}

// =============================================================================
// Filter Properties
// =============================================================================

proptest! {
    /// Adding a range predicate never grows the result.
    #[test]
    fn range_filter_is_monotone(
        table in table(),
        lo in 0.0f64..100_000.0,
        width in 0.0f64..50_000.0,
    ) {
        let base = search(table, &scope(), "", true);
        let classifier = ColumnClassifier::new();
        let profile = base.profile(&classifier, "atom_number").unwrap();
        prop_assume!(profile.kind == ColumnKind::Numeric);

        let predicate = build(&profile, &Constraint::between(lo, lo + width)).unwrap();
        let narrowed = base.narrow(&[predicate]);
        prop_assert!(narrowed.len() <= base.len());
    }

    /// Stacking a second predicate never grows the result either.
    #[test]
    fn conjunction_is_monotone(table in table(), lo in 0.0f64..100_000.0, text in "[a-z]{0,2}") {
        let base = search(table, &scope(), "", true);
        let classifier = ColumnClassifier::new();

        let atoms = base.profile(&classifier, "atom_number").unwrap();
        prop_assume!(atoms.kind == ColumnKind::Numeric);
        let first = build(&atoms, &Constraint::Between { min: Some(lo), max: None }).unwrap();
        let one = base.narrow(&[first.clone()]);

        let origins = base.profile(&classifier, "dataset_origin").unwrap();
        let second = build(&origins, &Constraint::one_of([text.as_str(), "osf"])).unwrap();
        let two = base.narrow(&[first, second]);

        prop_assert!(two.len() <= one.len());
        prop_assert!(two.rows().iter().all(|r| one.rows().contains(r)));
    }

    /// The default constraint filters nothing.
    #[test]
    fn default_constraint_is_a_no_op(table in table()) {
        let base = search(table, &scope(), "", true);
        let classifier = ColumnClassifier::new();
        for profile in base.profiles(&classifier) {
            let predicate = build(&profile, &profile.default_constraint()).unwrap();
            prop_assert!(!predicate.is_active());
            prop_assert_eq!(base.narrow(&[predicate]).len(), base.len());
        }
    }
}

// =============================================================================
// Classifier Properties
// =============================================================================

proptest! {
    /// Classifying the same values twice gives the same kind.
    #[test]
    fn classification_is_deterministic(values in prop::collection::vec(".{0,12}", 0..30)) {
        let classifier = ColumnClassifier::new();
        for storage in [ColumnType::String, ColumnType::Integer, ColumnType::Date] {
            let first = classifier.classify(values.iter().map(|v| v.as_str()), storage);
            let second = classifier.classify(values.iter().map(|v| v.as_str()), storage);
            prop_assert_eq!(first, second);
        }
    }
}

// =============================================================================
// Cursor Properties
// =============================================================================

#[derive(Debug, Clone)]
enum Step {
    Next,
    Previous,
    First,
    Last,
    Select(usize),
    Clamp(usize),
    Reset,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Next),
        Just(Step::Previous),
        Just(Step::First),
        Just(Step::Last),
        (0usize..20).prop_map(Step::Select),
        (0usize..20).prop_map(Step::Clamp),
        Just(Step::Reset),
    ]
}

proptest! {
    /// The position stays inside the set after any sequence of moves.
    #[test]
    fn cursor_stays_in_range(size in 0usize..20, steps in prop::collection::vec(step(), 0..50)) {
        let mut cursor = SelectionCursor::with_size(size);
        for step in steps {
            match step {
                Step::Next => cursor.next(),
                Step::Previous => cursor.previous(),
                Step::First => cursor.jump_first(),
                Step::Last => cursor.jump_last(),
                Step::Select(p) => cursor.select(p),
                Step::Clamp(n) => cursor.clamp(n),
                Step::Reset => cursor.reset(),
            }
            if cursor.size() > 0 {
                prop_assert!(cursor.position() < cursor.size());
            } else {
                prop_assert_eq!(cursor.position(), 0);
            }
        }
    }
}
