//! Main Explorer struct and public API.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ExplorerConfig;
use crate::cursor::QueryIdentity;
use crate::error::{MdverseError, Result};
use crate::filter::{build, FilterSpec, Predicate};
use crate::inference::ColumnClassifier;
use crate::schema::ColumnProfile;
use crate::search::{search, ResultSet, SearchScope};
use crate::store::{JoinedTables, RecordStore, TableKind};

/// One search as requested by a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Table to search.
    pub table: TableKind,
    /// Keyword, matched case-insensitively.
    #[serde(default)]
    pub keyword: String,
    /// Return every row regardless of the keyword.
    #[serde(default)]
    pub show_all: bool,
    /// Column constraints, AND-combined.
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl SearchRequest {
    /// Keyword search on a table.
    pub fn new(table: TableKind, keyword: impl Into<String>) -> Self {
        Self {
            table,
            keyword: keyword.into(),
            show_all: false,
            filters: Vec::new(),
        }
    }

    /// Every row of a table.
    pub fn all(table: TableKind) -> Self {
        Self {
            show_all: true,
            ..Self::new(table, "")
        }
    }

    /// Add a column constraint.
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    /// Searchable columns and display layout used.
    pub scope: SearchScope,
    /// Rows matched by the keyword alone.
    pub base_count: usize,
    /// Filterable columns profiled over the keyword matches.
    pub profiles: Vec<ColumnProfile>,
    /// Keyword matches narrowed by the active filters.
    pub result: ResultSet,
    /// Identity for cursor bookkeeping; lists only active filters.
    pub identity: QueryIdentity,
}

/// Search engine over the joined MDverse tables.
///
/// Tables are read-only once loaded. [`Explorer::reload`] swaps in a freshly
/// built set; searches already holding a snapshot finish against the old one.
pub struct Explorer {
    config: ExplorerConfig,
    classifier: ColumnClassifier,
    tables: RwLock<Arc<JoinedTables>>,
}

impl Explorer {
    /// Load the record store and create an explorer.
    pub fn open(config: ExplorerConfig) -> Result<Self> {
        config.validate()?;
        let tables = Self::build_tables(&config)?;
        Ok(Self::with_tables(config, tables))
    }

    /// Create an explorer over tables that are already built.
    pub fn with_tables(config: ExplorerConfig, tables: JoinedTables) -> Self {
        let classifier = ColumnClassifier::with_threshold(config.categorical_threshold);
        Self {
            config,
            classifier,
            tables: RwLock::new(Arc::new(tables)),
        }
    }

    fn build_tables(config: &ExplorerConfig) -> Result<JoinedTables> {
        RecordStore::with_parser(config.store.clone(), config.parser.clone()).load()
    }

    /// Get the configuration.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Get the column classifier.
    pub fn classifier(&self) -> &ColumnClassifier {
        &self.classifier
    }

    /// Current tables.
    pub fn snapshot(&self) -> Arc<JoinedTables> {
        let guard = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Rebuild the tables from the source files and swap them in.
    ///
    /// On failure the previous tables stay in place.
    pub fn reload(&self) -> Result<Arc<JoinedTables>> {
        let fresh = match Self::build_tables(&self.config) {
            Ok(tables) => Arc::new(tables),
            Err(e) => {
                warn!(error = %e, "reload failed; keeping the current tables");
                return Err(e);
            }
        };
        let mut guard = self.tables.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&fresh);
        info!("record store reloaded");
        Ok(fresh)
    }

    /// Run a keyword search and apply the requested filters.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let tables = self.snapshot();
        let table = Arc::clone(tables.table(request.table));
        let scope = SearchScope::for_table(request.table);

        let base = search(table, &scope, &request.keyword, request.show_all);
        let base_count = base.len();

        let profiles: Vec<ColumnProfile> = scope
            .display
            .filterable()
            .filter_map(|c| base.table().column_index(&c.source))
            .map(|col| self.classifier.profile(base.table(), base.rows(), col))
            .collect();

        let mut predicates: Vec<Predicate> = Vec::with_capacity(request.filters.len());
        let mut active: Vec<FilterSpec> = Vec::new();
        if !base.is_empty_query() {
            for spec in &request.filters {
                let (predicate, resolved) = self.predicate_for(&scope, &base, &profiles, spec)?;
                if predicate.is_active() {
                    active.push(resolved);
                    predicates.push(predicate);
                }
            }
        }

        let result = base.narrow(&predicates);
        debug!(
            table = %request.table,
            base = base_count,
            filters = predicates.len(),
            results = result.len(),
            "search evaluated"
        );

        let identity = QueryIdentity::new(request.table, &request.keyword, request.show_all, active);

        Ok(SearchResponse {
            scope,
            base_count,
            profiles,
            result,
            identity,
        })
    }

    fn predicate_for(
        &self,
        scope: &SearchScope,
        base: &ResultSet,
        profiles: &[ColumnProfile],
        spec: &FilterSpec,
    ) -> Result<(Predicate, FilterSpec)> {
        let column = scope.display.resolve(&spec.column);
        if scope.display.unfilterable.iter().any(|c| c == column) {
            return Err(MdverseError::InvalidConstraint {
                column: spec.column.clone(),
                message: "column cannot be filtered".to_string(),
            });
        }

        let profile = match profiles.iter().find(|p| p.name == column) {
            Some(profile) => profile.clone(),
            None => base.profile(&self.classifier, column)?,
        };
        let constraint = spec.resolve(&profile)?;
        let predicate = build(&profile, &constraint)?;
        Ok((predicate, FilterSpec::new(column, constraint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::BrowseSession;
    use crate::filter::Constraint;
    use crate::input::DataTable;

    fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            name,
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn explorer() -> Explorer {
        let datasets = table(
            "datasets",
            &["dataset_id", "dataset_origin", "title", "keywords", "description", "dataset_url"],
            &[
                &["1", "zenodo", "POPC bilayer", "lipid", "", "u1"],
                &["2", "osf", "POPE bilayer", "lipid", "", "u2"],
                &["3", "zenodo", "Protein in water", "", "", "u3"],
            ],
        );
        let empty = table("files", &["dataset_id", "dataset_origin"], &[]);
        let tables = JoinedTables::new(datasets, empty.clone(), empty);
        Explorer::with_tables(ExplorerConfig::default(), tables)
    }

    #[test]
    fn test_search_with_filter_by_label() {
        let request = SearchRequest::new(TableKind::Datasets, "bilayer")
            .with_filter(FilterSpec::text("Dataset", "osf"));
        let response = explorer().search(&request).unwrap();

        assert_eq!(response.base_count, 2);
        assert_eq!(response.result.rows(), &[1]);
        assert_eq!(response.identity.filters.len(), 1);
    }

    #[test]
    fn test_default_filters_are_not_part_of_identity() {
        let request = SearchRequest::new(TableKind::Datasets, "bilayer")
            .with_filter(FilterSpec::new("dataset_origin", Constraint::one_of(["zenodo", "osf"])));
        let response = explorer().search(&request).unwrap();

        assert_eq!(response.result.len(), 2);
        assert!(response.identity.filters.is_empty());
    }

    #[test]
    fn test_equivalent_filters_share_an_identity() {
        let explorer = explorer();
        let by_label = SearchRequest::new(TableKind::Datasets, "bilayer")
            .with_filter(FilterSpec::text("Dataset", "osf"));
        let by_name = SearchRequest::new(TableKind::Datasets, " bilayer ")
            .with_filter(FilterSpec::new("dataset_origin", Constraint::one_of(["osf"])));

        let first = explorer.search(&by_label).unwrap().identity;
        let second = explorer.search(&by_name).unwrap().identity;
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.filters[0].column, "dataset_origin");

        let mut session = BrowseSession::new();
        session.observe(first, 2);
        session.cursor_mut().next();
        session.observe(second, 2);
        assert_eq!(session.cursor().position(), 1);
    }

    #[test]
    fn test_unfilterable_column_is_rejected() {
        let request = SearchRequest::all(TableKind::Datasets).with_filter(FilterSpec::text("ID", "1"));
        assert!(explorer().search(&request).is_err());
    }

    #[test]
    fn test_filters_ignored_without_query() {
        let request = SearchRequest::new(TableKind::Datasets, "")
            .with_filter(FilterSpec::text("Dataset", "osf"));
        let response = explorer().search(&request).unwrap();
        assert!(response.result.is_empty_query());
    }

    #[test]
    fn test_snapshot_survives_reload_failure() {
        let explorer = explorer();
        let before = explorer.snapshot();
        assert!(explorer.reload().is_err());
        assert!(Arc::ptr_eq(&before, &explorer.snapshot()));
    }
}
