//! Where the metadata files live and how their columns are typed.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::repository::{Repository, DATASET_ID, DATASET_ORIGIN};
use crate::schema::ColumnType;

/// The two files harvested from one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySource {
    /// Repository the files come from.
    pub origin: Repository,
    /// Descriptive table: one row per dataset.
    pub datasets: PathBuf,
    /// Free-text table: title, keywords and description per dataset.
    pub texts: PathBuf,
}

impl RepositorySource {
    /// The conventional `{repo}_datasets.tsv` / `{repo}_datasets_text.tsv` pair.
    pub fn standard(origin: Repository) -> Self {
        Self {
            origin,
            datasets: PathBuf::from(format!("{}_datasets.tsv", origin)),
            texts: PathBuf::from(format!("{}_datasets_text.tsv", origin)),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory relative paths are resolved against.
    pub data_dir: PathBuf,
    /// Repositories in concatenation order.
    pub repositories: Vec<RepositorySource>,
    /// Structure-file (`.gro`) table.
    pub structure_files: PathBuf,
    /// Parameter-file (`.mdp`) table.
    pub parameter_files: PathBuf,
    /// Declared storage types; undeclared columns are inferred.
    pub column_types: IndexMap<String, ColumnType>,
    /// Where to write the joined tables for inspection, if anywhere.
    pub debug_dump_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            repositories: Repository::ALL
                .iter()
                .map(|&r| RepositorySource::standard(r))
                .collect(),
            structure_files: PathBuf::from("gromacs_gro_files_info.tsv"),
            parameter_files: PathBuf::from("gromacs_mdp_files_info.tsv"),
            column_types: default_column_types(),
            debug_dump_dir: None,
        }
    }
}

impl StoreConfig {
    /// Default layout under a given data directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Resolve a configured path against the data directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Declared type of a column, if any.
    pub fn declared_type(&self, column: &str) -> Option<ColumnType> {
        if column == DATASET_ID || column == DATASET_ORIGIN {
            return Some(ColumnType::String);
        }
        self.column_types.get(column).copied()
    }
}

/// Storage types of the well-known MDverse columns.
pub fn default_column_types() -> IndexMap<String, ColumnType> {
    [
        ("file_number", ColumnType::Integer),
        ("date_creation", ColumnType::Date),
        ("date_last_modified", ColumnType::Date),
        ("atom_number", ColumnType::Integer),
        ("has_protein", ColumnType::Boolean),
        ("has_nucleic", ColumnType::Boolean),
        ("has_lipid", ColumnType::Boolean),
        ("has_glucid", ColumnType::Boolean),
        ("has_water_ion", ColumnType::Boolean),
        ("dt", ColumnType::Float),
        ("nsteps", ColumnType::Integer),
        ("temperature", ColumnType::Float),
        ("file_size", ColumnType::Integer),
    ]
    .into_iter()
    .map(|(name, ty)| (name.to_string(), ty))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = StoreConfig::with_data_dir("/srv/mdverse");
        assert_eq!(config.repositories.len(), 3);
        assert_eq!(
            config.resolve(&config.repositories[1].texts),
            PathBuf::from("/srv/mdverse/figshare_datasets_text.tsv")
        );
        assert_eq!(config.declared_type("dataset_id"), Some(ColumnType::String));
        assert_eq!(config.declared_type("atom_number"), Some(ColumnType::Integer));
        assert_eq!(config.declared_type("thermostat"), None);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"data_dir": "x"}"#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("x"));
        assert_eq!(config.structure_files, PathBuf::from("gromacs_gro_files_info.tsv"));
    }
}
