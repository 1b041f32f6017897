//! Source repositories and the joined tables built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MdverseError;

/// Column holding the dataset identifier within its repository.
pub const DATASET_ID: &str = "dataset_id";
/// Column holding the repository a dataset comes from.
pub const DATASET_ORIGIN: &str = "dataset_origin";
/// Composite key shared by every metadata table.
pub const KEY_COLUMNS: [&str; 2] = [DATASET_ID, DATASET_ORIGIN];

/// A repository MD datasets are harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repository {
    Zenodo,
    Figshare,
    Osf,
}

impl Repository {
    /// All repositories, in declaration order.
    pub const ALL: [Repository; 3] = [Repository::Zenodo, Repository::Figshare, Repository::Osf];

    /// Name as written in `dataset_origin` cells and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Repository::Zenodo => "zenodo",
            Repository::Figshare => "figshare",
            Repository::Osf => "osf",
        }
    }
}

impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zenodo" => Ok(Repository::Zenodo),
            "figshare" => Ok(Repository::Figshare),
            "osf" => Ok(Repository::Osf),
            _ => Err(format!("Unknown repository: {}", s)),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which joined table a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// One row per dataset.
    Datasets,
    /// One row per structure file (`.gro`), with its dataset's columns.
    StructureFiles,
    /// One row per parameter file (`.mdp`), with its dataset's columns.
    ParameterFiles,
}

impl TableKind {
    /// All tables.
    pub const ALL: [TableKind; 3] = [
        TableKind::Datasets,
        TableKind::StructureFiles,
        TableKind::ParameterFiles,
    ];

    /// Short name used on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            TableKind::Datasets => "datasets",
            TableKind::StructureFiles => "gro",
            TableKind::ParameterFiles => "mdp",
        }
    }
}

impl FromStr for TableKind {
    type Err = MdverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "datasets" | "dataset" => Ok(TableKind::Datasets),
            "gro" | "structure" | "structure_files" => Ok(TableKind::StructureFiles),
            "mdp" | "parameter" | "parameter_files" => Ok(TableKind::ParameterFiles),
            _ => Err(MdverseError::UnknownTable(s.to_string())),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_from_str() {
        assert_eq!("Zenodo".parse::<Repository>(), Ok(Repository::Zenodo));
        assert_eq!(" osf ".parse::<Repository>(), Ok(Repository::Osf));
        assert!("dryad".parse::<Repository>().is_err());
    }

    #[test]
    fn test_table_kind_from_str() {
        assert_eq!("gro".parse::<TableKind>().unwrap(), TableKind::StructureFiles);
        assert_eq!("parameter-files".parse::<TableKind>().unwrap(), TableKind::ParameterFiles);
        assert!("xtc".parse::<TableKind>().is_err());
    }
}
