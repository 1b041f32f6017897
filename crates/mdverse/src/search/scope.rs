//! Per-table searchable columns and display layout.

use serde::{Deserialize, Serialize};

use crate::schema::DisplaySchema;
use crate::store::{TableKind, DATASET_ID};

const COMMON_COLUMNS: [(&str, &str); 6] = [
    ("dataset_origin", "Dataset"),
    ("dataset_id", "ID"),
    ("title", "Title"),
    ("date_creation", "Creation date"),
    ("author", "Authors"),
    ("description", "Description"),
];

const UNFILTERABLE: [&str; 2] = ["dataset_id", "dataset_url"];

const FILE_SEARCHABLE: [&str; 4] = ["title", "file_name", "description", DATASET_ID];

/// What a keyword search looks at and what a caller gets back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchScope {
    /// Table the scope applies to.
    pub kind: TableKind,
    /// Columns a keyword is matched against, OR-combined.
    pub searchable: Vec<String>,
    /// Columns shown to the caller, in order.
    pub display: DisplaySchema,
}

impl SearchScope {
    /// Scope of one of the joined tables.
    pub fn for_table(kind: TableKind) -> Self {
        match kind {
            TableKind::Datasets => Self::datasets(),
            TableKind::StructureFiles => Self::structure_files(),
            TableKind::ParameterFiles => Self::parameter_files(),
        }
    }

    /// Dataset table: matches title, keywords, description and identifier.
    pub fn datasets() -> Self {
        let mut pairs = COMMON_COLUMNS.to_vec();
        pairs.extend([("file_number", "# Files"), ("dataset_url", "URL")]);
        Self::build(
            TableKind::Datasets,
            &["title", "keywords", "description", DATASET_ID],
            &pairs,
        )
    }

    /// Structure-file table.
    pub fn structure_files() -> Self {
        let mut pairs = COMMON_COLUMNS.to_vec();
        pairs.extend([
            ("file_name", "File name"),
            ("atom_number", "Atom number"),
            ("has_protein", "Protein"),
            ("has_lipid", "Lipid"),
            ("has_nucleic", "Nucleic"),
            ("has_glucid", "Glucid"),
            ("has_water_ion", "Water/Ion"),
            ("dataset_url", "URL"),
        ]);
        Self::build(TableKind::StructureFiles, &FILE_SEARCHABLE, &pairs)
    }

    /// Parameter-file table.
    pub fn parameter_files() -> Self {
        let mut pairs = COMMON_COLUMNS.to_vec();
        pairs.extend([
            ("file_name", "File name"),
            ("dt", "Step size"),
            ("nsteps", "# Steps"),
            ("temperature", "Temperature (K)"),
            ("thermostat", "Thermostat"),
            ("barostat", "Barostat"),
            ("dataset_url", "URL"),
        ]);
        Self::build(TableKind::ParameterFiles, &FILE_SEARCHABLE, &pairs)
    }

    fn build(kind: TableKind, searchable: &[&str], pairs: &[(&str, &str)]) -> Self {
        Self {
            kind,
            searchable: searchable.iter().map(|c| c.to_string()).collect(),
            display: DisplaySchema::new(pairs).with_unfilterable(&UNFILTERABLE),
        }
    }
}
