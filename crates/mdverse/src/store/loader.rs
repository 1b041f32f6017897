//! Builds the joined tables from the per-repository metadata files.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::StoreConfig;
use super::join::{concat, join, Cardinality, JoinHow};
use super::repository::{Repository, TableKind, DATASET_ORIGIN, KEY_COLUMNS};
use crate::error::{IngestionError, Result};
use crate::export;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::schema::{parse_integer, ColumnType};

/// A non-key cell that did not parse as its column's type.
///
/// The cell is nulled and the row kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// Table the cell belongs to.
    pub table: String,
    /// Zero-based data row (header excluded).
    pub row: usize,
    /// Column name.
    pub column: String,
    /// The rejected cell text.
    pub value: String,
    /// Type the column is declared as.
    pub expected: ColumnType,
}

/// The three read-only tables every search runs against.
#[derive(Debug, Clone)]
pub struct JoinedTables {
    /// One row per dataset, all repositories concatenated.
    pub datasets: Arc<DataTable>,
    /// Structure files left-joined with their dataset.
    pub structure_files: Arc<DataTable>,
    /// Parameter files left-joined with their dataset.
    pub parameter_files: Arc<DataTable>,
    /// Cells nulled during ingestion.
    pub warnings: Vec<ParseWarning>,
    /// Every file that was read.
    pub sources: Vec<SourceMetadata>,
}

impl JoinedTables {
    /// Assemble from already joined tables.
    pub fn new(datasets: DataTable, structure_files: DataTable, parameter_files: DataTable) -> Self {
        Self {
            datasets: Arc::new(datasets),
            structure_files: Arc::new(structure_files),
            parameter_files: Arc::new(parameter_files),
            warnings: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Get one of the tables.
    pub fn table(&self, kind: TableKind) -> &Arc<DataTable> {
        match kind {
            TableKind::Datasets => &self.datasets,
            TableKind::StructureFiles => &self.structure_files,
            TableKind::ParameterFiles => &self.parameter_files,
        }
    }
}

/// Reads, validates and joins the repository metadata files.
pub struct RecordStore {
    config: StoreConfig,
    parser: Parser,
}

impl RecordStore {
    /// Create a record store with the default parser.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_parser(config, ParserConfig::default())
    }

    /// Create a record store with a custom parser configuration.
    pub fn with_parser(config: StoreConfig, parser: ParserConfig) -> Self {
        Self {
            config,
            parser: Parser::with_config(parser),
        }
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Build the joined tables.
    ///
    /// Any cardinality violation or bad key aborts the load. Unparsable
    /// non-key cells are nulled and reported as warnings.
    pub fn load(&self) -> Result<JoinedTables> {
        let mut warnings = Vec::new();
        let mut sources = Vec::new();

        let mut per_repository = Vec::with_capacity(self.config.repositories.len());
        for repo in &self.config.repositories {
            let descriptive = self.read(&repo.datasets, &mut sources, &mut warnings)?;
            let texts = self.read(&repo.texts, &mut sources, &mut warnings)?;
            let merged = join(
                &descriptive,
                &texts,
                &KEY_COLUMNS,
                JoinHow::Inner,
                Cardinality::ManyToOne,
            )?;
            if merged.row_count() < descriptive.row_count() {
                warn!(
                    repository = %repo.origin,
                    dropped = descriptive.row_count() - merged.row_count(),
                    "datasets without a free-text record were dropped"
                );
            }
            info!(repository = %repo.origin, datasets = merged.row_count(), "merged repository tables");
            per_repository.push(merged);
        }
        let datasets = concat("datasets", &per_repository);

        let structure = self.read(&self.config.structure_files, &mut sources, &mut warnings)?;
        let structure_files = self.attach(&structure, &datasets, "structure_files")?;

        let parameter = self.read(&self.config.parameter_files, &mut sources, &mut warnings)?;
        let parameter_files = self.attach(&parameter, &datasets, "parameter_files")?;

        if !warnings.is_empty() {
            warn!(count = warnings.len(), "cells could not be parsed and were treated as missing");
        }
        info!(
            datasets = datasets.row_count(),
            structure_files = structure_files.row_count(),
            parameter_files = parameter_files.row_count(),
            "record store loaded"
        );

        let tables = JoinedTables {
            datasets: Arc::new(datasets),
            structure_files: Arc::new(structure_files),
            parameter_files: Arc::new(parameter_files),
            warnings,
            sources,
        };

        if let Some(dir) = &self.config.debug_dump_dir {
            self.dump(&tables, dir)?;
        }

        Ok(tables)
    }

    /// Read one file and bring it into canonical form.
    fn read(
        &self,
        path: &Path,
        sources: &mut Vec<SourceMetadata>,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<DataTable> {
        let path = self.config.resolve(path);
        let (mut table, metadata) = self.parser.parse_file(&path)?;
        debug!(file = %metadata.file, rows = metadata.row_count, hash = %metadata.hash, "read metadata file");
        sources.push(metadata);

        self.prepare(&mut table, warnings)?;
        Ok(table)
    }

    /// Validate keys, normalize nulls and coerce typed columns.
    fn prepare(&self, table: &mut DataTable, warnings: &mut Vec<ParseWarning>) -> Result<()> {
        let mut key_positions = Vec::with_capacity(KEY_COLUMNS.len());
        for key in KEY_COLUMNS {
            let position = table.column_index(key).ok_or_else(|| IngestionError::MissingKeyColumn {
                table: table.name.clone(),
                column: key.to_string(),
            })?;
            key_positions.push(position);
        }

        for row in &mut table.rows {
            for cell in row.iter_mut() {
                if DataTable::is_null_value(cell) {
                    cell.clear();
                }
            }
        }

        for (row_idx, row) in table.rows.iter_mut().enumerate() {
            for (&position, key) in key_positions.iter().zip(KEY_COLUMNS) {
                let cell = &mut row[position];
                if cell.is_empty() {
                    return Err(IngestionError::NullKey {
                        table: table.name.clone(),
                        row: row_idx,
                        column: key.to_string(),
                    }
                    .into());
                }
                *cell = cell.trim().to_string();
                if key == DATASET_ORIGIN {
                    let origin: Repository = cell.parse().map_err(|_| IngestionError::UnknownOrigin {
                        table: table.name.clone(),
                        row: row_idx,
                        value: cell.clone(),
                    })?;
                    *cell = origin.as_str().to_string();
                }
            }
        }

        let mut column_types = Vec::with_capacity(table.column_count());
        for (col, header) in table.headers.iter().enumerate() {
            let ty = match self.config.declared_type(header) {
                Some(ty) => ty,
                None => ColumnType::infer(
                    table
                        .rows
                        .iter()
                        .map(|r| r[col].as_str())
                        .filter(|v| !v.is_empty()),
                ),
            };
            column_types.push(ty);
        }

        for (col, &ty) in column_types.iter().enumerate() {
            if key_positions.contains(&col) {
                continue;
            }
            for (row_idx, row) in table.rows.iter_mut().enumerate() {
                let cell = &mut row[col];
                if cell.is_empty() {
                    continue;
                }
                if ty.accepts(cell) {
                    if ty == ColumnType::Integer {
                        if let Some(n) = parse_integer(cell) {
                            *cell = n.to_string();
                        }
                    }
                    continue;
                }
                let warning = ParseWarning {
                    table: table.name.clone(),
                    row: row_idx,
                    column: table.headers[col].clone(),
                    value: std::mem::take(cell),
                    expected: ty,
                };
                warn!(
                    table = %warning.table,
                    row = warning.row,
                    column = %warning.column,
                    value = %warning.value,
                    expected = %warning.expected,
                    "unparsable cell treated as missing"
                );
                warnings.push(warning);
            }
        }
        table.column_types = column_types;

        Ok(())
    }

    /// Left-join a file table onto the datasets table.
    fn attach(&self, files: &DataTable, datasets: &DataTable, name: &str) -> Result<DataTable> {
        let mut joined = join(
            files,
            datasets,
            &KEY_COLUMNS,
            JoinHow::Left,
            Cardinality::ManyToOne,
        )?;
        joined.name = name.to_string();

        if datasets.column_count() > KEY_COLUMNS.len() {
            let first_dataset_column = files.column_count();
            let orphans = joined
                .rows
                .iter()
                .filter(|r| r[first_dataset_column..].iter().all(|c| c.is_empty()))
                .count();
            if orphans > 0 {
                warn!(table = name, orphans, "files reference datasets that were not found");
            }
        }
        debug_assert_eq!(joined.row_count(), files.row_count());

        info!(table = name, rows = joined.row_count(), "joined files with datasets");
        Ok(joined)
    }

    fn dump(&self, tables: &JoinedTables, dir: &Path) -> Result<()> {
        for kind in TableKind::ALL {
            let table = tables.table(kind);
            let path = dir.join(format!("{}.tsv", table.name));
            export::write_table_file(table, &path)?;
            debug!(path = %path.display(), "wrote debug dump");
        }
        Ok(())
    }
}
