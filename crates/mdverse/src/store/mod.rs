//! Ingestion of the repository metadata files into joined tables.

mod config;
mod join;
mod loader;
mod repository;

pub use config::{default_column_types, RepositorySource, StoreConfig};
pub use join::{concat, join, Cardinality, JoinHow};
pub use loader::{JoinedTables, ParseWarning, RecordStore};
pub use repository::{Repository, TableKind, DATASET_ID, DATASET_ORIGIN, KEY_COLUMNS};
