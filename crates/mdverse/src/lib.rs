//! MDverse: keyword search and dynamic filtering over molecular dynamics metadata.
//!
//! Dataset and simulation-file metadata harvested from several repositories is
//! joined once into three read-only tables. Searches run a keyword over a
//! fixed set of free-text columns, then narrow the matches with per-column
//! constraints whose shape follows each column's classified kind.
//!
//! # Core Principles
//!
//! - **Validated ingestion**: joins that break their declared cardinality abort the load
//! - **Non-destructive**: searches and filters never modify the joined tables
//! - **Explicit state**: the browsing cursor is a value owned by the caller
//!
//! # Example
//!
//! ```no_run
//! use mdverse::{Explorer, ExplorerConfig, FilterSpec, SearchRequest, TableKind};
//!
//! let explorer = Explorer::open(ExplorerConfig::with_data_dir("data")).unwrap();
//! let request = SearchRequest::new(TableKind::StructureFiles, "popc")
//!     .with_filter(FilterSpec::text("atom_number", "1000..50000"));
//! let response = explorer.search(&request).unwrap();
//!
//! println!("{} elements found", response.result.len());
//! ```

pub mod cursor;
pub mod error;
pub mod export;
pub mod filter;
pub mod inference;
pub mod input;
pub mod schema;
pub mod search;
pub mod store;

mod config;
mod explorer;

pub use crate::config::ExplorerConfig;
pub use crate::explorer::{Explorer, SearchRequest, SearchResponse};
pub use cursor::{BrowseSession, QueryIdentity, SelectionCursor};
pub use error::{IngestionError, MdverseError, Result};
pub use filter::{Constraint, FilterSpec, Predicate};
pub use input::{DataTable, SourceMetadata};
pub use schema::{ColumnKind, ColumnProfile, ColumnType, DisplaySchema};
pub use search::{search, RecordDetail, ResultSet, ResultView, SearchScope};
pub use store::{JoinedTables, ParseWarning, RecordStore, Repository, StoreConfig, TableKind};
