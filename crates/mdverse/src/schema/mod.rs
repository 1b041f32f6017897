//! Column types, kinds and profiles.

mod column;
mod display;
mod types;

pub use column::ColumnProfile;
pub use display::{DisplayColumn, DisplaySchema};
pub use types::{parse_integer, ColumnKind, ColumnType};
