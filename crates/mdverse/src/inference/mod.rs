//! Column classification and value recognition.

mod classifier;
mod temporal;

pub use classifier::{ColumnClassifier, DEFAULT_CATEGORICAL_THRESHOLD};
pub use temporal::parse_iso_date;
