//! Caller-facing column layout of a result set.

use serde::{Deserialize, Serialize};

/// One displayed column: where it comes from and what it is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayColumn {
    /// Column name in the joined table.
    pub source: String,
    /// Label shown to the user.
    pub label: String,
}

/// Ordered projection of a joined table onto displayed columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySchema {
    /// Displayed columns, in display order.
    pub columns: Vec<DisplayColumn>,
    /// Underlying columns that are shown but never offered as filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unfilterable: Vec<String>,
}

impl DisplaySchema {
    /// Create a schema from `(source, label)` pairs.
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            columns: pairs
                .iter()
                .map(|(source, label)| DisplayColumn {
                    source: source.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            unfilterable: Vec::new(),
        }
    }

    /// Mark underlying columns as not filterable.
    pub fn with_unfilterable(mut self, columns: &[&str]) -> Self {
        self.unfilterable = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Get all display labels.
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Map a display label or an underlying name to the underlying name.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.columns
            .iter()
            .find(|c| c.label == name)
            .map(|c| c.source.as_str())
            .unwrap_or(name)
    }

    /// Label for an underlying column, falling back to its name.
    pub fn label_for<'a>(&'a self, source: &'a str) -> &'a str {
        self.columns
            .iter()
            .find(|c| c.source == source)
            .map(|c| c.label.as_str())
            .unwrap_or(source)
    }

    /// Underlying columns a user may filter on.
    pub fn filterable(&self) -> impl Iterator<Item = &DisplayColumn> {
        self.columns
            .iter()
            .filter(|c| !self.unfilterable.contains(&c.source))
    }

    /// Get the number of displayed columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
