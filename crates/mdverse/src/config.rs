//! Explorer configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MdverseError, Result};
use crate::inference::DEFAULT_CATEGORICAL_THRESHOLD;
use crate::input::ParserConfig;
use crate::store::StoreConfig;

/// Configuration for an [`Explorer`](crate::Explorer).
///
/// Every field is optional in the JSON form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Input files and declared column types.
    pub store: StoreConfig,
    /// How metadata files are read.
    pub parser: ParserConfig,
    /// Distinct-value count below which a column is categorical.
    pub categorical_threshold: usize,
    /// Default directory for exports.
    pub export_dir: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            parser: ParserConfig::default(),
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            export_dir: PathBuf::from("."),
        }
    }
}

impl ExplorerConfig {
    /// Default configuration reading from `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig::with_data_dir(data_dir),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mdverse::ExplorerConfig;
    /// let config = ExplorerConfig::from_file("mdverse.json").unwrap();
    /// println!("Data directory: {}", config.store.data_dir.display());
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| MdverseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ExplorerConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            MdverseError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings no search can work with.
    pub fn validate(&self) -> Result<()> {
        if self.categorical_threshold == 0 {
            return Err(MdverseError::Config(
                "categorical_threshold must be at least 1".to_string(),
            ));
        }
        if self.store.repositories.is_empty() {
            return Err(MdverseError::Config(
                "at least one repository must be configured".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"store": {{"data_dir": "/data/mdverse"}}, "categorical_threshold": 5}}"#
        )
        .unwrap();

        let config = ExplorerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("/data/mdverse"));
        assert_eq!(config.store.repositories.len(), 3);
        assert_eq!(config.categorical_threshold, 5);
        assert_eq!(config.parser.delimiter, Some(b'\t'));
    }

    #[test]
    fn test_from_file_rejects_bad_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"categorical_threshold": 0}}"#).unwrap();
        assert!(matches!(
            ExplorerConfig::from_file(file.path()),
            Err(MdverseError::Config(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(ExplorerConfig::from_file(file.path()).is_err());
    }
}
