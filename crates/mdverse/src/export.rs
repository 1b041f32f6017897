//! Tab-separated export of result views.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{MdverseError, Result};
use crate::input::DataTable;
use crate::search::ResultView;

/// Prefix of exported file names.
pub const EXPORT_PREFIX: &str = "mdverse";

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> MdverseError + '_ {
    move |source| MdverseError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write a view as UTF-8 TSV with a header row.
pub fn write_tsv<W: Write>(view: &ResultView, writer: W) -> Result<()> {
    let mut out = tsv_writer(writer);
    out.write_record(&view.headers)?;
    for row in &view.rows {
        out.write_record(row)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a whole table to a TSV file.
pub fn write_table_file(table: &DataTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let file = File::create(path).map_err(io_error(path))?;
    let mut out = tsv_writer(file);
    out.write_record(&table.headers)?;
    for row in &table.rows {
        out.write_record(row)?;
    }
    out.flush().map_err(io_error(path))?;
    Ok(())
}

/// `mdverse_YYYY-MM-DD_HH-MM-SS.tsv` for the given local time.
pub fn export_file_name(now: NaiveDateTime) -> String {
    format!("{}_{}.tsv", EXPORT_PREFIX, now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Export a view into a directory, creating it if needed.
///
/// Returns the path written.
pub fn export_to_dir(view: &ResultView, dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;
    let path = dir.join(export_file_name(now));
    let file = File::create(&path).map_err(io_error(&path))?;
    write_tsv(view, file)?;
    info!(path = %path.display(), rows = view.len(), "exported selection");
    Ok(path)
}
