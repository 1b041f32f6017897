//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MDverse: search and filter molecular dynamics datasets and files
#[derive(Parser)]
#[command(name = "mdverse")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the metadata TSV files (overrides the config)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a table by keyword and narrow the results with column filters
    Search {
        /// Table to search: datasets, gro or mdp
        #[arg(value_name = "TABLE")]
        table: String,

        /// Keyword matched against titles, descriptions and identifiers
        #[arg(value_name = "KEYWORD", default_value = "")]
        keyword: String,

        /// Show every row regardless of the keyword
        #[arg(short, long)]
        all: bool,

        /// Column filter as COLUMN=EXPR (e.g. "Dataset=zenodo,osf", "atom_number=1000..2000")
        #[arg(short, long = "filter", value_name = "COLUMN=EXPR")]
        filters: Vec<String>,

        /// Sort by a column (label or name)
        #[arg(long, value_name = "COLUMN")]
        sort: Option<String>,

        /// Sort in descending order
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Maximum number of rows to print
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Result position (1-based) whose details are shown
        #[arg(short, long, default_value = "1")]
        select: usize,

        /// Result positions (1-based) to export, e.g. "1,3,4"; all rows when omitted
        #[arg(short, long, value_name = "N", value_delimiter = ',', requires = "export")]
        pick: Vec<usize>,

        /// Export the results as TSV into DIR, or into the configured export_dir when DIR is omitted
        #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the filterable columns of a table and how they can be filtered
    Columns {
        /// Table to inspect: datasets, gro or mdp
        #[arg(value_name = "TABLE")]
        table: String,

        /// Keyword restricting the rows the columns are profiled over
        #[arg(value_name = "KEYWORD", default_value = "")]
        keyword: String,

        /// Profile over every row
        #[arg(short, long)]
        all: bool,
    },

    /// Show table sizes, source files and ingestion warnings
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
