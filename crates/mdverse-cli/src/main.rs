//! MDverse CLI - search and filter molecular dynamics metadata.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use mdverse::{Explorer, ExplorerConfig};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_explorer(cli: &Cli) -> Result<Explorer, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ExplorerConfig::from_file(path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.store.data_dir = dir.clone();
    }
    Ok(Explorer::open(config)?)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let explorer = open_explorer(&cli)?;

    match cli.command {
        Commands::Search {
            table,
            keyword,
            all,
            filters,
            sort,
            desc,
            limit,
            select,
            pick,
            export,
            json,
        } => commands::search::run(
            &explorer,
            commands::search::SearchArgs {
                table,
                keyword,
                all,
                filters,
                sort,
                desc,
                limit,
                select,
                pick,
                export,
                json,
            },
        ),

        Commands::Columns {
            table,
            keyword,
            all,
        } => commands::columns::run(&explorer, table, keyword, all),

        Commands::Status { json } => commands::status::run(&explorer, json, cli.verbose),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
