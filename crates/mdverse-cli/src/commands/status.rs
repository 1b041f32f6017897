//! Status command - show table sizes, sources and ingestion warnings.

use colored::Colorize;
use mdverse::{Explorer, TableKind};

pub fn run(
    explorer: &Explorer,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tables = explorer.snapshot();

    if json_output {
        let counts: serde_json::Map<String, serde_json::Value> = TableKind::ALL
            .iter()
            .map(|&kind| (kind.to_string(), tables.table(kind).row_count().into()))
            .collect();
        let status = serde_json::json!({
            "data_dir": explorer.config().store.data_dir,
            "tables": counts,
            "sources": tables.sources,
            "warnings": tables.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Record store in".cyan().bold(),
        explorer.config().store.data_dir.display().to_string().white()
    );
    println!();

    println!("{}", "Tables:".yellow().bold());
    for kind in TableKind::ALL {
        let table = tables.table(kind);
        println!(
            "  {:<10} {:>8} rows  {:>3} columns",
            kind.to_string(),
            table.row_count().to_string().white().bold(),
            table.column_count()
        );
    }
    println!();

    println!("{}", "Sources:".yellow().bold());
    for source in &tables.sources {
        println!(
            "  {:<32} {:>8} rows  {}",
            source.file,
            source.row_count,
            source.loaded_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
        if verbose {
            println!("    {}", source.hash.dimmed());
        }
    }
    println!();

    if tables.warnings.is_empty() {
        println!("{}", "No parse warnings.".green());
    } else {
        println!(
            "{} {}",
            "Parse warnings:".yellow().bold(),
            tables.warnings.len().to_string().red()
        );
        let shown = if verbose { tables.warnings.len() } else { 10 };
        for warning in tables.warnings.iter().take(shown) {
            println!(
                "  {} row {}: {} = {:?} (expected {})",
                warning.table,
                warning.row + 1,
                warning.column,
                warning.value,
                warning.expected
            );
        }
        if tables.warnings.len() > shown {
            println!(
                "  {}",
                format!("... and {} more (use -v to list all)", tables.warnings.len() - shown).dimmed()
            );
        }
    }

    Ok(())
}
