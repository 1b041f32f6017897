//! Search command - keyword search, filters, details and export.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use mdverse::export::export_to_dir;
use mdverse::{
    BrowseSession, DisplaySchema, Explorer, ExplorerConfig, FilterSpec, RecordDetail, ResultSet,
    SearchRequest, TableKind,
};

pub struct SearchArgs {
    pub table: String,
    pub keyword: String,
    pub all: bool,
    pub filters: Vec<String>,
    pub sort: Option<String>,
    pub desc: bool,
    pub limit: usize,
    pub select: usize,
    pub pick: Vec<usize>,
    /// `Some(None)` is a bare `--export`: use the configured directory.
    pub export: Option<Option<PathBuf>>,
    pub json: bool,
}

pub fn run(explorer: &Explorer, args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let table: TableKind = args.table.parse()?;

    let mut request = SearchRequest::new(table, args.keyword.as_str());
    request.show_all = args.all;
    for filter in &args.filters {
        request = request.with_filter(FilterSpec::parse_arg(filter)?);
    }

    let response = explorer.search(&request)?;
    let mut result = response.result;
    if let Some(column) = &args.sort {
        result = result.sorted_by(response.scope.display.resolve(column), args.desc)?;
    }

    let mut session = BrowseSession::new();
    session.observe(response.identity.clone(), result.len());
    session.cursor_mut().select(args.select.saturating_sub(1));
    let cursor = *session.cursor();

    let view = result.project(&response.scope.display)?;
    let detail = result.detail(cursor.position());

    let exported = match &args.export {
        Some(requested) if !result.is_empty() => {
            let dir = export_dir(requested.as_deref(), explorer.config());
            let picked = pick(&result, &args.pick)?;
            Some(export_selection(
                &picked,
                &response.scope.display,
                dir,
                Local::now().naive_local(),
            )?)
        }
        _ => None,
    };

    if args.json {
        let output = serde_json::json!({
            "table": table,
            "query": response.identity,
            "fingerprint": response.identity.fingerprint(),
            "status": result.status(),
            "base_count": response.base_count,
            "count": result.len(),
            "headers": view.headers,
            "rows": view.rows.iter().take(args.limit).collect::<Vec<_>>(),
            "cursor": cursor.to_string(),
            "selected": detail,
            "exported": exported.as_ref().map(|(path, _)| path),
            "exported_rows": exported.as_ref().map(|(_, rows)| rows),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let Some(headline) = headline(&result) else {
        return Ok(());
    };
    println!("{}", headline);
    if result.is_no_match() {
        return Ok(());
    }
    if result.len() < response.base_count {
        println!(
            "  {} of {} keyword matches kept by {} filter(s)",
            result.len(),
            response.base_count,
            response.identity.filters.len()
        );
    }
    println!();

    print_rows(&view.headers, &view.rows, args.limit);

    if let Some(detail) = &detail {
        println!();
        println!("{} {}", "Selected".yellow().bold(), cursor.to_string().white());
        print_detail(detail);
    }

    if let Some((path, rows)) = exported {
        println!();
        println!("{} {} rows to {}", "Exported".cyan(), rows, path.display());
    }

    Ok(())
}

/// Status line for a result; nothing before a query is issued.
fn headline(result: &ResultSet) -> Option<String> {
    if result.is_empty_query() {
        None
    } else if result.is_no_match() {
        Some("No result found.".red().bold().to_string())
    } else {
        Some(format!(
            "{} {}",
            result.len().to_string().white().bold(),
            "elements found".green().bold()
        ))
    }
}

/// Subset of the result at 1-based `positions`; every row when none are given.
fn pick(result: &ResultSet, positions: &[usize]) -> Result<ResultSet, Box<dyn std::error::Error>> {
    if positions.is_empty() {
        return Ok(result.clone());
    }
    if let Some(&bad) = positions.iter().find(|&&p| p == 0 || p > result.len()) {
        return Err(format!("--pick {} is outside 1..={}", bad, result.len()).into());
    }
    let zero_based: Vec<usize> = positions.iter().map(|p| p - 1).collect();
    Ok(result.select(&zero_based))
}

/// Directory given on the command line, else the configured one.
fn export_dir<'a>(requested: Option<&'a Path>, config: &'a ExplorerConfig) -> &'a Path {
    requested.unwrap_or(config.export_dir.as_path())
}

/// Export a result set and report where it went and how many rows it holds.
fn export_selection(
    result: &ResultSet,
    schema: &DisplaySchema,
    dir: &Path,
    now: NaiveDateTime,
) -> Result<(PathBuf, usize), Box<dyn std::error::Error>> {
    let view = result.project(schema)?;
    let path = export_to_dir(&view, dir, now)?;
    Ok((path, view.len()))
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn print_rows(headers: &[String], rows: &[Vec<String>], limit: usize) {
    const MAX_WIDTH: usize = 32;

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .take(limit)
                .map(|r| r.get(i).map(|c| c.chars().count()).unwrap_or(0))
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_WIDTH)
        })
        .collect();

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<w$}", truncate(h, w), w = w))
        .collect();
    println!("{}", header_line.join("  ").bold());

    for row in rows.iter().take(limit) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:<w$}", truncate(c, w), w = w))
            .collect();
        println!("{}", line.join("  "));
    }

    if rows.len() > limit {
        println!("{}", format!("... and {} more", rows.len() - limit).dimmed());
    }
}

fn print_detail(detail: &RecordDetail) {
    let fields = [
        ("Dataset", &detail.dataset),
        ("ID", &detail.id),
        ("URL", &detail.url),
        ("Creation date", &detail.creation_date),
        ("Authors", &detail.authors),
        ("Title", &detail.title),
    ];
    for (label, value) in fields {
        println!("  {:<14} {}", format!("{}:", label).cyan(), value);
    }
    if !detail.description.is_empty() {
        println!();
        println!("  {}", detail.description);
    }
}
