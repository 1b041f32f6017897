//! Columns command - show how each filterable column can be filtered.

use colored::Colorize;
use mdverse::{ColumnKind, ColumnProfile, Explorer, SearchRequest, TableKind};

pub fn run(
    explorer: &Explorer,
    table: String,
    keyword: String,
    all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: TableKind = table.parse()?;
    let mut request = SearchRequest::new(kind, keyword);
    request.show_all = all;

    let response = explorer.search(&request)?;
    if response.result.is_empty_query() {
        return Ok(());
    }

    println!(
        "{} {} ({} rows)",
        "Filterable columns of".cyan().bold(),
        kind.to_string().white(),
        response.base_count
    );
    println!(
        "{}",
        format!(
            "Columns with fewer than {} distinct values are categorical.",
            explorer.classifier().categorical_threshold()
        )
        .dimmed()
    );
    println!();

    for profile in &response.profiles {
        let label = response.scope.display.label_for(&profile.name);
        println!(
            "  {:<18} {:<12} {}",
            label.white().bold(),
            profile.kind.to_string().yellow(),
            describe(profile)
        );
    }

    Ok(())
}

fn describe(profile: &ColumnProfile) -> String {
    let nulls = if profile.null_count > 0 {
        format!(" ({:.0}% missing)", profile.null_percentage())
    } else {
        String::new()
    };

    let body = match profile.kind {
        ColumnKind::Categorical => {
            let values: Vec<&str> = profile.distinct_values.iter().map(|v| v.as_str()).collect();
            if values.is_empty() {
                "no values".to_string()
            } else {
                values.join(", ")
            }
        }
        ColumnKind::Numeric => match profile.numeric_range {
            Some((lo, hi)) => format!("{}..{}", lo, hi),
            None => "no values".to_string(),
        },
        ColumnKind::Temporal => match profile.date_range {
            Some((start, end)) => format!("{}..{}", start, end),
            None => "no values".to_string(),
        },
        ColumnKind::FreeText => format!("{} distinct values, substring match", profile.unique_count),
    };

    format!("{}{}", body, nulls.dimmed())
}
