//! Profile command - show per-column statistics.

use std::path::PathBuf;

use colored::Colorize;
use trudata::{ColumnProfile, Trudata};

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (source, profiles) = Trudata::new().profile(&file)?;

    if json_output {
        let status = serde_json::json!({
            "file": source.file,
            "format": source.format,
            "rows": source.row_count,
            "columns": profiles,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns, {})",
        "Profile of".cyan().bold(),
        source.file.white(),
        source.row_count,
        source.column_count,
        source.format
    );
    if verbose {
        println!("  {}", source.hash.dimmed());
    }
    println!();

    println!(
        "  {:20} {:10} {:>8} {:>8}  {}",
        "column".bold(),
        "type".bold(),
        "nulls".bold(),
        "distinct".bold(),
        "details".bold()
    );
    for profile in &profiles {
        let nulls = if profile.null_count > 0 {
            profile.null_count.to_string().yellow()
        } else {
            profile.null_count.to_string().green()
        };
        println!(
            "  {:20} {:10} {:>8} {:>8}  {}",
            profile.name,
            profile.column_type.label(),
            nulls,
            profile.distinct_count,
            details(profile)
        );
    }

    Ok(())
}

fn details(profile: &ColumnProfile) -> String {
    if let Some((min, max)) = profile.numeric_range {
        return format!("range [{}, {}]", min, max);
    }
    if let Some((min, max)) = profile.temporal_range {
        return format!("range [{}, {}]", min, max);
    }
    match (profile.email_ratio, profile.identifier_ratio) {
        (Some(email), Some(identifier)) => format!(
            "email {:.0}%, identifier {:.0}%",
            email * 100.0,
            identifier * 100.0
        ),
        _ => String::new(),
    }
}
