//! Validate command - check a data file against a rule specification.

use std::path::PathBuf;

use colored::Colorize;
use tracing::debug;
use trudata::{Dataset, EngineConfig, Trudata, TrudataConfig, ValidationResult, load_rules};

use crate::cli::{ReportFormat, UniquePolicyChoice};

/// Row indices printed per issue before eliding the rest.
const MAX_ROWS_SHOWN: usize = 10;

pub fn run(
    file: PathBuf,
    rules: PathBuf,
    format: ReportFormat,
    unique_policy: UniquePolicyChoice,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let spec = load_rules(&rules)?;
    debug!(
        rules = %rules.display(),
        policies = spec.policy_count(),
        clauses = spec.clause_count(),
        "loaded rule specification"
    );
    let trudata = Trudata::with_config(TrudataConfig {
        engine: EngineConfig {
            unique_policy: unique_policy.into(),
            ..EngineConfig::default()
        },
        ..TrudataConfig::default()
    });
    let (dataset, source) = trudata.load(&file)?;
    let result = trudata.validate_dataset(&dataset, source, &spec)?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        ReportFormat::Text => print_text(&result, &dataset, verbose),
    }

    Ok(())
}

fn print_text(result: &ValidationResult, dataset: &Dataset, verbose: bool) {
    let summary = &result.summary;

    println!(
        "{} {}",
        "Validated".cyan().bold(),
        result.source.file.white()
    );
    println!(
        "{} rows, {} active policies, {} clauses",
        summary.total_rows.to_string().white().bold(),
        summary.policy_count,
        summary.clause_count
    );
    println!();

    if !result.report.config_errors.is_empty() {
        println!("{}", "Misconfigured rules:".red().bold());
        for config_issue in &result.report.config_errors {
            println!(
                "  {} {}: {}",
                "✗".red(),
                config_issue.clause.kind(),
                config_issue.message
            );
        }
        println!();
    }

    if result.report.issues.is_empty() {
        println!("{}", "No issues found - every row passes.".green());
    } else {
        println!("{}", "Issues:".yellow().bold());
        for issue in &result.report.issues {
            println!(
                "  {} ({} rows)",
                issue.description.white(),
                issue.row_count().to_string().red()
            );
            let shown = if verbose {
                issue.rows.len()
            } else {
                issue.rows.len().min(MAX_ROWS_SHOWN)
            };
            let rows: Vec<String> = issue.rows[..shown].iter().map(|r| r.to_string()).collect();
            let more = issue.rows.len() - shown;
            if more > 0 {
                println!("    rows: {}, ... ({} more)", rows.join(", "), more);
            } else {
                println!("    rows: {}", rows.join(", "));
            }
            if verbose {
                print_offending_rows(dataset, &issue.rows);
            }
        }
    }
    println!();

    let score = summary.score_percent();
    let score_text = format!("{:.1}%", score);
    let score_color = if summary.compliant {
        score_text.green()
    } else if score >= 80.0 {
        score_text.yellow()
    } else {
        score_text.red()
    };
    println!(
        "Failed rows: {}/{}",
        summary.failed_rows.to_string().white().bold(),
        summary.total_rows
    );
    println!("Data quality score: {}", score_color);
    println!(
        "Compliance: {}",
        if summary.compliant {
            "compliant".green().bold()
        } else {
            "not compliant".red().bold()
        }
    );
    println!();
    println!("{}", summary.recommendation);
}

/// Show the values of the first offending rows, headed by the column names.
fn print_offending_rows(dataset: &Dataset, rows: &[usize]) {
    println!("      {}", dataset.column_names().join(", ").dimmed());
    for &row in rows.iter().take(MAX_ROWS_SHOWN) {
        println!("      {:>5}: {}", row, dataset.row_values(row).join(", "));
    }
}
