//! Suggest command - infer a rule specification from a data file.

use std::path::PathBuf;

use colored::Colorize;
use trudata::{ProfilerConfig, Trudata, TrudataConfig};

use crate::cli::SpecFormat;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: SpecFormat,
    max_null_fraction: f64,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    if !(0.0..=1.0).contains(&max_null_fraction) {
        return Err(format!(
            "--max-null-fraction must be between 0 and 1, got {}",
            max_null_fraction
        )
        .into());
    }

    let trudata = Trudata::with_config(TrudataConfig {
        profiler: ProfilerConfig {
            max_null_fraction,
            ..ProfilerConfig::default()
        },
        ..TrudataConfig::default()
    });
    let result = trudata.suggest(&file)?;

    let rendered = match format {
        SpecFormat::Yaml => result.spec.to_yaml_string()?,
        SpecFormat::Json => result.spec.to_json_string()?,
    };

    let Some(output_path) = output else {
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    std::fs::write(&output_path, &rendered)?;

    eprintln!(
        "{} {} rules for {} of {} columns",
        "Suggested".cyan().bold(),
        result.spec.clause_count().to_string().white().bold(),
        result.spec.policy_count(),
        result.source.column_count
    );
    if verbose {
        for entry in &result.spec.rules {
            let kinds: Vec<&str> = entry.rules.iter().map(|c| c.kind()).collect();
            eprintln!("  {:20} {}", entry.column, kinds.join(", "));
        }
    }
    eprintln!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
