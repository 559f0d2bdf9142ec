//! Trudata CLI - declarative data-quality validation.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            file,
            rules,
            format,
            unique_policy,
        } => commands::validate::run(file, rules, format, unique_policy, cli.verbose),

        Commands::Suggest {
            file,
            output,
            format,
            max_null_fraction,
        } => commands::suggest::run(file, output, format, max_null_fraction, cli.verbose),

        Commands::Profile { file, json } => commands::profile::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "trudata=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
