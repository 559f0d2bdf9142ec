//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use trudata::UniquePolicy;

/// Trudata: declarative data-quality validator
#[derive(Parser)]
#[command(name = "trudata")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a data file against a rule specification
    Validate {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rule specification (YAML, or JSON when the name ends in .json)
        #[arg(short, long, value_name = "RULES")]
        rules: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,

        /// Which occurrences of a duplicated value `unique` flags
        #[arg(long, default_value = "after-first")]
        unique_policy: UniquePolicyChoice,
    },

    /// Suggest a rule specification from the data
    Suggest {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the specification here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "yaml")]
        format: SpecFormat,

        /// Largest null fraction that still suggests not_null
        #[arg(long, default_value = "0.0")]
        max_null_fraction: f64,
    },

    /// Show per-column statistics
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json.", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub enum SpecFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for SpecFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(SpecFormat::Yaml),
            "json" => Ok(SpecFormat::Json),
            _ => Err(format!("Unknown format: {}. Use yaml or json.", s)),
        }
    }
}

impl std::fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecFormat::Yaml => write!(f, "yaml"),
            SpecFormat::Json => write!(f, "json"),
        }
    }
}

/// Duplicate flagging policy for `unique`
#[derive(Clone, Debug, Default)]
pub enum UniquePolicyChoice {
    /// Every occurrence except the first
    #[default]
    AfterFirst,
    /// Every occurrence, the first included
    All,
}

impl std::str::FromStr for UniquePolicyChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "after-first" | "first" => Ok(UniquePolicyChoice::AfterFirst),
            "all" => Ok(UniquePolicyChoice::All),
            _ => Err(format!(
                "Unknown unique policy: {}. Use after-first or all.",
                s
            )),
        }
    }
}

impl std::fmt::Display for UniquePolicyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniquePolicyChoice::AfterFirst => write!(f, "after-first"),
            UniquePolicyChoice::All => write!(f, "all"),
        }
    }
}

impl From<UniquePolicyChoice> for UniquePolicy {
    fn from(choice: UniquePolicyChoice) -> Self {
        match choice {
            UniquePolicyChoice::AfterFirst => UniquePolicy::AfterFirst,
            UniquePolicyChoice::All => UniquePolicy::All,
        }
    }
}
