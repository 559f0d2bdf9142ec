//! Trudata: declarative data-quality validation for tabular datasets.
//!
//! A [`RuleSpec`] binds constraints (`not_null`, `unique`, `range`,
//! `pattern`) to named columns. The [`RuleEngine`] reports which rows violate
//! which constraints; the [`RuleSuggester`] profiles a dataset and proposes a
//! specification that holds on it.
//!
//! # Core Principles
//!
//! - **Read-only**: datasets are never modified
//! - **Per-clause errors**: a misconfigured rule is reported, not fatal
//! - **Deterministic**: the same inputs always yield the same report
//!
//! # Example
//!
//! ```no_run
//! use trudata::{RuleSpec, Trudata};
//!
//! let spec = RuleSpec::from_yaml_str(
//!     "rules:\n  - column: age\n    rules: [not_null, {range: {min: 0, max: 120}}]\n",
//! )
//! .unwrap();
//!
//! let result = Trudata::new().validate("patients.csv", &spec).unwrap();
//! println!("Failed rows: {}", result.summary.failed_rows);
//! for issue in &result.report.issues {
//!     println!("{}: {:?}", issue.description, issue.rows);
//! }
//! ```

pub mod dataset;
pub mod engine;
pub mod error;
pub mod profile;
pub mod rules;
pub mod summary;

mod trudata;

pub use crate::trudata::{SuggestionResult, Trudata, TrudataConfig, ValidationResult, load_rules};
pub use dataset::{Column, ColumnData, ColumnType, Dataset, Loader, LoaderConfig, SourceMetadata};
pub use engine::{ConfigIssue, EngineConfig, Issue, IssueReport, RuleEngine, UniquePolicy};
pub use error::{ClauseError, Result, TrudataError};
pub use profile::{ColumnProfile, Profiler, ProfilerConfig, RuleSuggester};
pub use rules::{Bound, ColumnRules, RuleClause, RuleSpec};
pub use summary::QualitySummary;
