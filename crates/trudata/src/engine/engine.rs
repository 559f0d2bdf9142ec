//! Applies a rule specification to a dataset.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::dataset::Dataset;
use crate::error::ClauseError;
use crate::rules::{RuleClause, RuleSpec};

use super::checks::{self, UniquePolicy};
use super::report::{ConfigIssue, Issue, IssueReport};

/// Configuration for the rule engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Which duplicate occurrences `unique` flags.
    pub unique_policy: UniquePolicy,
    /// Evaluate clauses on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unique_policy: UniquePolicy::AfterFirst,
            parallel: true,
        }
    }
}

enum Outcome {
    Clean,
    Violations(Issue),
    Misconfigured(ConfigIssue),
}

/// Evaluates rule specifications. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate every (column, clause) pair of `spec` against `dataset`.
    ///
    /// Misconfigured clauses are recorded in the report and do not stop the
    /// remaining clauses. The result depends only on the inputs.
    #[instrument(skip_all, fields(rows = dataset.row_count(), clauses = spec.clause_count()))]
    pub fn apply(&self, dataset: &Dataset, spec: &RuleSpec) -> IssueReport {
        let missing = spec.missing_columns(dataset);
        if !missing.is_empty() {
            debug!(?missing, "rules reference columns the dataset lacks");
        }
        let pairs: Vec<(&str, &RuleClause)> = spec.clauses().collect();

        // Indexed collect keeps spec order on the parallel path.
        let outcomes: Vec<Outcome> = if self.config.parallel && pairs.len() > 1 {
            pairs
                .par_iter()
                .map(|(column, clause)| self.evaluate(dataset, column, clause))
                .collect()
        } else {
            pairs
                .iter()
                .map(|(column, clause)| self.evaluate(dataset, column, clause))
                .collect()
        };

        let mut issues = Vec::new();
        let mut config_errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Clean => {}
                Outcome::Violations(issue) => {
                    debug!(column = %issue.column, rule = %issue.clause, rows = issue.row_count(), "rule violated");
                    issues.push(issue);
                }
                Outcome::Misconfigured(config_issue) => {
                    warn!(column = %config_issue.column, rule = %config_issue.clause, error = %config_issue.message, "rule misconfigured");
                    config_errors.push(config_issue);
                }
            }
        }

        let report = IssueReport::new(issues, config_errors);
        info!(
            issues = report.issues.len(),
            config_errors = report.config_errors.len(),
            failed_rows = report.failed_rows,
            "validation complete"
        );
        report
    }

    fn evaluate(&self, dataset: &Dataset, column_name: &str, clause: &RuleClause) -> Outcome {
        let Some(column) = dataset.column(column_name) else {
            return Outcome::Misconfigured(ConfigIssue::new(
                clause.clone(),
                ClauseError::MissingColumn {
                    column: column_name.to_string(),
                },
            ));
        };

        match checks::compile(clause, column, self.config.unique_policy) {
            Ok(check) => {
                let rows = check.evaluate(column);
                if rows.is_empty() {
                    Outcome::Clean
                } else {
                    Outcome::Violations(Issue::new(column_name, clause.clone(), rows))
                }
            }
            Err(error) => Outcome::Misconfigured(ConfigIssue::new(clause.clone(), error)),
        }
    }
}
