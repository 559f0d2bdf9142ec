//! Issue report produced by the rule engine.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::ClauseError;
use crate::rules::RuleClause;

/// Rows of one column that violate one clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Column the clause is bound to.
    pub column: String,
    /// The violated clause.
    pub clause: RuleClause,
    /// Human-readable description.
    #[serde(rename = "rule")]
    pub description: String,
    /// Offending row indices, ascending. Never empty.
    pub rows: Vec<usize>,
}

impl Issue {
    pub fn new(column: impl Into<String>, clause: RuleClause, rows: Vec<usize>) -> Self {
        let column = column.into();
        Self {
            description: clause.describe(&column),
            column,
            clause,
            rows,
        }
    }

    /// Number of offending rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A clause that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigIssue {
    /// Column the clause is bound to.
    pub column: String,
    /// The misconfigured clause.
    pub clause: RuleClause,
    /// What is wrong with it.
    pub error: ClauseError,
    /// Rendered error message.
    pub message: String,
}

impl ConfigIssue {
    pub fn new(clause: RuleClause, error: ClauseError) -> Self {
        Self {
            column: error.column().to_string(),
            clause,
            message: error.to_string(),
            error,
        }
    }
}

/// Result of applying a rule specification to a dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IssueReport {
    /// Data-quality issues, in rule specification order.
    pub issues: Vec<Issue>,
    /// Clauses that could not be evaluated, in rule specification order.
    pub config_errors: Vec<ConfigIssue>,
    /// Number of distinct rows touched by at least one issue.
    pub failed_rows: usize,
}

impl IssueReport {
    /// Assemble a report, counting the distinct failed rows.
    pub fn new(issues: Vec<Issue>, config_errors: Vec<ConfigIssue>) -> Self {
        let failed_rows = distinct_rows(&issues).len();
        Self {
            issues,
            config_errors,
            failed_rows,
        }
    }

    /// Distinct row indices touched by any issue, ascending.
    pub fn failed_row_indices(&self) -> BTreeSet<usize> {
        distinct_rows(&self.issues)
    }

    /// Sum of offending rows over all issues (a row may count more than once).
    pub fn total_violations(&self) -> usize {
        self.issues.iter().map(Issue::row_count).sum()
    }

    /// Issues raised against a column.
    pub fn issues_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.column == column)
    }

    /// No data-quality issues and no configuration errors.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.config_errors.is_empty()
    }

    pub fn has_config_errors(&self) -> bool {
        !self.config_errors.is_empty()
    }
}

fn distinct_rows(issues: &[Issue]) -> BTreeSet<usize> {
    issues.iter().flat_map(|i| i.rows.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_rows_are_distinct() {
        let report = IssueReport::new(
            vec![
                Issue::new("a", RuleClause::NotNull, vec![1, 3]),
                Issue::new("b", RuleClause::Unique, vec![3, 4]),
            ],
            Vec::new(),
        );
        assert_eq!(report.failed_rows, 3);
        assert_eq!(report.total_violations(), 4);
        assert_eq!(
            report.failed_row_indices().into_iter().collect::<Vec<_>>(),
            vec![1, 3, 4]
        );
        assert_eq!(report.issues_for("a").count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_issue_shape() {
        let issue = Issue::new("age", RuleClause::NotNull, vec![2]);
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["rule"], "age must not be null");
        assert_eq!(json["rows"], serde_json::json!([2]));
        assert_eq!(json["clause"], "not_null");
    }

    #[test]
    fn test_config_issue_message() {
        let issue = ConfigIssue::new(
            RuleClause::NotNull,
            ClauseError::MissingColumn {
                column: "ghost".to_string(),
            },
        );
        assert_eq!(issue.column, "ghost");
        assert_eq!(issue.message, "column 'ghost' does not exist in the dataset");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["error"]["kind"], "missing_column");
    }
}
