//! Quality score derived from an issue report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::IssueReport;
use crate::error::{Result, TrudataError};
use crate::rules::RuleSpec;

/// Score at or above which a dataset counts as compliant.
pub const COMPLIANCE_THRESHOLD: f64 = 0.95;

/// Headline numbers for one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    /// Rows in the validated dataset.
    pub total_rows: usize,
    /// Distinct rows with at least one violation.
    pub failed_rows: usize,
    /// Fraction of rows without violations (0.0-1.0).
    pub quality_score: f64,
    /// Number of column entries in the rule specification.
    pub policy_count: usize,
    /// Number of clauses across all columns.
    pub clause_count: usize,
    /// Row-level violations across all issues.
    pub total_violations: usize,
    /// Violations per clause kind.
    pub violations_by_clause: BTreeMap<String, usize>,
    /// Clauses that could not be evaluated.
    pub config_error_count: usize,
    /// `quality_score >= COMPLIANCE_THRESHOLD`.
    pub compliant: bool,
    /// Human-readable recommendation.
    pub recommendation: String,
}

impl QualitySummary {
    /// Summarize a report produced for a dataset of `row_count` rows.
    pub fn compute(report: &IssueReport, row_count: usize, spec: &RuleSpec) -> Result<Self> {
        if row_count == 0 {
            return Err(TrudataError::EmptyData(
                "cannot score a dataset with no rows".to_string(),
            ));
        }

        let failed_rows = report.failed_rows;
        let quality_score = (1.0 - failed_rows as f64 / row_count as f64).clamp(0.0, 1.0);

        let mut violations_by_clause = BTreeMap::new();
        for issue in &report.issues {
            *violations_by_clause
                .entry(issue.clause.kind().to_string())
                .or_insert(0) += issue.row_count();
        }

        let config_error_count = report.config_errors.len();
        let compliant = quality_score >= COMPLIANCE_THRESHOLD;

        Ok(Self {
            total_rows: row_count,
            failed_rows,
            quality_score,
            policy_count: spec.policy_count(),
            clause_count: spec.clause_count(),
            total_violations: report.total_violations(),
            violations_by_clause,
            config_error_count,
            compliant,
            recommendation: recommendation(failed_rows, config_error_count, quality_score),
        })
    }

    /// Score as a whole percentage, e.g. `66.7`.
    pub fn score_percent(&self) -> f64 {
        self.quality_score * 100.0
    }
}

fn recommendation(failed_rows: usize, config_errors: usize, score: f64) -> String {
    if config_errors > 0 {
        format!(
            "Fix {config_errors} misconfigured rule(s); their columns were not validated."
        )
    } else if failed_rows == 0 {
        "All rows pass every rule.".to_string()
    } else if score >= COMPLIANCE_THRESHOLD {
        format!("Compliant. Review {failed_rows} failing row(s).")
    } else {
        format!(
            "Below the {:.0}% compliance threshold (score: {:.1}%). Review {failed_rows} failing row(s).",
            COMPLIANCE_THRESHOLD * 100.0,
            score * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Issue;
    use crate::rules::RuleClause;

    fn spec() -> RuleSpec {
        RuleSpec::new().with_column("age", vec![RuleClause::NotNull, RuleClause::Unique])
    }

    #[test]
    fn test_score_from_failed_rows() {
        let report = IssueReport::new(
            vec![
                Issue::new("age", RuleClause::NotNull, vec![2]),
                Issue::new("age", RuleClause::Unique, vec![3]),
            ],
            Vec::new(),
        );
        let summary = QualitySummary::compute(&report, 4, &spec()).unwrap();

        assert_eq!(summary.failed_rows, 2);
        assert_eq!(summary.quality_score, 0.5);
        assert_eq!(summary.policy_count, 1);
        assert_eq!(summary.clause_count, 2);
        assert_eq!(summary.violations_by_clause.get("unique"), Some(&1));
        assert!(!summary.compliant);
    }

    #[test]
    fn test_clean_report_is_compliant() {
        let summary = QualitySummary::compute(&IssueReport::default(), 10, &spec()).unwrap();
        assert_eq!(summary.quality_score, 1.0);
        assert!(summary.compliant);
        assert_eq!(summary.score_percent(), 100.0);
    }

    #[test]
    fn test_compliance_threshold_inclusive() {
        let report = IssueReport::new(vec![Issue::new("age", RuleClause::NotNull, vec![7])], vec![]);
        let summary = QualitySummary::compute(&report, 20, &spec()).unwrap();
        assert!((summary.quality_score - 0.95).abs() < 1e-12);
        assert!(summary.compliant);
    }

    #[test]
    fn test_zero_rows_is_empty_data() {
        let result = QualitySummary::compute(&IssueReport::default(), 0, &spec());
        assert!(matches!(result, Err(TrudataError::EmptyData(_))));
    }
}
