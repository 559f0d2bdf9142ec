//! Rule specification: the ordered column → clauses mapping.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::Result;

use super::clause::RuleClause;

/// Clauses bound to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRules {
    /// Column the clauses apply to.
    pub column: String,
    /// Clauses in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleClause>,
}

impl ColumnRules {
    pub fn new(column: impl Into<String>, rules: Vec<RuleClause>) -> Self {
        Self {
            column: column.into(),
            rules,
        }
    }
}

/// A validation configuration.
///
/// Serializes to the exchange form `{rules: [{column, rules: [...]}, ...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default)]
    pub rules: Vec<ColumnRules>,
}

impl RuleSpec {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the clauses for a column.
    pub fn with_column(mut self, column: impl Into<String>, rules: Vec<RuleClause>) -> Self {
        self.rules.push(ColumnRules::new(column, rules));
        self
    }

    /// Append the clauses for a column in place.
    pub fn push(&mut self, column_rules: ColumnRules) {
        self.rules.push(column_rules);
    }

    /// Number of column entries (the "active policies" count).
    pub fn policy_count(&self) -> usize {
        self.rules.len()
    }

    /// Total number of clauses across all columns.
    pub fn clause_count(&self) -> usize {
        self.rules.iter().map(|r| r.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every (column, clause) pair in evaluation order.
    pub fn clauses(&self) -> impl Iterator<Item = (&str, &RuleClause)> {
        self.rules.iter().flat_map(|entry| {
            entry
                .rules
                .iter()
                .map(move |clause| (entry.column.as_str(), clause))
        })
    }

    /// Get the clauses for a column.
    pub fn get(&self, column: &str) -> Option<&ColumnRules> {
        self.rules.iter().find(|r| r.column == column)
    }

    /// Referenced columns the dataset does not have, in spec order.
    pub fn missing_columns<'a>(&'a self, dataset: &Dataset) -> Vec<&'a str> {
        self.rules
            .iter()
            .map(|r| r.column.as_str())
            .filter(|name| dataset.column(name).is_none())
            .collect()
    }

    /// Parse a YAML rule document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Render as a YAML rule document.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a JSON rule document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
