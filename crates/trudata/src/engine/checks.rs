//! Per-clause checks over a single column.

use std::hash::Hash;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dataset::{Column, ColumnData, ColumnType, numeric_key};
use crate::error::ClauseError;
use crate::rules::{Bound, RuleClause};

/// Which occurrences of a duplicated value a `unique` clause flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquePolicy {
    /// Flag every occurrence after the first.
    #[default]
    AfterFirst,
    /// Flag every occurrence, the first included.
    All,
}

/// A clause bound to a column and ready to run.
pub trait Check {
    /// Offending row indices, ascending.
    fn evaluate(&self, column: &Column) -> Vec<usize>;
}

/// Turn a clause into a runnable check for `column`.
///
/// Fails when the clause cannot be applied to the column's type or is itself
/// malformed.
pub fn compile(
    clause: &RuleClause,
    column: &Column,
    policy: UniquePolicy,
) -> Result<Box<dyn Check>, ClauseError> {
    match clause {
        RuleClause::NotNull => Ok(Box::new(NotNullCheck)),
        RuleClause::Unique => Ok(Box::new(UniqueCheck { policy })),
        RuleClause::Range { min, max } => compile_range(column, min.as_ref(), max.as_ref()),
        RuleClause::Pattern { regex } => compile_pattern(column, regex),
    }
}

fn compile_range(
    column: &Column,
    min: Option<&Bound>,
    max: Option<&Bound>,
) -> Result<Box<dyn Check>, ClauseError> {
    let column_type = column.column_type();
    let invalid_bound = |bound: &Bound| ClauseError::InvalidBound {
        column: column.name().to_string(),
        bound: bound.to_string(),
        column_type,
    };
    let inverted = || ClauseError::InvalidRange {
        column: column.name().to_string(),
        min: min.map(ToString::to_string).unwrap_or_default(),
        max: max.map(ToString::to_string).unwrap_or_default(),
    };

    match column.data() {
        ColumnData::Temporal(_) => {
            let min = min
                .map(|b| b.as_datetime().ok_or_else(|| invalid_bound(b)))
                .transpose()?;
            let max = max
                .map(|b| b.as_datetime().ok_or_else(|| invalid_bound(b)))
                .transpose()?;
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    return Err(inverted());
                }
            }
            Ok(Box::new(TemporalRangeCheck { min, max }))
        }
        data => {
            if let ColumnData::Text(values) = data {
                let numeric = values
                    .iter()
                    .flatten()
                    .all(|v| v.trim().parse::<f64>().is_ok());
                if !numeric {
                    return Err(ClauseError::IncompatibleType {
                        column: column.name().to_string(),
                        clause: "range".to_string(),
                        column_type,
                    });
                }
            }
            let lo = min
                .map(|b| b.as_f64().ok_or_else(|| invalid_bound(b)))
                .transpose()?
                .unwrap_or(f64::NEG_INFINITY);
            let hi = max
                .map(|b| b.as_f64().ok_or_else(|| invalid_bound(b)))
                .transpose()?
                .unwrap_or(f64::INFINITY);
            if lo > hi {
                return Err(inverted());
            }
            Ok(Box::new(NumericRangeCheck { min: lo, max: hi }))
        }
    }
}

fn compile_pattern(column: &Column, pattern: &str) -> Result<Box<dyn Check>, ClauseError> {
    if column.column_type() != ColumnType::Text {
        return Err(ClauseError::IncompatibleType {
            column: column.name().to_string(),
            clause: "pattern".to_string(),
            column_type: column.column_type(),
        });
    }

    let regex = full_match_regex(pattern).map_err(|e| ClauseError::InvalidPattern {
        column: column.name().to_string(),
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(Box::new(PatternCheck { regex }))
}

/// Compile `pattern` so it only matches whole values.
fn full_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    // A trailing `#` comment under `(?x)` runs to end of line and would eat the anchors.
    Regex::new(&format!("^(?:{pattern})$"))
        .or_else(|_| Regex::new(&format!("^(?:{pattern}\n)$")))
}

/// Flags absent values.
pub struct NotNullCheck;

impl Check for NotNullCheck {
    fn evaluate(&self, column: &Column) -> Vec<usize> {
        column.null_rows()
    }
}

/// Flags repeated values. Absent values count as one value.
pub struct UniqueCheck {
    policy: UniquePolicy,
}

impl Check for UniqueCheck {
    fn evaluate(&self, column: &Column) -> Vec<usize> {
        match column.data() {
            ColumnData::Numeric(values) => duplicate_rows(
                values.iter().map(|v| v.map(numeric_key)),
                self.policy,
            ),
            ColumnData::Text(values) => {
                duplicate_rows(values.iter().map(|v| v.as_deref()), self.policy)
            }
            ColumnData::Temporal(values) => {
                duplicate_rows(values.iter().copied(), self.policy)
            }
        }
    }
}

fn duplicate_rows<K: Hash + Eq>(
    keys: impl Iterator<Item = Option<K>>,
    policy: UniquePolicy,
) -> Vec<usize> {
    let mut groups: IndexMap<Option<K>, Vec<usize>> = IndexMap::new();
    for (row, key) in keys.enumerate() {
        groups.entry(key).or_default().push(row);
    }

    let mut rows: Vec<usize> = groups
        .into_values()
        .filter(|group| group.len() > 1)
        .flat_map(|group| match policy {
            UniquePolicy::AfterFirst => group[1..].to_vec(),
            UniquePolicy::All => group,
        })
        .collect();
    rows.sort_unstable();
    rows
}

/// Flags numbers outside inclusive bounds.
pub struct NumericRangeCheck {
    min: f64,
    max: f64,
}

impl NumericRangeCheck {
    fn out_of_range(&self, value: f64) -> bool {
        value < self.min || value > self.max
    }
}

impl Check for NumericRangeCheck {
    fn evaluate(&self, column: &Column) -> Vec<usize> {
        let flag = |row: usize, value: Option<f64>| {
            value.filter(|n| self.out_of_range(*n)).map(|_| row)
        };

        match column.data() {
            ColumnData::Numeric(values) => values
                .iter()
                .enumerate()
                .filter_map(|(row, v)| flag(row, *v))
                .collect(),
            ColumnData::Text(values) => values
                .iter()
                .enumerate()
                .filter_map(|(row, v)| {
                    flag(row, v.as_deref().and_then(|s| s.trim().parse::<f64>().ok()))
                })
                .collect(),
            ColumnData::Temporal(_) => Vec::new(),
        }
    }
}

/// Flags timestamps outside inclusive bounds.
pub struct TemporalRangeCheck {
    min: Option<NaiveDateTime>,
    max: Option<NaiveDateTime>,
}

impl Check for TemporalRangeCheck {
    fn evaluate(&self, column: &Column) -> Vec<usize> {
        let ColumnData::Temporal(values) = column.data() else {
            return Vec::new();
        };

        values
            .iter()
            .enumerate()
            .filter_map(|(row, v)| {
                let value = (*v)?;
                let below = self.min.is_some_and(|m| value < m);
                let above = self.max.is_some_and(|m| value > m);
                (below || above).then_some(row)
            })
            .collect()
    }
}

/// Flags text that does not fully match a regex.
pub struct PatternCheck {
    regex: Regex,
}

impl Check for PatternCheck {
    fn evaluate(&self, column: &Column) -> Vec<usize> {
        let ColumnData::Text(values) = column.data() else {
            return Vec::new();
        };

        values
            .iter()
            .enumerate()
            .filter_map(|(row, v)| {
                let value = v.as_deref()?;
                (!self.regex.is_match(value)).then_some(row)
            })
            .collect()
    }
}
