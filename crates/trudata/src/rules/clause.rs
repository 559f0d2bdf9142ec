//! Rule clauses and their exchange form.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dataset::temporal;

/// One end of a range.
///
/// Numbers bound numeric columns; strings bound temporal columns (and numeric
/// columns when they parse as numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    Text(String),
}

impl Bound {
    /// Numeric value of this bound, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Bound::Number(n) => Some(*n).filter(|n| !n.is_nan()),
            Bound::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
        }
    }

    /// Temporal value of this bound. Numbers never bound temporal columns.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Bound::Number(_) => None,
            Bound::Text(s) => temporal::parse_datetime(s),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Number(n) => write!(f, "{n}"),
            Bound::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Number(value)
    }
}

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Bound::Text(value.to_string())
    }
}

impl From<String> for Bound {
    fn from(value: String) -> Self {
        Bound::Text(value)
    }
}

/// A single constraint bound to one column.
///
/// In rule documents `NotNull` and `Unique` are the bare strings `not_null`
/// and `unique`; `Range` is `{range: {min, max}}` with either key optional;
/// `Pattern` is `{pattern: <regex>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClause", into = "RawClause")]
pub enum RuleClause {
    /// Values must be present.
    NotNull,
    /// Present values must not repeat.
    Unique,
    /// Values must lie within inclusive bounds; a missing bound is open.
    Range {
        min: Option<Bound>,
        max: Option<Bound>,
    },
    /// Text values must match the whole regex.
    Pattern { regex: String },
}

impl RuleClause {
    /// Range with both numeric bounds.
    pub fn range(min: f64, max: f64) -> Self {
        RuleClause::Range {
            min: Some(Bound::Number(min)),
            max: Some(Bound::Number(max)),
        }
    }

    /// Range with arbitrary, possibly open, bounds.
    pub fn range_bounds(min: Option<Bound>, max: Option<Bound>) -> Self {
        RuleClause::Range { min, max }
    }

    pub fn pattern(regex: impl Into<String>) -> Self {
        RuleClause::Pattern {
            regex: regex.into(),
        }
    }

    /// Keyword naming the clause kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RuleClause::NotNull => "not_null",
            RuleClause::Unique => "unique",
            RuleClause::Range { .. } => "range",
            RuleClause::Pattern { .. } => "pattern",
        }
    }

    /// Human-readable description of a violation of this clause on `column`.
    pub fn describe(&self, column: &str) -> String {
        match self {
            RuleClause::NotNull => format!("{column} must not be null"),
            RuleClause::Unique => format!("{column} must be unique"),
            RuleClause::Range { min, max } => format!(
                "{column} out of range [{}, {}]",
                min.as_ref().map(ToString::to_string).unwrap_or("-inf".to_string()),
                max.as_ref().map(ToString::to_string).unwrap_or("inf".to_string()),
            ),
            RuleClause::Pattern { regex } => format!("{column} does not match pattern '{regex}'"),
        }
    }
}

impl fmt::Display for RuleClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleClause::Pattern { regex } => write!(f, "pattern({regex})"),
            RuleClause::Range { min, max } => write!(
                f,
                "range({}, {})",
                min.as_ref().map(ToString::to_string).unwrap_or_default(),
                max.as_ref().map(ToString::to_string).unwrap_or_default(),
            ),
            other => f.write_str(other.kind()),
        }
    }
}

// =============================================================================
// EXCHANGE FORM
// =============================================================================
// Rule documents mix bare strings and single-key objects. The untyped shape
// stops here; everything past deserialization sees `RuleClause`.

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawClause {
    Keyword(String),
    Range(RawRangeClause),
    Pattern(RawPatternClause),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRangeClause {
    range: RawRange,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<Bound>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPatternClause {
    pattern: String,
}

impl TryFrom<RawClause> for RuleClause {
    type Error = String;

    fn try_from(raw: RawClause) -> Result<Self, Self::Error> {
        match raw {
            RawClause::Keyword(word) => match word.trim() {
                "not_null" => Ok(RuleClause::NotNull),
                "unique" => Ok(RuleClause::Unique),
                other => Err(format!(
                    "unknown rule '{other}', expected not_null, unique, range or pattern"
                )),
            },
            RawClause::Range(RawRangeClause { range }) => Ok(RuleClause::Range {
                min: range.min,
                max: range.max,
            }),
            RawClause::Pattern(RawPatternClause { pattern }) => {
                Ok(RuleClause::Pattern { regex: pattern })
            }
        }
    }
}

impl From<RuleClause> for RawClause {
    fn from(clause: RuleClause) -> Self {
        match clause {
            RuleClause::NotNull => RawClause::Keyword("not_null".to_string()),
            RuleClause::Unique => RawClause::Keyword("unique".to_string()),
            RuleClause::Range { min, max } => RawClause::Range(RawRangeClause {
                range: RawRange { min, max },
            }),
            RuleClause::Pattern { regex } => {
                RawClause::Pattern(RawPatternClause { pattern: regex })
            }
        }
    }
}
