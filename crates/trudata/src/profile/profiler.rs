//! Column profiling: null, distinctness, extrema and text-shape statistics.

use std::collections::HashSet;
use std::hash::Hash;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::dataset::{Column, ColumnData, ColumnType, Dataset, numeric_key};

/// Email-shaped values, as suggested in `pattern` clauses.
pub const EMAIL_PATTERN: &str = r"[^@]+@[^@]+\.[^@]+";

// Anchored the same way the engine anchors pattern clauses.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(?:{EMAIL_PATTERN})$")).expect("email pattern is a valid regex")
});

/// Identifier-shaped values of at least `min_length` characters.
pub fn identifier_pattern(min_length: usize) -> String {
    format!("[A-Za-z0-9_-]{{{min_length},}}")
}

fn is_identifier(value: &str, min_length: usize) -> bool {
    value.chars().count() >= min_length
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Tunable thresholds for profiling and suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Largest null fraction (0.0-1.0) that still proposes `not_null`.
    pub max_null_fraction: f64,
    /// Fraction of present values that must match a shape to propose its pattern.
    pub pattern_ratio_threshold: f64,
    /// Minimum length of identifier-shaped values.
    pub identifier_min_length: usize,
    /// Evaluate pattern ratios on the first N present values only (None = all).
    pub sample_size: Option<usize>,
    /// Profile columns on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            max_null_fraction: 0.0,
            pattern_ratio_threshold: 0.5,
            identifier_min_length: 6,
            sample_size: None,
            parallel: true,
        }
    }
}

/// Statistics gathered for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub column_type: ColumnType,
    /// Total number of rows (including nulls).
    pub row_count: usize,
    /// Number of absent values.
    pub null_count: usize,
    /// Number of distinct present values.
    pub distinct_count: usize,
    /// Observed (min, max) for numeric columns with at least one value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_range: Option<(f64, f64)>,
    /// Observed (min, max) for temporal columns with at least one value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_range: Option<(NaiveDateTime, NaiveDateTime)>,
    /// Fraction of sampled present values that are email-shaped (text only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_ratio: Option<f64>,
    /// Fraction of sampled present values that are identifier-shaped (text only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_ratio: Option<f64>,
}

impl ColumnProfile {
    /// Number of present values.
    pub fn present_count(&self) -> usize {
        self.row_count - self.null_count
    }

    /// Fraction of absent values; 0.0 for an empty column.
    pub fn null_fraction(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.null_count as f64 / self.row_count as f64
        }
    }

    /// At least one present value and no value repeats, absent values included.
    pub fn is_unique(&self) -> bool {
        self.present_count() > 0
            && self.distinct_count == self.present_count()
            && self.null_count <= 1
    }
}

/// Computes column profiles.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    config: ProfilerConfig,
}

impl Profiler {
    /// Create a profiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profiler with custom settings.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile every column, in column order.
    #[instrument(skip_all, fields(rows = dataset.row_count(), columns = dataset.column_count()))]
    pub fn profile(&self, dataset: &Dataset) -> Vec<ColumnProfile> {
        if self.config.parallel {
            dataset
                .columns()
                .par_iter()
                .map(|c| self.profile_column(c))
                .collect()
        } else {
            dataset.columns().iter().map(|c| self.profile_column(c)).collect()
        }
    }

    /// Profile a single column in one pass per statistic.
    pub fn profile_column(&self, column: &Column) -> ColumnProfile {
        let mut profile = ColumnProfile {
            name: column.name().to_string(),
            column_type: column.column_type(),
            row_count: column.len(),
            null_count: column.null_count(),
            distinct_count: 0,
            numeric_range: None,
            temporal_range: None,
            email_ratio: None,
            identifier_ratio: None,
        };

        match column.data() {
            ColumnData::Numeric(values) => {
                profile.distinct_count = distinct(values.iter().flatten().map(|n| numeric_key(*n)));
                profile.numeric_range = values.iter().flatten().fold(None, |acc, &n| match acc {
                    None => Some((n, n)),
                    Some((lo, hi)) => Some((f64::min(lo, n), f64::max(hi, n))),
                });
            }
            ColumnData::Temporal(values) => {
                profile.distinct_count = distinct(values.iter().flatten());
                let present = values.iter().flatten().copied();
                profile.temporal_range = present.clone().min().zip(present.max());
            }
            ColumnData::Text(values) => {
                profile.distinct_count = distinct(values.iter().flatten());
                let (email, identifier) = self.shape_ratios(values);
                profile.email_ratio = Some(email);
                profile.identifier_ratio = Some(identifier);
            }
        }

        debug!(
            column = %profile.name,
            column_type = %profile.column_type,
            nulls = profile.null_count,
            distinct = profile.distinct_count,
            "profiled column"
        );
        profile
    }

    /// Email and identifier ratios over the (optionally sampled) present values.
    fn shape_ratios(&self, values: &[Option<String>]) -> (f64, f64) {
        let limit = self.config.sample_size.unwrap_or(usize::MAX);
        let min_length = self.config.identifier_min_length;

        let mut sampled = 0usize;
        let mut emails = 0usize;
        let mut identifiers = 0usize;
        for value in values.iter().flatten().take(limit) {
            sampled += 1;
            if EMAIL_REGEX.is_match(value) {
                emails += 1;
            }
            if is_identifier(value, min_length) {
                identifiers += 1;
            }
        }

        if sampled == 0 {
            return (0.0, 0.0);
        }
        (
            emails as f64 / sampled as f64,
            identifiers as f64 / sampled as f64,
        )
    }
}

fn distinct<K: Hash + Eq>(keys: impl Iterator<Item = K>) -> usize {
    keys.collect::<HashSet<K>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::temporal::parse_datetime;

    #[test]
    fn test_numeric_profile() {
        let col = Column::numeric("age", vec![Some(20.0), Some(30.0), None, Some(30.0)]);
        let profile = Profiler::new().profile_column(&col);

        assert_eq!(profile.row_count, 4);
        assert_eq!(profile.null_count, 1);
        assert_eq!(profile.distinct_count, 2);
        assert_eq!(profile.numeric_range, Some((20.0, 30.0)));
        assert!(!profile.is_unique());
        assert_eq!(profile.null_fraction(), 0.25);
        assert!(profile.email_ratio.is_none());
    }

    #[test]
    fn test_temporal_profile() {
        let col = Column::temporal(
            "d",
            vec![parse_datetime("2024-05-01"), parse_datetime("2023-01-01"), None],
        );
        let profile = Profiler::new().profile_column(&col);
        assert_eq!(
            profile.temporal_range,
            Some((
                parse_datetime("2023-01-01").unwrap(),
                parse_datetime("2024-05-01").unwrap()
            ))
        );
        assert!(profile.is_unique());
    }

    #[test]
    fn test_text_ratios() {
        let col = Column::text(
            "email",
            vec![Some("a@b.com"), Some("bad"), Some("c@d.com"), None],
        );
        let profile = Profiler::new().profile_column(&col);
        let email = profile.email_ratio.unwrap();
        assert!((email - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(profile.identifier_ratio, Some(0.0));
    }

    #[test]
    fn test_sampled_ratios_use_prefix() {
        let col = Column::text("id", vec![Some("abcdef"), Some("x"), Some("y"), Some("z")]);
        let profiler = Profiler::with_config(ProfilerConfig {
            sample_size: Some(1),
            ..ProfilerConfig::default()
        });
        assert_eq!(profiler.profile_column(&col).identifier_ratio, Some(1.0));
        assert_eq!(Profiler::new().profile_column(&col).identifier_ratio, Some(0.25));
    }

    #[test]
    fn test_identifier_shape() {
        assert!(is_identifier("user_01", 6));
        assert!(is_identifier("AB-123", 6));
        assert!(!is_identifier("AB-12", 6));
        assert!(!is_identifier("has space", 6));
        assert_eq!(identifier_pattern(6), "[A-Za-z0-9_-]{6,}");
    }

    #[test]
    fn test_repeated_nulls_are_not_unique() {
        let col = Column::numeric("n", vec![Some(1.0), None, None]);
        let profile = Profiler::new().profile_column(&col);
        assert_eq!(profile.distinct_count, 1);
        assert!(!profile.is_unique());
    }

    #[test]
    fn test_all_null_column() {
        let col = Column::text::<String>("empty", vec![None, None]);
        let profile = Profiler::new().profile_column(&col);
        assert_eq!(profile.present_count(), 0);
        assert!(!profile.is_unique());
        assert_eq!(profile.email_ratio, Some(0.0));
    }
}
