//! Proposes a rule specification from column profiles.

use tracing::{debug, info, instrument};

use crate::dataset::Dataset;
use crate::dataset::temporal::format_datetime;
use crate::rules::{Bound, ColumnRules, RuleClause, RuleSpec};

use super::profiler::{
    ColumnProfile, EMAIL_PATTERN, Profiler, ProfilerConfig, identifier_pattern,
};

/// Builds candidate rules from observed data.
///
/// Suggested ranges are the observed extrema, so applying the suggestion back
/// to the same dataset reports no range issues. A pattern is proposed once a
/// majority of values match it; the minority is flagged.
#[derive(Debug, Clone, Default)]
pub struct RuleSuggester {
    profiler: Profiler,
}

impl RuleSuggester {
    /// Create a suggester with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a suggester with custom thresholds.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self {
            profiler: Profiler::with_config(config),
        }
    }

    pub fn config(&self) -> &ProfilerConfig {
        self.profiler.config()
    }

    /// Suggest rules for every column. Columns with no applicable clause are omitted.
    #[instrument(skip_all, fields(columns = dataset.column_count()))]
    pub fn suggest(&self, dataset: &Dataset) -> RuleSpec {
        self.suggest_from_profiles(&self.profiler.profile(dataset))
    }

    /// Suggest rules from profiles that were already computed.
    pub fn suggest_from_profiles(&self, profiles: &[ColumnProfile]) -> RuleSpec {
        let mut spec = RuleSpec::new();
        for profile in profiles {
            let clauses = self.suggest_column(profile);
            if clauses.is_empty() {
                debug!(column = %profile.name, "no rules suggested");
                continue;
            }
            spec.push(ColumnRules::new(profile.name.clone(), clauses));
        }

        info!(
            policies = spec.policy_count(),
            clauses = spec.clause_count(),
            "suggested rules"
        );
        spec
    }

    /// Clauses for one profiled column, in the order not_null, unique, range, pattern.
    pub fn suggest_column(&self, profile: &ColumnProfile) -> Vec<RuleClause> {
        let config = self.profiler.config();
        let mut clauses = Vec::new();

        if profile.row_count > 0 && profile.null_fraction() <= config.max_null_fraction {
            clauses.push(RuleClause::NotNull);
        }

        if profile.is_unique() {
            clauses.push(RuleClause::Unique);
        }

        if let Some((min, max)) = profile.numeric_range {
            clauses.push(RuleClause::range(min, max));
        }

        if let Some((min, max)) = profile.temporal_range {
            clauses.push(RuleClause::range_bounds(
                Some(Bound::Text(format_datetime(&min))),
                Some(Bound::Text(format_datetime(&max))),
            ));
        }

        let threshold = config.pattern_ratio_threshold;
        if profile.email_ratio.is_some_and(|r| r > threshold) {
            clauses.push(RuleClause::pattern(EMAIL_PATTERN));
        } else if profile.identifier_ratio.is_some_and(|r| r > threshold) {
            clauses.push(RuleClause::pattern(identifier_pattern(
                config.identifier_min_length,
            )));
        }

        clauses
    }
}
