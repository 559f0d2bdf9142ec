//! Main Trudata struct and public API.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::dataset::{Dataset, Loader, LoaderConfig, SourceMetadata};
use crate::engine::{EngineConfig, IssueReport, RuleEngine};
use crate::error::{Result, TrudataError};
use crate::profile::{ColumnProfile, Profiler, ProfilerConfig, RuleSuggester};
use crate::rules::RuleSpec;
use crate::summary::QualitySummary;

/// Configuration for every stage of a Trudata run.
#[derive(Debug, Clone, Default)]
pub struct TrudataConfig {
    /// Loader configuration.
    pub loader: LoaderConfig,
    /// Rule engine configuration.
    pub engine: EngineConfig,
    /// Profiling and suggestion thresholds.
    pub profiler: ProfilerConfig,
}

/// Result of validating a data file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Rows that violate each clause.
    pub report: IssueReport,
    /// Score and compliance.
    pub summary: QualitySummary,
}

/// Result of suggesting rules for a data file.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Statistics the suggestion was derived from.
    pub profiles: Vec<ColumnProfile>,
    /// Candidate rules.
    pub spec: RuleSpec,
}

/// Loads files and runs the engine, profiler and summary over them.
#[derive(Debug, Clone)]
pub struct Trudata {
    loader: Loader,
    engine: RuleEngine,
    profiler: Profiler,
    suggester: RuleSuggester,
}

impl Trudata {
    /// Create a new Trudata instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(TrudataConfig::default())
    }

    /// Create a Trudata instance with custom configuration.
    pub fn with_config(config: TrudataConfig) -> Self {
        Self {
            loader: Loader::with_config(config.loader),
            engine: RuleEngine::with_config(config.engine),
            profiler: Profiler::with_config(config.profiler.clone()),
            suggester: RuleSuggester::with_config(config.profiler),
        }
    }

    /// Load a data file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.loader.load_file(path)
    }

    /// Validate a data file against a rule specification.
    pub fn validate(&self, path: impl AsRef<Path>, spec: &RuleSpec) -> Result<ValidationResult> {
        let (dataset, source) = self.load(path)?;
        self.validate_dataset(&dataset, source, spec)
    }

    /// Validate an already loaded dataset.
    pub fn validate_dataset(
        &self,
        dataset: &Dataset,
        source: SourceMetadata,
        spec: &RuleSpec,
    ) -> Result<ValidationResult> {
        let report = self.engine.apply(dataset, spec);
        let summary = QualitySummary::compute(&report, dataset.row_count(), spec)?;

        info!(
            file = %source.file,
            failed_rows = summary.failed_rows,
            score = summary.quality_score,
            compliant = summary.compliant,
            "validated"
        );

        Ok(ValidationResult {
            source,
            report,
            summary,
        })
    }

    /// Validate a rule document file against a data file.
    pub fn validate_with_rules_file(
        &self,
        path: impl AsRef<Path>,
        rules_path: impl AsRef<Path>,
    ) -> Result<ValidationResult> {
        let spec = load_rules(rules_path)?;
        self.validate(path, &spec)
    }

    /// Suggest rules for a data file.
    pub fn suggest(&self, path: impl AsRef<Path>) -> Result<SuggestionResult> {
        let (dataset, source) = self.load(path)?;
        let profiles = self.profiler.profile(&dataset);
        let spec = self.suggester.suggest_from_profiles(&profiles);

        Ok(SuggestionResult {
            source,
            profiles,
            spec,
        })
    }

    /// Profile every column of a data file.
    pub fn profile(&self, path: impl AsRef<Path>) -> Result<(SourceMetadata, Vec<ColumnProfile>)> {
        let (dataset, source) = self.load(path)?;
        Ok((source, self.profiler.profile(&dataset)))
    }

    /// Apply a specification to an already loaded dataset.
    pub fn apply(&self, dataset: &Dataset, spec: &RuleSpec) -> IssueReport {
        self.engine.apply(dataset, spec)
    }
}

impl Default for Trudata {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a rule document; `.json` files are JSON, anything else YAML.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSpec> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| TrudataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        RuleSpec::from_json_str(&source)
    } else {
        RuleSpec::from_yaml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_age_scenario() {
        let data = create_test_file("id,age\n0,25\n1,30\n2,\n3,30\n", ".csv");
        let rules = create_test_file(
            "rules:\n  - column: age\n    rules: [not_null, unique]\n",
            ".yaml",
        );

        let result = Trudata::new()
            .validate_with_rules_file(data.path(), rules.path())
            .unwrap();

        assert_eq!(result.report.issues.len(), 2);
        assert_eq!(result.report.issues[0].rows, vec![2]);
        assert_eq!(result.report.issues[1].rows, vec![3]);
        assert_eq!(result.summary.failed_rows, 2);
        assert_eq!(result.summary.quality_score, 0.5);
        assert_eq!(result.source.row_count, 4);
    }

    #[test]
    fn test_json_rules_file() {
        let rules = create_test_file(
            r#"{"rules": [{"column": "age", "rules": [{"range": {"min": 0, "max": 120}}]}]}"#,
            ".json",
        );
        let spec = load_rules(rules.path()).unwrap();
        assert_eq!(spec.clause_count(), 1);
    }

    #[test]
    fn test_suggest_email_column() {
        let data = create_test_file("email\na@b.com\nbad\nc@d.com\n", ".csv");
        let result = Trudata::new().suggest(data.path()).unwrap();

        let email = result.spec.get("email").unwrap();
        assert!(email.rules.iter().any(|c| c.kind() == "pattern"));
        assert_eq!(result.profiles.len(), 1);
    }

    #[test]
    fn test_validate_loaded_dataset() {
        let data = create_test_file("id,age\n0,25\n1,NA\n", ".csv");
        let trudata = Trudata::new();
        let (dataset, source) = trudata.load(data.path()).unwrap();
        let spec = RuleSpec::new().with_column("age", vec![crate::rules::RuleClause::NotNull]);

        let result = trudata.validate_dataset(&dataset, source, &spec).unwrap();
        let row = result.report.issues[0].rows[0];
        assert_eq!(dataset.row_values(row), vec!["1".to_string(), "".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let err = Trudata::new().profile("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, TrudataError::Io { .. }));
    }
}
