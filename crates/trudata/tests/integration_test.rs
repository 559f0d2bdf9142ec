//! Integration tests for Trudata.

use std::io::Write;
use tempfile::NamedTempFile;

use trudata::{
    ClauseError, ColumnType, EngineConfig, Loader, RuleClause, RuleEngine, RuleSpec,
    RuleSuggester, Trudata, TrudataConfig, TrudataError, UniquePolicy,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const AGE_RULES: &str = "\
rules:
  - column: age
    rules:
      - not_null
      - unique
";

// =============================================================================
// Validation Scenarios
// =============================================================================

#[test]
fn test_age_not_null_and_unique() {
    let file = create_test_file("age\n25\n30\nNA\n30\n");
    let spec = RuleSpec::from_yaml_str(AGE_RULES).unwrap();

    let result = Trudata::new().validate(file.path(), &spec).unwrap();
    let issues = &result.report.issues;

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].clause, RuleClause::NotNull);
    assert_eq!(issues[0].rows, vec![2]);
    assert_eq!(issues[1].clause, RuleClause::Unique);
    assert_eq!(issues[1].rows, vec![3]);
    assert_eq!(result.report.failed_rows, 2);
    assert_eq!(result.summary.policy_count, 1);
    assert!(!result.summary.compliant);
}

#[test]
fn test_age_unique_flag_all() {
    let file = create_test_file("age\n25\n30\nNA\n30\n");
    let spec = RuleSpec::from_yaml_str(AGE_RULES).unwrap();
    let trudata = Trudata::with_config(TrudataConfig {
        engine: EngineConfig {
            unique_policy: UniquePolicy::All,
            ..EngineConfig::default()
        },
        ..TrudataConfig::default()
    });

    let result = trudata.validate(file.path(), &spec).unwrap();
    assert_eq!(result.report.issues[1].rows, vec![1, 3]);
    assert_eq!(result.report.failed_rows, 3);
}

#[test]
fn test_email_suggestion_round_trip() {
    let file = create_test_file("email\na@b.com\nbad\nc@d.com\n");
    let trudata = Trudata::new();

    let suggested = trudata.suggest(file.path()).unwrap();
    let email_rules = &suggested.spec.get("email").unwrap().rules;
    assert!(email_rules.contains(&RuleClause::pattern(r"[^@]+@[^@]+\.[^@]+")));

    let result = trudata.validate(file.path(), &suggested.spec).unwrap();
    let pattern_issue = result
        .report
        .issues
        .iter()
        .find(|i| i.clause.kind() == "pattern")
        .expect("pattern issue");
    assert_eq!(pattern_issue.rows, vec![1]);
}

#[test]
fn test_suggested_ranges_hold_on_source() {
    let content = "id,score,joined,code\n\
                   1,3.5,2024-01-01,ABC123\n\
                   2,-1,2023-12-31 08:15:00,XYZ789\n\
                   3,10,2024-02-29,QWE456\n\
                   4,,2024-03-01,RTY000\n";
    let file = create_test_file(content);
    let trudata = Trudata::new();

    let spec = trudata.suggest(file.path()).unwrap().spec;
    let result = trudata.validate(file.path(), &spec).unwrap();

    assert!(result.report.config_errors.is_empty());
    assert!(
        result
            .report
            .issues
            .iter()
            .all(|i| !matches!(i.clause.kind(), "range" | "pattern")),
        "{:?}",
        result.report.issues
    );
}

#[test]
fn test_range_bounds_are_inclusive() {
    let file = create_test_file("age\n0\n120\n-1\n121\n");
    let spec = RuleSpec::new().with_column("age", vec![RuleClause::range(0.0, 120.0)]);

    let result = Trudata::new().validate(file.path(), &spec).unwrap();
    assert_eq!(result.report.issues.len(), 1);
    assert_eq!(result.report.issues[0].rows, vec![2, 3]);
    assert_eq!(result.report.issues[0].description, "age out of range [0, 120]");
}

#[test]
fn test_temporal_range_from_yaml() {
    let file = create_test_file("visit\n2024-01-01\n2023-06-15\n2025-02-01\n");
    let spec = RuleSpec::from_yaml_str(
        "rules:\n  - column: visit\n    rules:\n      - range: {min: '2024-01-01', max: '2024-12-31'}\n",
    )
    .unwrap();

    let result = Trudata::new().validate(file.path(), &spec).unwrap();
    assert_eq!(result.report.issues[0].rows, vec![1, 2]);
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn test_missing_column_is_reported_not_fatal() {
    let file = create_test_file("age\n25\nNA\n");
    let spec = RuleSpec::new()
        .with_column("height", vec![RuleClause::NotNull])
        .with_column("age", vec![RuleClause::NotNull]);

    let result = Trudata::new().validate(file.path(), &spec).unwrap();
    assert_eq!(result.report.config_errors.len(), 1);
    assert_eq!(
        result.report.config_errors[0].error,
        ClauseError::MissingColumn {
            column: "height".to_string()
        }
    );
    assert_eq!(result.report.issues.len(), 1);
    assert_eq!(result.summary.config_error_count, 1);
}

#[test]
fn test_pattern_on_numeric_column() {
    let file = create_test_file("age\n25\n30\n");
    let spec = RuleSpec::new().with_column("age", vec![RuleClause::pattern("[0-9]+")]);

    let result = Trudata::new().validate(file.path(), &spec).unwrap();
    assert!(matches!(
        result.report.config_errors[0].error,
        ClauseError::IncompatibleType {
            column_type: ColumnType::Numeric,
            ..
        }
    ));
}

#[test]
fn test_unknown_clause_rejected_at_parse() {
    let err = RuleSpec::from_yaml_str("rules:\n  - column: a\n    rules: [positive]\n").unwrap_err();
    assert!(matches!(err, TrudataError::Yaml(_)));
}

#[test]
fn test_header_only_file_is_empty_data() {
    let file = create_test_file("age,name\n");
    let err = Trudata::new()
        .validate(file.path(), &RuleSpec::new())
        .unwrap_err();
    assert!(matches!(err, TrudataError::EmptyData(_)));
}

// =============================================================================
// Loader
// =============================================================================

#[test]
fn test_loader_metadata_and_types() {
    let content = "sample_id\tcollected\tweight\tnote\n\
                   S001\t2024-01-05\t1.5\tok\n\
                   S002\tNA\t2.0\t\n";
    let file = create_test_file(content);

    let (dataset, source) = Loader::new().load_file(file.path()).unwrap();

    assert_eq!(source.format, "tsv");
    assert_eq!(source.row_count, 2);
    assert_eq!(source.column_count, 4);
    assert!(source.hash.starts_with("sha256:"));
    assert_eq!(dataset.column("collected").unwrap().column_type(), ColumnType::Temporal);
    assert_eq!(dataset.column("weight").unwrap().column_type(), ColumnType::Numeric);
    assert_eq!(dataset.column("note").unwrap().null_rows(), vec![1]);
}

// =============================================================================
// In-memory API
// =============================================================================

#[test]
fn test_in_memory_suggest_then_apply() {
    let dataset = Loader::new()
        .load_bytes(b"user,age\nalice_01,31\nbobby_02,45\ncarol_03,27\n")
        .unwrap();

    let spec = RuleSuggester::new().suggest(&dataset);
    let user_rules = &spec.get("user").unwrap().rules;
    assert_eq!(
        user_rules,
        &vec![
            RuleClause::NotNull,
            RuleClause::Unique,
            RuleClause::pattern("[A-Za-z0-9_-]{6,}"),
        ]
    );

    let report = RuleEngine::new().apply(&dataset, &spec);
    assert!(report.is_clean());
}

#[test]
fn test_report_serializes_to_json() {
    let dataset = Loader::new().load_bytes(b"age\n25\nNA\n").unwrap();
    let spec = RuleSpec::new().with_column("age", vec![RuleClause::NotNull]);
    let report = RuleEngine::new().apply(&dataset, &spec);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["issues"][0]["rule"], "age must not be null");
    assert_eq!(json["issues"][0]["rows"][0], 1);
    assert_eq!(json["failed_rows"], 1);
}
