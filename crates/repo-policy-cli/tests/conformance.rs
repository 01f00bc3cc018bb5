//! Conformance tests for repo-policy.
//!
//! These tests validate:
//! 1. All check IDs and job properties have explanations
//! 2. All fixture reports validate against the emitted report schema
//! 3. Every fixture is wired into `fixtures.rs`

use repo_policy_types::{JobType, explain};
use serde_json::Value;
use std::path::PathBuf;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("repo-policy-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .to_path_buf()
}

fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(repo_root().join("tests").join("fixtures"))
        .expect("read fixtures dir")
        .map(|entry| entry.expect("fixture entry").path())
        .filter(|path| path.join("expected.report.json").exists())
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn all_check_ids_have_explanations() {
    for check_id in explain::all_check_ids() {
        let exp = explain::lookup_explanation(check_id)
            .unwrap_or_else(|| panic!("Check ID '{check_id}' has no explanation in registry"));
        assert!(!exp.title.is_empty(), "Check ID '{check_id}' has empty title");
        assert!(
            !exp.description.is_empty(),
            "Check ID '{check_id}' has empty description"
        );
        assert!(
            !exp.remediation.is_empty(),
            "Check ID '{check_id}' has empty remediation"
        );
    }
}

#[test]
fn every_job_property_is_explained() {
    for job_type in JobType::ALL {
        for property in job_type.properties() {
            assert!(
                explain::lookup_explanation(property.as_str()).is_some(),
                "{job_type}.{property} has no explanation"
            );
        }
    }
}

#[test]
fn fixture_reports_validate_against_schema() {
    let schema_path = repo_root().join("schemas").join("repo-policy.report.v1.json");
    let schema: Value =
        serde_json::from_str(&std::fs::read_to_string(&schema_path).expect("read report schema"))
            .expect("parse report schema");
    let validator = jsonschema::validator_for(&schema).expect("compile report schema");

    let names = fixture_names();
    assert!(!names.is_empty(), "no fixtures found");
    for name in names {
        let path = repo_root()
            .join("tests")
            .join("fixtures")
            .join(&name)
            .join("expected.report.json");
        let report: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let errors: Vec<String> = validator.iter_errors(&report).map(|e| e.to_string()).collect();
        assert!(errors.is_empty(), "fixture '{name}' violates schema: {errors:?}");
    }
}

#[test]
fn every_fixture_has_a_test() {
    let tests = std::fs::read_to_string(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures.rs"),
    )
    .expect("read fixtures.rs");
    for name in fixture_names() {
        assert!(
            tests.contains(&format!("check_fixture(\"{name}\")")),
            "fixture '{name}' is not exercised by fixtures.rs"
        );
    }
}
