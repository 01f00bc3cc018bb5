//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

const REPORT_SCHEMA_FILE: &str = "repo-policy.report.v1.json";
const POLICY_SCHEMA_FILE: &str = "repo-policy.policy.v1.json";

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> anyhow::Result<String>,
}

/// Generate the report envelope schema from the Rust types.
fn generate_report_schema() -> anyhow::Result<String> {
    serialize_schema(&schema_for!(repo_policy_types::ReportEnvelope))
}

/// The policy document schema is hand-written and embedded in `repo-policy-settings`.
fn generate_policy_schema() -> anyhow::Result<String> {
    let value: serde_json::Value = serde_json::from_str(repo_policy_settings::POLICY_SCHEMA)
        .context("Failed to parse embedded policy schema")?;
    let mut json = serde_json::to_string_pretty(&value).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: REPORT_SCHEMA_FILE,
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: POLICY_SCHEMA_FILE,
            generate: generate_policy_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = (spec.generate)()?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = (spec.generate)()?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &missing {
        eprintln!("Missing schema: {name}");
    }
    for name in &mismatched {
        eprintln!("Schema out of date: {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn compile_schema(path: &Path) -> anyhow::Result<jsonschema::Validator> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
    jsonschema::validator_for(&value)
        .map_err(|e| anyhow::anyhow!("Failed to compile {}: {e}", path.display()))
}

fn validation_errors(
    validator: &jsonschema::Validator,
    value: &serde_json::Value,
) -> Vec<String> {
    validator.iter_errors(value).map(|e| e.to_string()).collect()
}

/// Validate every CLI fixture against the emitted schemas.
///
/// `expected.report.json` must satisfy the report schema after normalization, and
/// `policy.json`, when present, the policy schema.
fn conform() -> anyhow::Result<()> {
    let report_schema = compile_schema(&schemas_dir().join(REPORT_SCHEMA_FILE))?;
    let policy_schema = compile_schema(&schemas_dir().join(POLICY_SCHEMA_FILE))?;
    println!("✓ schemas compile");

    let mut fixtures = 0;
    let mut errors = Vec::new();

    let mut entries: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    entries.sort();

    for dir in entries {
        let name = dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let report_path = dir.join("expected.report.json");
        if !report_path.exists() {
            continue;
        }
        fixtures += 1;

        let report: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(&report_path)
                .with_context(|| format!("Failed to read {}", report_path.display()))?,
        )
        .with_context(|| format!("Failed to parse {}", report_path.display()))?;
        let report = repo_policy_test_util::normalize_nondeterministic(report);
        for error in validation_errors(&report_schema, &report) {
            errors.push(format!("{name}/expected.report.json: {error}"));
        }
        if report.get("result").and_then(|r| r.as_str()) != Some("pass")
            && report.get("reason").is_none()
        {
            errors.push(format!("{name}/expected.report.json: non-pass report without reason"));
        }

        let policy_path = dir.join("policy.json");
        if policy_path.exists() {
            let policy: serde_json::Value = serde_json::from_str(
                &fs::read_to_string(&policy_path)
                    .with_context(|| format!("Failed to read {}", policy_path.display()))?,
            )
            .with_context(|| format!("Failed to parse {}", policy_path.display()))?;
            for error in validation_errors(&policy_schema, &policy) {
                errors.push(format!("{name}/policy.json: {error}"));
            }
        }
    }

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Fixture conformance failed with {} errors", errors.len());
    }
    println!("✓ {fixtures} fixtures conform");
    Ok(())
}

/// Validate that all check IDs and job properties have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    use repo_policy_types::explain;

    let check_ids = explain::all_check_ids();
    let mut errors = Vec::new();

    for check_id in check_ids {
        match explain::lookup_explanation(check_id) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Check ID '{check_id}' has empty title"));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Check ID '{check_id}' has empty description"));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("Check ID '{check_id}' has empty remediation"));
                }
            }
            None => errors.push(format!("Check ID '{check_id}' has no explanation")),
        }
    }

    for job_type in repo_policy_types::JobType::ALL {
        for property in job_type.properties() {
            if !check_ids.contains(&property.as_str()) {
                errors.push(format!("Property '{job_type}.{property}' is not a known check ID"));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate tests/fixtures against the emitted schemas");
    eprintln!("  explain-coverage  Validate all check IDs have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
