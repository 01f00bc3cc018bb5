use serde_json::Value;
use std::sync::OnceLock;

/// JSON schema (draft 7) every policy document must satisfy.
pub const POLICY_SCHEMA: &str = include_str!("../schemas/policy.schema.json");

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyParseError {
    #[error("{}", .0.join("; "))]
    Schema(Vec<String>),
    #[error("policy schema could not be compiled: {0}")]
    Compile(String),
    #[error("{0}")]
    Model(String),
}

fn validator() -> Result<&'static jsonschema::Validator, PolicyParseError> {
    static VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
    VALIDATOR
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(POLICY_SCHEMA).map_err(|e| e.to_string())?;
            jsonschema::draft7::new(&schema).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| PolicyParseError::Compile(e.clone()))
}

/// Validate `raw` against [`POLICY_SCHEMA`], collecting every violation.
pub fn check_schema(raw: &Value) -> Result<(), PolicyParseError> {
    let errors: Vec<String> = validator()?
        .iter_errors(raw)
        .map(|err| err.to_string())
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PolicyParseError::Schema(errors))
    }
}
