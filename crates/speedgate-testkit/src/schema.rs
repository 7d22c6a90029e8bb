//! JSON schema validators for speedgate DTOs.
//!
//! Schemas live in `schemas/` at the workspace root and are regenerated with
//! `cargo xtask schema`.

use jsonschema::JSONSchema;
use speedgate_types::{ConfigFile, JsonReport};

/// Error type for schema validation failures.
#[derive(Debug)]
pub struct SchemaValidationError {
    /// The validation errors.
    pub errors: Vec<String>,
}

impl std::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema validation failed: {}", self.errors.join("; "))
    }
}

impl std::error::Error for SchemaValidationError {}

pub fn load_report_schema() -> JSONSchema {
    let schema_str = include_str!("../../../schemas/speedgate.report.schema.json");
    let schema: serde_json::Value =
        serde_json::from_str(schema_str).expect("Report schema should be valid JSON");
    JSONSchema::compile(&schema).expect("Report schema should compile")
}

pub fn load_config_schema() -> JSONSchema {
    let schema_str = include_str!("../../../schemas/speedgate.config.schema.json");
    let schema: serde_json::Value =
        serde_json::from_str(schema_str).expect("Config schema should be valid JSON");
    JSONSchema::compile(&schema).expect("Config schema should compile")
}

/// Validate a rendered `json` report (as parsed JSON) against its schema.
pub fn validate_report_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    let schema = load_report_schema();
    validate_with_schema(&schema, json)
}

pub fn validate_json_report(report: &JsonReport) -> Result<(), SchemaValidationError> {
    let json_value = serde_json::to_value(report).expect("JsonReport should serialize to JSON");
    validate_report_json(&json_value)
}

pub fn validate_config_file(config: &ConfigFile) -> Result<(), SchemaValidationError> {
    let schema = load_config_schema();
    let json_value = serde_json::to_value(config).expect("ConfigFile should serialize to JSON");
    validate_with_schema(&schema, &json_value)
}

fn validate_with_schema(
    schema: &JSONSchema,
    json: &serde_json::Value,
) -> Result<(), SchemaValidationError> {
    match schema.validate(json) {
        Ok(()) => Ok(()),
        Err(errors) => Err(SchemaValidationError {
            errors: errors.map(|e| e.to_string()).collect(),
        }),
    }
}
