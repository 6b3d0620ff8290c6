//! Load schema metadata from JSON (string or file). Validates before returning.

use crate::config::{validate, Schema};
use crate::error::ConfigError;
use std::path::Path;

/// Schema file used when `SCHEMA_PATH` is unset.
pub const DEFAULT_SCHEMA_PATH: &str = "schema.json";

/// Parse and validate a schema document.
/// Accepts either `{ "models": { ... } }` or a bare `{ "User": { ... } }` model map.
pub fn load_from_str(json: &str) -> Result<Schema, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    let schema: Schema = if value.get("models").map(|m| m.is_object()).unwrap_or(false) {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(serde_json::json!({ "models": value }))
    }
    .map_err(|e| ConfigError::Load(e.to_string()))?;
    validate(&schema)?;
    tracing::debug!(models = schema.models.len(), "schema loaded");
    Ok(schema)
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Schema, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    load_from_str(&raw)
}
