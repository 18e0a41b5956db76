//! Settings loading from configuration files.
//!
//! Loads [`BinderSettings`] from TOML or JSON documents and applies
//! environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMBIND_MAX_MULTIPART_MEMORY` | `max_multipart_memory` (bytes) |
//! | `FORMBIND_DEBUG` | `debug` |
//! | `FORMBIND_LOG_LEVEL` | `log_level` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formbind_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/formbind.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/formbind.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::BindError;
use crate::settings::BinderSettings;

/// Loads settings from a TOML string.
///
/// Keys missing from the document keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<BinderSettings, BindError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| BindError::Configuration(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<BinderSettings, BindError> {
    let content = read_file(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<BinderSettings, BindError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// Keys missing from the document keep their default values.
pub fn from_json_str(json_str: &str) -> Result<BinderSettings, BindError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| BindError::Configuration(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<BinderSettings, BindError> {
    let content = read_file(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> BinderSettings {
    let mut settings = BinderSettings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// - `FORMBIND_MAX_MULTIPART_MEMORY` -> `max_multipart_memory` (ignored unless a valid byte count)
/// - `FORMBIND_DEBUG` -> `debug` ("true"/"1"/"yes" => true, anything else => false)
/// - `FORMBIND_LOG_LEVEL` -> `log_level`
pub fn apply_env_overrides(settings: &mut BinderSettings) {
    if let Ok(val) = std::env::var("FORMBIND_MAX_MULTIPART_MEMORY") {
        if let Ok(bytes) = val.trim().parse::<usize>() {
            settings.max_multipart_memory = bytes;
        }
    }

    if let Ok(val) = std::env::var("FORMBIND_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("FORMBIND_LOG_LEVEL") {
        settings.log_level = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_file(path: &Path, format: &str) -> Result<String, BindError> {
    std::fs::read_to_string(path).map_err(|e| {
        BindError::Configuration(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<BinderSettings, BindError> {
    let default_json = serde_json::to_value(BinderSettings::default()).map_err(|e| {
        BindError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        BindError::Configuration(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
