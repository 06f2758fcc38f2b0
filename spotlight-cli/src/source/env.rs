//! `.env` parsing and Laravel-style value helpers

use super::SourceReader;
use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Read a `.env` file into key/value pairs without touching the process
/// environment.
///
/// `${VAR}` references resolve against earlier keys in the same file.
/// Lines that fail to parse are skipped.
pub fn load_dotenv(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    let entries = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    for entry in entries {
        match entry {
            Ok((key, value)) => {
                values.insert(key, value);
            }
            Err(e) => debug!("Skipping unparseable line in {}: {}", path.display(), e),
        }
    }

    Ok(values)
}

/// Interpret a configuration string as a boolean
pub fn env_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "(true)" | "1" | "yes" | "on" => Some(true),
        "false" | "(false)" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A non-empty `.env` value; `null` and `(null)` read as absent
pub fn env_string(source: &dyn SourceReader, key: &str) -> Option<String> {
    let value = source.env(key)?;
    match value.trim().to_lowercase().as_str() {
        "" | "null" | "(null)" => None,
        _ => Some(value.trim().to_string()),
    }
}

/// Boolean `.env` value with a fallback when unset or unparseable
pub fn env_flag(source: &dyn SourceReader, key: &str, default: bool) -> bool {
    env_string(source, key)
        .and_then(|v| env_bool(&v))
        .unwrap_or(default)
}

/// `APP_ENV`, defaulting to `production` like a fresh Laravel config
pub fn app_environment(source: &dyn SourceReader) -> String {
    env_string(source, "APP_ENV").unwrap_or_else(|| "production".to_string())
}

pub fn is_production(source: &dyn SourceReader) -> bool {
    app_environment(source).eq_ignore_ascii_case("production")
}
