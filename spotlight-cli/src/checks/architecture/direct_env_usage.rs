//! Direct `env()` usage check
//!
//! `env()` returns null once the configuration is cached, so application code
//! should read values through `config()`.

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

const APP: &str = "app";

static ENV_CALL: OnceLock<Regex> = OnceLock::new();

pub struct DirectEnvUsageCheck {
    meta: CheckMeta,
}

impl DirectEnvUsageCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("DirectEnvUsageCheck", module_path!())
                .named("Direct ENV Usage Check")
                .described("Identifies direct env() usage that should use config() instead"),
        }
    }
}

impl Default for DirectEnvUsageCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for DirectEnvUsageCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(APP) {
            return Ok(self.pass("App directory not found"));
        }

        let env_call = compiled(&ENV_CALL, r"(?i)env\s*\(")?;

        let mut files = Vec::new();
        let mut total = 0;
        for (file, content) in read_all(source, APP, "")? {
            // Config files are allowed to call env()
            if file.relative.contains("config") {
                continue;
            }
            let count = env_call.find_iter(&content).count();
            if count > 0 {
                total += count;
                files.push(json!({
                    "file": relative_to(&file, APP),
                    "count": count,
                }));
            }
        }

        if !files.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} file(s) with direct env() usage ({} total)",
                    files.len(),
                    total
                ))
                .with_meta("files", files)
                .with_recommendation(
                    "Use config() helper instead of env() directly. Add values to config files and access via config() for better performance and testability.",
                ));
        }

        Ok(self.pass("No direct env() usage found in application code"))
    }
}
