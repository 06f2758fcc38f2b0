//! Magic string detection
//!
//! Looks for hardcoded status and role comparisons, and config-like array
//! keys that belong in constants or configuration files.

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

const APP: &str = "app";

static STATUS_EQ: OnceLock<Regex> = OnceLock::new();
static STATUS_IDENTICAL: OnceLock<Regex> = OnceLock::new();
static STATUS_PROPERTY: OnceLock<Regex> = OnceLock::new();
static ROLE_EQ: OnceLock<Regex> = OnceLock::new();
static ROLE_IDENTICAL: OnceLock<Regex> = OnceLock::new();
static CONFIG_KEY: OnceLock<Regex> = OnceLock::new();

pub struct MagicStringsCheck {
    meta: CheckMeta,
}

impl MagicStringsCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("MagicStringsCheck", module_path!())
                .named("Magic Strings Check")
                .described("Identifies hardcoded strings that should be constants or config values"),
        }
    }

    /// Each pattern captures the offending literal in group 1
    fn patterns(&self) -> Result<[&'static Regex; 6]> {
        const STATUS: &str = "active|inactive|pending|published|draft|deleted|archived";
        const ROLE: &str = "admin|user|guest|moderator|super_admin";
        Ok([
            compiled(&STATUS_EQ, &format!(r#"(?i)==\s*['"]\s*({STATUS})\s*['"]"#))?,
            compiled(&STATUS_IDENTICAL, &format!(r#"(?i)===\s*['"]\s*({STATUS})\s*['"]"#))?,
            compiled(
                &STATUS_PROPERTY,
                &format!(r#"(?i)->\w+\s*==\s*['"]\s*({STATUS})\s*['"]"#),
            )?,
            compiled(&ROLE_EQ, &format!(r#"(?i)==\s*['"]\s*({ROLE})\s*['"]"#))?,
            compiled(&ROLE_IDENTICAL, &format!(r#"(?i)===\s*['"]\s*({ROLE})\s*['"]"#))?,
            compiled(
                &CONFIG_KEY,
                r#"(?i)['"]\s*(api_key|secret|password|token|url)\s*['"]\s*=>"#,
            )?,
        ])
    }
}

impl Default for MagicStringsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for MagicStringsCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(APP) {
            return Ok(self.pass("App directory not found"));
        }

        let patterns = self.patterns()?;
        let mut files = Vec::new();

        for (file, content) in read_all(source, APP, "")? {
            if file.relative.contains("vendor") || file.relative.contains("Tests") {
                continue;
            }

            let mut found: Vec<String> = Vec::new();
            for re in &patterns {
                for caps in re.captures_iter(&content) {
                    let literal = &caps[1];
                    if !found.iter().any(|f| f == literal) {
                        found.push(literal.to_string());
                    }
                }
            }

            if !found.is_empty() {
                files.push(json!({
                    "file": relative_to(&file, APP),
                    "magic_strings": found,
                }));
            }
        }

        if !files.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} file(s) with potential magic strings",
                    files.len()
                ))
                .with_meta("files", files)
                .with_recommendation(
                    "Replace magic strings with class constants or config values. Example: Use Model::STATUS_ACTIVE instead of 'active', or config('app.key') instead of hardcoded values.",
                ));
        }

        Ok(self.pass("No obvious magic strings detected"))
    }
}
