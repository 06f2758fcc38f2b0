//! Mass assignment protection check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

const MODELS: &str = "app/Models";

static ELOQUENT_MODEL: OnceLock<Regex> = OnceLock::new();

pub struct MissingMassAssignmentProtectionCheck {
    meta: CheckMeta,
}

impl MissingMassAssignmentProtectionCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("MissingMassAssignmentProtectionCheck", module_path!())
                .named("Mass Assignment Protection Check")
                .described("Identifies models that may be missing mass assignment protection"),
        }
    }
}

impl Default for MissingMassAssignmentProtectionCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for MissingMassAssignmentProtectionCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(MODELS) {
            return Ok(self.pass("Models directory not found"));
        }

        let eloquent = compiled(&ELOQUENT_MODEL, r"(?i)extends\s+Model")?;

        let mut unprotected = Vec::new();
        for (file, content) in read_all(source, MODELS, "")? {
            if !eloquent.is_match(&content) {
                continue;
            }
            if !content.contains("$fillable") && !content.contains("$guarded") {
                unprotected.push(json!({ "file": relative_to(&file, MODELS) }));
            }
        }

        if !unprotected.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} model(s) without mass assignment protection",
                    unprotected.len()
                ))
                .with_meta("models", unprotected)
                .with_recommendation(
                    "Add $fillable or $guarded property to protect against mass assignment vulnerabilities. Prefer $fillable for explicit allow-list.",
                ));
        }

        Ok(self.pass("All models appear to have mass assignment protection"))
    }
}
