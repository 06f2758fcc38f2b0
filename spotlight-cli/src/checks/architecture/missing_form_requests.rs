//! Form request usage check

use super::CONTROLLERS;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

const FORM_REQUESTS: &str = "app/Http/Requests";

static INLINE_VALIDATION: OnceLock<Regex> = OnceLock::new();

pub struct MissingFormRequestsCheck {
    meta: CheckMeta,
}

impl MissingFormRequestsCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("architecture.missing-form-requests", "architecture")
                .named("Form Request Usage Check")
                .described(
                    "Identifies controllers that may benefit from using Form Request classes for validation",
                ),
        }
    }
}

impl Default for MissingFormRequestsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for MissingFormRequestsCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(CONTROLLERS) {
            return Ok(self.pass("Controllers directory not found"));
        }

        let validation = compiled(
            &INLINE_VALIDATION,
            r"(?i)(\$request->validate|Request::validate|Validator::make)",
        )?;
        let has_form_requests = !source.files(FORM_REQUESTS).is_empty();

        let mut controllers = Vec::new();
        for (file, content) in read_all(source, CONTROLLERS, "")? {
            if validation.is_match(&content) {
                controllers.push(json!({ "file": relative_to(&file, CONTROLLERS) }));
            }
        }

        if controllers.is_empty() {
            return Ok(self.pass("Validation appears to be properly organized"));
        }

        let outcome = if has_form_requests {
            self.suggest(
                "Some controllers use inline validation - Form Requests are available and recommended",
            )
            .with_meta("controllers", controllers)
            .with_recommendation(
                "Move validation logic to Form Request classes for better organization and reusability",
            )
        } else {
            self.suggest(format!(
                "Found {} controller(s) with inline validation",
                controllers.len()
            ))
            .with_meta("controllers", controllers)
            .with_recommendation(
                "Consider using Form Request classes (php artisan make:request) to separate validation logic from controllers",
            )
        };

        Ok(outcome)
    }
}
