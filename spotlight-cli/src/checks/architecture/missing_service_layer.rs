//! Service layer check
//!
//! Scores each controller by its non-framework method calls plus conditionals
//! and loops. Controllers above the threshold are said to hold business logic.

use super::CONTROLLERS;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{control_flow_count, count_method_calls, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use serde_json::json;

const SERVICES: &str = "app/Services";
const COMPLEXITY_THRESHOLD: usize = 10;

/// Calls starting with these names are ordinary request/response plumbing
const FRAMEWORK_METHODS: [&str; 15] = [
    "get", "post", "put", "patch", "delete", "all", "input", "has", "exists", "validate",
    "route", "redirect", "view", "json", "response",
];

pub struct MissingServiceLayerCheck {
    meta: CheckMeta,
}

impl MissingServiceLayerCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("architecture.missing-service-layer", "architecture")
                .named("Service Layer Check")
                .described(
                    "Checks if application uses service layer pattern for business logic separation",
                ),
        }
    }
}

impl Default for MissingServiceLayerCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for MissingServiceLayerCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        let has_services = !source.all_files(SERVICES).is_empty();

        if !source.exists(CONTROLLERS) {
            return Ok(self.pass("Controllers directory not found"));
        }

        let mut controllers = Vec::new();
        for (file, content) in read_all(source, CONTROLLERS, "")? {
            let complexity =
                count_method_calls(&content, &FRAMEWORK_METHODS)? + control_flow_count(&content);
            if complexity > COMPLEXITY_THRESHOLD {
                controllers.push(json!({
                    "file": relative_to(&file, CONTROLLERS),
                    "complexity_score": complexity,
                    "lines": content.matches('\n').count() + 1,
                }));
            }
        }

        if controllers.is_empty() {
            return Ok(self.pass(
                "Service layer pattern appears to be in use or controllers are appropriately thin",
            ));
        }

        let outcome = if has_services {
            self.suggest(
                "Some controllers still contain business logic - service layer exists but may not be fully utilized",
            )
            .with_meta("controllers", controllers)
            .with_recommendation("Consider moving remaining business logic to service classes")
        } else {
            self.suggest(format!(
                "Found {} controller(s) with business logic - service layer not detected",
                controllers.len()
            ))
            .with_meta("controllers", controllers)
            .with_recommendation(
                "Consider creating a Services directory and extracting business logic from controllers to service classes",
            )
        };

        Ok(outcome)
    }
}
