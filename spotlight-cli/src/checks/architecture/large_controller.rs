//! Controller size check

use super::CONTROLLERS;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use serde_json::json;

/// Controllers longer than this many lines are reported
const LINE_THRESHOLD: usize = 300;

pub struct LargeControllerCheck {
    meta: CheckMeta,
}

impl LargeControllerCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("architecture.large-controller", "architecture")
                .named("Controller Size Check")
                .described("Identifies controllers that may benefit from refactoring"),
        }
    }
}

impl Default for LargeControllerCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for LargeControllerCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(CONTROLLERS) {
            return Ok(self.pass("Controllers directory not found"));
        }

        let mut large = Vec::new();
        for (file, content) in read_all(source, CONTROLLERS, "")? {
            let lines = content.matches('\n').count() + 1;
            if lines > LINE_THRESHOLD {
                large.push(json!({
                    "file": relative_to(&file, CONTROLLERS),
                    "lines": lines,
                }));
            }
        }

        if !large.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} controller(s) over {} lines",
                    large.len(),
                    LINE_THRESHOLD
                ))
                .with_meta("controllers", large)
                .with_meta("threshold", LINE_THRESHOLD)
                .with_recommendation(
                    "Consider extracting business logic to service classes or actions for easier maintenance",
                ));
        }

        Ok(self.pass("All controllers are within recommended size"))
    }
}
