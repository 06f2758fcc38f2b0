//! Logic in route files check

use super::ROUTES;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, control_flow_count, count_method_calls};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

const COMPLEXITY_THRESHOLD: usize = 5;

/// Route-definition builder calls
const ROUTE_METHODS: [&str; 10] = [
    "get", "post", "put", "patch", "delete", "name", "middleware", "group", "prefix", "where",
];

static QUERY: OnceLock<Regex> = OnceLock::new();

pub struct LogicInRoutesCheck {
    meta: CheckMeta,
}

impl LogicInRoutesCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("LogicInRoutesCheck", module_path!())
                .named("Logic in Routes Check")
                .described("Identifies complex logic in route files that should be in controllers"),
        }
    }

    fn complexity(&self, content: &str) -> Result<usize> {
        let queries = compiled(&QUERY, r"(?i)DB::|::(all|get|find|where|first)")?
            .find_iter(content)
            .count();
        Ok(control_flow_count(content) + queries + count_method_calls(content, &ROUTE_METHODS)?)
    }
}

impl Default for LogicInRoutesCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for LogicInRoutesCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(ROUTES) {
            return Ok(self.pass("Routes directory not found"));
        }

        let mut routes = Vec::new();
        for file in source.files(ROUTES).iter().filter(|f| f.has_suffix(".php")) {
            let content = source.read(file)?;
            let complexity = self.complexity(&content)?;
            if complexity > COMPLEXITY_THRESHOLD {
                routes.push(json!({
                    "file": file.file_name(),
                    "complexity_score": complexity,
                }));
            }
        }

        if !routes.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} route file(s) with complex logic",
                    routes.len()
                ))
                .with_meta("routes", routes)
                .with_recommendation(
                    "Move complex logic from route closures to controller methods for better organization and testability",
                ));
        }

        Ok(self.pass("Route files appear to be clean of complex logic"))
    }
}
