//! Direct DB facade usage in controllers

use super::CONTROLLERS;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

static DB_FACADE: OnceLock<Regex> = OnceLock::new();

pub struct DirectDbQueriesCheck {
    meta: CheckMeta,
}

impl DirectDbQueriesCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("DirectDbQueriesCheck", module_path!())
                .named("Direct DB Queries Check")
                .described(
                    "Identifies direct database queries in controllers that could use repositories or models",
                ),
        }
    }
}

impl Default for DirectDbQueriesCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for DirectDbQueriesCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(CONTROLLERS) {
            return Ok(self.pass("Controllers directory not found"));
        }

        let db = compiled(
            &DB_FACADE,
            r"(?i)DB::(table|select|insert|update|delete|raw|statement)",
        )?;

        let mut controllers = Vec::new();
        let mut total = 0;
        for (file, content) in read_all(source, CONTROLLERS, "")? {
            let count = db.find_iter(&content).count();
            if count > 0 {
                total += count;
                controllers.push(json!({
                    "file": relative_to(&file, CONTROLLERS),
                    "query_count": count,
                }));
            }
        }

        if !controllers.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} controller(s) with direct DB queries ({} total)",
                    controllers.len(),
                    total
                ))
                .with_meta("controllers", controllers)
                .with_recommendation(
                    "Consider using Eloquent models or repository pattern to separate data access logic from controllers",
                ));
        }

        Ok(self.pass("No direct DB queries found in controllers"))
    }
}
