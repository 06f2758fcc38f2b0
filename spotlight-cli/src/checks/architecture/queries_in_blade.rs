//! Database queries inside Blade templates

use super::VIEWS;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

static ECHOED_QUERY: OnceLock<Regex> = OnceLock::new();
static LOOPED_QUERY: OnceLock<Regex> = OnceLock::new();
static DB_QUERY: OnceLock<Regex> = OnceLock::new();

pub struct QueriesInBladeCheck {
    meta: CheckMeta,
}

impl QueriesInBladeCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("QueriesInBladeCheck", module_path!())
                .named("Queries in Blade Check")
                .described("Identifies database queries executed in Blade templates"),
        }
    }

    /// Patterns tried in order; the first one that matches a view is counted
    fn patterns(&self) -> Result<[&'static Regex; 3]> {
        Ok([
            compiled(&ECHOED_QUERY, r"(?i)\{\{\s*\w+::(all|get|find|where|first)\(")?,
            compiled(&LOOPED_QUERY, r"(?i)@foreach\s*\(\s*\w+::(all|get|find|where)")?,
            compiled(&DB_QUERY, r"(?i)DB::(table|select|get|first)")?,
        ])
    }
}

impl Default for QueriesInBladeCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for QueriesInBladeCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(VIEWS) {
            return Ok(self.pass("Views directory not found"));
        }

        let patterns = self.patterns()?;
        let mut views = Vec::new();
        let mut total = 0;

        for (file, content) in read_all(source, VIEWS, "")? {
            let count = patterns
                .iter()
                .map(|re| re.find_iter(&content).count())
                .find(|count| *count > 0);
            if let Some(count) = count {
                total += count;
                views.push(json!({
                    "file": relative_to(&file, VIEWS),
                    "query_count": count,
                }));
            }
        }

        if !views.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} Blade template(s) with database queries ({} total)",
                    views.len(),
                    total
                ))
                .with_meta("views", views)
                .with_recommendation(
                    "Move queries to controllers and pass data to views. This prevents N+1 queries and improves performance.",
                ));
        }

        Ok(self.pass("No database queries found in Blade templates"))
    }
}
