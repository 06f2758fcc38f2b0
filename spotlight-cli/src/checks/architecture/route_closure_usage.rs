//! Route closure check
//!
//! Closures in route files cannot be serialized, so `route:cache` refuses them.

use super::ROUTES;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::compiled;
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

static ROUTE_CLOSURE: OnceLock<Regex> = OnceLock::new();
static ROUTE_CALL: OnceLock<Regex> = OnceLock::new();

pub struct RouteClosureUsageCheck {
    meta: CheckMeta,
}

impl RouteClosureUsageCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("RouteClosureUsageCheck", module_path!())
                .named("Route Closure Check")
                .described("Identifies route closures that may prevent route caching"),
        }
    }
}

impl Default for RouteClosureUsageCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for RouteClosureUsageCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(ROUTES) {
            return Ok(self.pass("Routes directory not found"));
        }

        let closure = compiled(&ROUTE_CLOSURE, r"(?i)Route::\w+\s*\([^)]*function\s*\(")?;
        let route = compiled(&ROUTE_CALL, r"(?i)Route::\w+")?;

        let mut closure_count = 0;
        let mut total_routes = 0;
        for file in source.files(ROUTES).iter().filter(|f| f.has_suffix(".php")) {
            let content = source.read(file)?;
            closure_count += closure.find_iter(&content).count();
            total_routes += route.find_iter(&content).count();
        }

        if closure_count > 0 {
            return Ok(self
                .suggest(format!(
                    "Found {closure_count} route closure(s) - these prevent route caching"
                ))
                .with_meta("closure_count", closure_count)
                .with_meta("total_routes", total_routes)
                .with_recommendation(
                    "Consider moving closures to controller methods if route caching is important for your app",
                ));
        }

        Ok(self.pass("No route closures found"))
    }
}
