//! API resources check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::compiled;
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

const API_ROUTES: &str = "routes/api.php";
const RESOURCES: &str = "app/Http/Resources";

static API_ROUTE: OnceLock<Regex> = OnceLock::new();

pub struct MissingApiResourcesCheck {
    meta: CheckMeta,
}

impl MissingApiResourcesCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("architecture.missing-api-resources", "architecture")
                .named("API Resources Check")
                .described("Identifies API routes that may benefit from using API resources"),
        }
    }
}

impl Default for MissingApiResourcesCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for MissingApiResourcesCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        let Some(routes) = source.read_path(API_ROUTES)? else {
            return Ok(self.pass("API routes file not found"));
        };

        let has_resources = !source.files(RESOURCES).is_empty();
        let has_api_routes = compiled(&API_ROUTE, r"(?i)Route::(get|post|put|patch|delete)")?
            .is_match(&routes);

        if has_api_routes && !has_resources {
            return Ok(self
                .suggest("API routes found but no API resources detected")
                .with_recommendation(
                    "Consider using API resources (php artisan make:resource) to standardize your API responses",
                ));
        }

        Ok(self.pass("API resources are being used or no API routes found"))
    }
}
