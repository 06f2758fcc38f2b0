//! Route cache check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome};
use crate::source::env::is_production;
use crate::source::SourceReader;
use anyhow::Result;

/// Current and pre-Laravel 7 cache file names
const CACHED_ROUTES: [&str; 2] = ["bootstrap/cache/routes-v7.php", "bootstrap/cache/routes.php"];

pub struct RouteCacheCheck {
    meta: CheckMeta,
}

impl RouteCacheCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("RouteCacheCheck", module_path!())
                .named("Route Cache Check")
                .described("Checks if route cache is enabled in production")
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for RouteCacheCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for RouteCacheCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        if !CACHED_ROUTES.iter().any(|path| source.exists(path)) {
            return Ok(self
                .suggest("Route cache could improve performance in production")
                .with_recommendation("Run `php artisan route:cache` to cache your routes"));
        }

        Ok(self.pass("Route cache is enabled"))
    }
}
