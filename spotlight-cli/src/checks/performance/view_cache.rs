//! View cache check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome};
use crate::source::env::is_production;
use crate::source::SourceReader;
use anyhow::Result;

const COMPILED_VIEWS: &str = "bootstrap/cache/compiled.php";

pub struct ViewCacheCheck {
    meta: CheckMeta,
}

impl ViewCacheCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("ViewCacheCheck", module_path!())
                .named("View Cache Check")
                .described("Checks if view cache is enabled in production")
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for ViewCacheCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for ViewCacheCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        if !source.exists(COMPILED_VIEWS) {
            return Ok(self
                .suggest("View cache could improve performance in production")
                .with_recommendation(
                    "Run `php artisan view:cache` to pre-compile your Blade templates",
                ));
        }

        Ok(self.pass("View cache is enabled"))
    }
}
