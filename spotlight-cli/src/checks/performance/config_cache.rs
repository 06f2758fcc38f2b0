//! Config cache check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome};
use crate::source::env::is_production;
use crate::source::SourceReader;
use anyhow::Result;

const CACHED_CONFIG: &str = "bootstrap/cache/config.php";

/// Suggests `config:cache` when a production project has no cached config
pub struct ConfigCacheCheck {
    meta: CheckMeta,
}

impl ConfigCacheCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("ConfigCacheCheck", module_path!())
                .named("Config Cache Check")
                .described("Checks if config cache is enabled in production")
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for ConfigCacheCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for ConfigCacheCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        if !source.exists(CACHED_CONFIG) {
            return Ok(self
                .suggest("Config cache could improve performance in production")
                .with_recommendation(
                    "Run `php artisan config:cache` to cache your configuration",
                ));
        }

        Ok(self.pass("Config cache is enabled"))
    }
}
