//! Event cache check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome};
use crate::source::env::is_production;
use crate::source::SourceReader;
use anyhow::Result;

const CACHED_EVENTS: &str = "bootstrap/cache/events.php";

pub struct EventCacheCheck {
    meta: CheckMeta,
}

impl EventCacheCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("performance.event-cache", "performance")
                .named("Event Cache Check")
                .described("Checks if event cache is enabled in production")
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for EventCacheCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for EventCacheCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        if !source.exists(CACHED_EVENTS) {
            return Ok(self
                .suggest("Event cache could improve performance in production")
                .with_recommendation(
                    "Run `php artisan event:cache` to cache your event listeners",
                ));
        }

        Ok(self.pass("Event cache is enabled"))
    }
}
