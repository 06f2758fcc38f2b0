//! Queue driver check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome, Severity};
use crate::source::env::{env_string, is_production};
use crate::source::SourceReader;
use anyhow::Result;

/// Flags the `sync` queue connection in production: jobs run inline with the request
pub struct QueueSyncDriverCheck {
    meta: CheckMeta,
}

impl QueueSyncDriverCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("QueueSyncDriverCheck", module_path!())
                .named("Queue Driver Check")
                .described("Checks if queue is using sync driver in production")
                .severity(Severity::High)
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for QueueSyncDriverCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for QueueSyncDriverCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        let driver = env_string(source, "QUEUE_CONNECTION").unwrap_or_else(|| "sync".to_string());

        if driver == "sync" {
            return Ok(self
                .suggest(
                    "Queue is using sync driver - jobs run immediately without background processing",
                )
                .with_meta("current_driver", driver)
                .with_recommendation(
                    "Consider using database, redis, or sqs driver for background job processing",
                ));
        }

        Ok(self.pass(format!("Queue is using {driver} driver")))
    }
}
