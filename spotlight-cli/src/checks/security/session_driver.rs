//! Session driver check

use crate::checks::base::{Check, CheckMeta};
use crate::models::{CheckType, Outcome};
use crate::source::env::env_string;
use crate::source::SourceReader;
use anyhow::Result;

const RECOMMENDED_DRIVERS: [&str; 4] = ["database", "redis", "memcached", "file"];

pub struct SessionDriverCheck {
    meta: CheckMeta,
}

impl SessionDriverCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("security.session-driver", "security")
                .named("Session Driver Check")
                .described("Reviews session driver configuration")
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for SessionDriverCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for SessionDriverCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        let driver = env_string(source, "SESSION_DRIVER").unwrap_or_else(|| "file".to_string());

        if !RECOMMENDED_DRIVERS.contains(&driver.as_str()) {
            return Ok(self
                .suggest(format!(
                    "Session driver '{driver}' works for development, but may need review for production"
                ))
                .with_meta("current_driver", driver)
                .with_recommendation(
                    "Consider using database, redis, or file driver for production environments",
                ));
        }

        Ok(self.pass(format!("Session driver '{driver}' is configured")))
    }
}
