//! Debug mode check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome, Severity};
use crate::source::env::{env_flag, is_production};
use crate::source::SourceReader;
use anyhow::Result;

/// `APP_DEBUG=true` in production leaks stack traces and configuration
pub struct AppDebugEnabledCheck {
    meta: CheckMeta,
}

impl AppDebugEnabledCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("AppDebugEnabledCheck", module_path!())
                .named("Debug Mode Check")
                .described("Checks if APP_DEBUG is enabled in production")
                .severity(Severity::Critical)
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for AppDebugEnabledCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for AppDebugEnabledCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        if env_flag(source, "APP_DEBUG", false) {
            return Ok(self
                .suggest("Debug mode is enabled - this exposes sensitive information in error pages")
                .with_recommendation("Set APP_DEBUG=false in your production .env file"));
        }

        Ok(self.pass("Debug mode is disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::source::MockSource;

    #[test]
    fn test_debug_in_production_is_critical() {
        let source = MockSource::new(vec![])
            .with_env("APP_ENV", "production")
            .with_env("APP_DEBUG", "true");
        let outcome = AppDebugEnabledCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.id, "security.app-debug-enabled");
        assert_eq!(outcome.status, Status::Suggestion);
        assert_eq!(outcome.severity, Some(Severity::Critical));
    }

    #[test]
    fn test_debug_off_or_unset_passes() {
        let off = MockSource::new(vec![]).with_env("APP_DEBUG", "false");
        assert_eq!(
            AppDebugEnabledCheck::new().scan(&off).unwrap().message,
            "Debug mode is disabled"
        );
        let unset = MockSource::new(vec![]);
        assert_eq!(
            AppDebugEnabledCheck::new().scan(&unset).unwrap().status,
            Status::Passed
        );
    }

    #[test]
    fn test_debug_in_local_is_fine() {
        let source = MockSource::new(vec![])
            .with_env("APP_ENV", "local")
            .with_env("APP_DEBUG", "true");
        let outcome = AppDebugEnabledCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.message, NOT_IN_PRODUCTION);
    }
}
