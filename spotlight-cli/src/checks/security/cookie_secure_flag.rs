//! Session cookie flags check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome, Severity};
use crate::source::env::{env_flag, is_production};
use crate::source::SourceReader;
use anyhow::Result;

/// Checks the `secure` and `http_only` flags on the session cookie
pub struct CookieSecureFlagCheck {
    meta: CheckMeta,
}

impl CookieSecureFlagCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("security.cookie-secure-flag", "security")
                .named("Cookie Secure Flag Check")
                .described("Checks if secure cookie flag is enabled for production")
                .severity(Severity::High)
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for CookieSecureFlagCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for CookieSecureFlagCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        if !env_flag(source, "SESSION_SECURE_COOKIE", false) {
            return Ok(self
                .suggest("Secure cookie flag is not enabled")
                .with_recommendation(
                    "Set SESSION_SECURE_COOKIE=true in production to ensure cookies are only sent over HTTPS",
                ));
        }

        if !env_flag(source, "SESSION_HTTP_ONLY", true) {
            return Ok(self
                .suggest("HttpOnly cookie flag is not enabled")
                .with_recommendation(
                    "Set SESSION_HTTP_ONLY=true to prevent JavaScript access to session cookies",
                ));
        }

        Ok(self.pass("Cookie security flags are properly configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::source::MockSource;

    #[test]
    fn test_insecure_by_default() {
        let outcome = CookieSecureFlagCheck::new()
            .scan(&MockSource::new(vec![]))
            .unwrap();
        assert_eq!(outcome.status, Status::Suggestion);
        assert_eq!(outcome.message, "Secure cookie flag is not enabled");
    }

    #[test]
    fn test_http_only_disabled() {
        let source = MockSource::new(vec![])
            .with_env("SESSION_SECURE_COOKIE", "true")
            .with_env("SESSION_HTTP_ONLY", "false");
        let outcome = CookieSecureFlagCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.message, "HttpOnly cookie flag is not enabled");
    }

    #[test]
    fn test_secure_configuration_passes() {
        let source = MockSource::new(vec![]).with_env("SESSION_SECURE_COOKIE", "true");
        let outcome = CookieSecureFlagCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.status, Status::Passed);
    }
}
