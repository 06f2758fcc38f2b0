//! HTTPS enforcement check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::NOT_IN_PRODUCTION;
use crate::models::{CheckType, Outcome, Severity};
use crate::source::env::{env_flag, env_string, is_production};
use crate::source::SourceReader;
use anyhow::Result;

pub struct HttpsEnforcementCheck {
    meta: CheckMeta,
}

impl HttpsEnforcementCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new("security.https-enforcement", "security")
                .named("HTTPS Enforcement Check")
                .described("Checks if HTTPS is properly configured for production")
                .severity(Severity::High)
                .check_type(CheckType::Objective),
        }
    }
}

impl Default for HttpsEnforcementCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheme part of a URL, lowercased
fn url_scheme(url: &str) -> Option<String> {
    let (scheme, _) = url.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    Some(scheme.to_lowercase())
}

impl Check for HttpsEnforcementCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !is_production(source) {
            return Ok(self.pass(NOT_IN_PRODUCTION));
        }

        let url = env_string(source, "APP_URL");
        let scheme = url.as_deref().and_then(url_scheme);
        let force_https = env_flag(source, "APP_FORCE_HTTPS", false);

        if scheme.as_deref() != Some("https") && !force_https {
            return Ok(self
                .suggest("HTTPS may not be enforced in production")
                .with_meta("current_url", url.map_or(serde_json::Value::Null, Into::into))
                .with_recommendation(
                    "Set APP_URL to use https:// and consider enabling force_https in your AppServiceProvider",
                ));
        }

        Ok(self.pass("HTTPS appears to be configured"))
    }
}
