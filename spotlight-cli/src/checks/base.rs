//! Base check trait and types
//!
//! This module defines the core abstractions for project checks:
//! - `Check` trait that all checks must implement
//! - `CheckMeta` holding identity and classification
//! - Pure naming functions used to derive ids and display names

use crate::models::{CheckType, Metadata, Outcome, Severity, Status};
use crate::source::SourceReader;
use anyhow::Result;

/// Identity and classification of a check.
///
/// Built once when the check is constructed, either with an explicit id or
/// derived from the check's type name and module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMeta {
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub check_type: CheckType,
    pub name: String,
    pub description: String,
    pub documentation_url: Option<String>,
}

impl CheckMeta {
    /// Explicit id and category. The display name is derived from the id's slug.
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        let id = id.into();
        let slug = id.rsplit('.').next().unwrap_or(&id);
        let name = name_from_slug(slug);
        Self {
            id,
            category: category.into(),
            severity: Severity::default(),
            check_type: CheckType::default(),
            name,
            description: String::new(),
            documentation_url: None,
        }
    }

    /// Derive id, category and name from a type name and `module_path!()`.
    ///
    /// ```ignore
    /// CheckMeta::for_type("ConfigCacheCheck", "spotlight::checks::performance::config_cache")
    /// // id = "performance.config-cache", name = "Config Cache"
    /// ```
    pub fn for_type(type_name: &str, module_path: &str) -> Self {
        let category = category_from_module_path(module_path);
        Self {
            id: derive_check_id(type_name, &category),
            name: derive_check_name(type_name),
            category,
            severity: Severity::default(),
            check_type: CheckType::default(),
            description: String::new(),
            documentation_url: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn check_type(mut self, check_type: CheckType) -> Self {
        self.check_type = check_type;
        self
    }

    pub fn documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }
}

/// Trait for all project checks
///
/// A check inspects the project through a [`SourceReader`] and returns
/// exactly one [`Outcome`]. Checks do not catch their own failures: an `Err`
/// (or a panic) is contained by the scan engine.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct RouteCacheCheck {
///     meta: CheckMeta,
/// }
///
/// impl Check for RouteCacheCheck {
///     fn meta(&self) -> &CheckMeta {
///         &self.meta
///     }
///
///     fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
///         if source.exists("bootstrap/cache/routes-v7.php") {
///             return Ok(self.pass("Routes are cached"));
///         }
///         Ok(self.suggest("Routes are not cached"))
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Identity and classification
    fn meta(&self) -> &CheckMeta;

    /// Run the check against the project
    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome>;

    /// Unique identifier, `<category>.<slug>`
    fn id(&self) -> &str {
        &self.meta().id
    }

    fn category(&self) -> &str {
        &self.meta().category
    }

    fn severity(&self) -> Severity {
        self.meta().severity
    }

    fn check_type(&self) -> CheckType {
        self.meta().check_type
    }

    fn name(&self) -> &str {
        &self.meta().name
    }

    fn description(&self) -> &str {
        &self.meta().description
    }

    fn documentation_url(&self) -> Option<&str> {
        self.meta().documentation_url.as_deref()
    }

    /// Passed outcome. An empty message becomes `"<name> check passed"`.
    fn pass(&self, message: impl Into<String>) -> Outcome
    where
        Self: Sized,
    {
        let message = message.into();
        let message = if message.is_empty() {
            format!("{} check passed", self.name())
        } else {
            message
        };
        outcome_for(self, Status::Passed, message)
    }

    /// Suggestion outcome carrying the check's documentation link, if any
    fn suggest(&self, message: impl Into<String>) -> Outcome
    where
        Self: Sized,
    {
        let mut outcome = outcome_for(self, Status::Suggestion, message.into());
        if let Some(url) = self.documentation_url() {
            outcome = outcome.with_meta(crate::models::DOCUMENTATION_URL_KEY, url);
        }
        outcome
    }
}

/// Build an outcome stamped with the check's current accessors
pub fn outcome_for(check: &dyn Check, status: Status, message: String) -> Outcome {
    Outcome {
        id: check.id().to_string(),
        status,
        message,
        severity: Some(check.severity()),
        category: check.category().to_string(),
        check_type: check.check_type(),
        metadata: Metadata::new(),
    }
}

/// Split an identifier into words on case boundaries, `_` and `-`.
///
/// Consecutive capitals stay together: `SQLInjection` -> `SQL`, `Injection`.
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, c) in chars.iter().enumerate() {
        if *c == '_' || *c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() {
            let prev_is_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let is_acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && i + 1 < chars.len()
                && chars[i + 1].is_lowercase();
            if (prev_is_lower || is_acronym_end) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(*c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn strip_check_suffix(type_name: &str) -> &str {
    let base = type_name.rsplit("::").next().unwrap_or(type_name);
    match base.strip_suffix("Check") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => base,
    }
}

/// Kebab-case slug from a type name with the `Check` suffix removed
///
/// `NPlusOneQueriesCheck` -> `n-plus-one-queries`, `HTTPSEnforcementCheck` -> `https-enforcement`
pub fn derive_check_slug(type_name: &str) -> String {
    split_words(strip_check_suffix(type_name))
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `<category>.<slug>`
pub fn derive_check_id(type_name: &str, category: &str) -> String {
    format!("{}.{}", category, derive_check_slug(type_name))
}

/// Display name from a type name: `AppDebugEnabledCheck` -> `App Debug Enabled`
pub fn derive_check_name(type_name: &str) -> String {
    split_words(strip_check_suffix(type_name))
        .iter()
        .map(|w| crate::models::capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display name from a slug: `config-cache` -> `Config Cache`
pub fn name_from_slug(slug: &str) -> String {
    split_words(slug)
        .iter()
        .map(|w| crate::models::capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Category from a module path: the segment following `checks`, else `general`
pub fn category_from_module_path(module_path: &str) -> String {
    let segments: Vec<&str> = module_path.split("::").collect();
    segments
        .iter()
        .position(|s| *s == "checks")
        .and_then(|i| segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "general".to_string())
}
