//! Ordered, id-keyed collection of checks
//!
//! Built once by the host at startup and handed to the scan engine. Iteration
//! order is registration order; re-registering an id replaces the previous
//! check in place.

use super::base::Check;
use crate::models::Severity;
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid check '{id}': {reason}")]
    InvalidCheck { id: String, reason: String },
}

impl RegistryError {
    fn invalid(id: &str, reason: impl Into<String>) -> Self {
        RegistryError::InvalidCheck {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Default, Clone)]
pub struct CheckRegistry {
    checks: IndexMap<String, Arc<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a check by id
    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<&mut Self, RegistryError> {
        validate(check.as_ref())?;
        // IndexMap::insert keeps the original slot when the key exists
        self.checks.insert(check.id().to_string(), check);
        Ok(self)
    }

    /// Register each check in turn, stopping at the first invalid one
    pub fn register_many<I>(&mut self, checks: I) -> Result<&mut Self, RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn Check>>,
    {
        for check in checks {
            self.register(check)?;
        }
        Ok(self)
    }

    /// Full registry snapshot in registration order
    pub fn all(&self) -> &IndexMap<String, Arc<dyn Check>> {
        &self.checks
    }

    pub fn by_category(&self, category: &str) -> IndexMap<String, Arc<dyn Check>> {
        self.filtered(|c| c.category() == category)
    }

    pub fn by_severity(&self, severity: Severity) -> IndexMap<String, Arc<dyn Check>> {
        self.filtered(|c| c.severity() == severity)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Check>> {
        self.checks.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.checks.contains_key(id)
    }

    /// Unique categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for check in self.checks.values() {
            if !seen.iter().any(|c| c == check.category()) {
                seen.push(check.category().to_string());
            }
        }
        seen
    }

    pub fn clear(&mut self) {
        self.checks.clear();
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    fn filtered<F>(&self, keep: F) -> IndexMap<String, Arc<dyn Check>>
    where
        F: Fn(&dyn Check) -> bool,
    {
        self.checks
            .iter()
            .filter(|(_, c)| keep(c.as_ref()))
            .map(|(id, c)| (id.clone(), Arc::clone(c)))
            .collect()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.checks.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn validate(check: &dyn Check) -> Result<(), RegistryError> {
    let id = check.id();
    let category = check.category();

    if id.trim().is_empty() {
        return Err(RegistryError::invalid(id, "id is empty"));
    }
    if category.trim().is_empty() {
        return Err(RegistryError::invalid(id, "category is empty"));
    }
    match id.strip_prefix(category).and_then(|rest| rest.strip_prefix('.')) {
        Some(slug) if !slug.trim().is_empty() => {}
        _ => {
            return Err(RegistryError::invalid(
                id,
                format!("id must have the form '{category}.<slug>'"),
            ))
        }
    }
    if check.name().trim().is_empty() {
        return Err(RegistryError::invalid(id, "name is empty"));
    }
    Ok(())
}
