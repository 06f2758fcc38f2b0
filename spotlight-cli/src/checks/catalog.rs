//! Host-side assembly of the check registry
//!
//! Custom checks are compiled into the host binary and made available by name
//! through a `CheckCatalog`. `build_registry` combines the built-in checks
//! with whatever the project configuration enables.

use super::base::Check;
use super::default_checks;
use super::registry::{CheckRegistry, RegistryError};
use crate::config::ProjectConfig;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Constructs a fresh check instance
pub type CheckFactory = Box<dyn Fn() -> Arc<dyn Check> + Send + Sync>;

/// Named check factories the host offers to `custom_rules`
#[derive(Default)]
pub struct CheckCatalog {
    factories: IndexMap<String, CheckFactory>,
}

impl CheckCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a check under `name`, replacing any previous factory
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn Check> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Instantiate the check offered under `name`
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Check>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for CheckCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckCatalog")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build the registry a scan should run against.
///
/// Built-in checks are skipped when disabled in `enabled_rules` or below
/// `severity_threshold`. Custom checks named in `custom_rules` are always
/// registered when the catalog knows them.
pub fn build_registry(
    config: &ProjectConfig,
    catalog: &CheckCatalog,
) -> Result<CheckRegistry, RegistryError> {
    let mut registry = CheckRegistry::new();

    if !config.enabled {
        debug!("Checks disabled by configuration");
        return Ok(registry);
    }

    for check in default_checks() {
        if !config.is_rule_enabled(check.id()) {
            debug!("Skipping disabled check {}", check.id());
            continue;
        }
        if check.severity() < config.severity_threshold {
            debug!(
                "Skipping {} (severity {} below threshold {})",
                check.id(),
                check.severity(),
                config.severity_threshold
            );
            continue;
        }
        registry.register(check)?;
    }

    for name in &config.custom_rules {
        match catalog.resolve(name) {
            Some(check) => {
                debug!("Registering custom check {} as {}", name, check.id());
                registry.register(check)?;
            }
            None => warn!("Custom check '{}' is not available in this build, skipping", name),
        }
    }

    Ok(registry)
}
