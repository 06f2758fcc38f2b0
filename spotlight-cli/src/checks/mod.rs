//! Project checks
//!
//! This module provides the check framework and the built-in checks for
//! Laravel projects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ScanEngine                           │
//! │  - Resolves the working set from the registry               │
//! │  - Runs checks inside a failure boundary                    │
//! │  - Folds outcomes into the report and scores it             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CheckRegistry                         │
//! │  - Ordered, id-keyed set of checks                          │
//! │  - Built from config + catalog by build_registry()          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Check Trait                          │
//! │  - meta(): id, category, severity, type, name               │
//! │  - scan(source): inspect the project, return an Outcome     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Check Categories
//!
//! ## Performance (objective)
//! - Framework caches (config, routes, views, events)
//! - Queue driver, N+1 queries, unchunked bulk reads
//!
//! ## Security (objective)
//! - Debug mode, session driver, HTTPS, cookie flags
//!
//! ## Architecture (advisory)
//! - Controller size, route closures, query placement, DI, magic strings
//!
//! # Usage
//!
//! ```ignore
//! use spotlight::checks::{default_checks, CheckRegistry, ScanEngineBuilder};
//! use spotlight::source::ProjectSource;
//! use std::sync::Arc;
//!
//! let mut registry = CheckRegistry::new();
//! registry.register_many(default_checks())?;
//!
//! let engine = ScanEngineBuilder::new(Arc::new(registry), Arc::new(ProjectSource::new(".")))
//!     .workers(4)
//!     .build();
//! let report = engine.scan(&[])?;
//! println!("health: {}", report.summary.health_score);
//! ```

mod base;
mod catalog;
mod engine;
mod registry;
pub(crate) mod support;

pub mod architecture;
pub mod performance;
pub mod security;

pub use base::{
    category_from_module_path, derive_check_id, derive_check_name, derive_check_slug,
    name_from_slug, outcome_for, Check, CheckMeta,
};
pub use catalog::{build_registry, CheckCatalog, CheckFactory};
pub use engine::{ErrorHandling, ProgressCallback, ScanEngine, ScanEngineBuilder, ScanError};
pub use registry::{CheckRegistry, RegistryError};

use std::sync::Arc;

use architecture::*;
use performance::*;
use security::*;

/// Every built-in check, in registration order
pub fn default_checks() -> Vec<Arc<dyn Check>> {
    vec![
        // Performance
        Arc::new(ConfigCacheCheck::new()),
        Arc::new(RouteCacheCheck::new()),
        Arc::new(QueueSyncDriverCheck::new()),
        Arc::new(ViewCacheCheck::new()),
        Arc::new(EventCacheCheck::new()),
        Arc::new(NPlusOneQueriesCheck::new()),
        Arc::new(MissingChunkingCheck::new()),
        // Security
        Arc::new(AppDebugEnabledCheck::new()),
        Arc::new(SessionDriverCheck::new()),
        Arc::new(HttpsEnforcementCheck::new()),
        Arc::new(CookieSecureFlagCheck::new()),
        // Architecture
        Arc::new(RouteClosureUsageCheck::new()),
        Arc::new(LargeControllerCheck::new()),
        Arc::new(MissingApiResourcesCheck::new()),
        Arc::new(DirectDbQueriesCheck::new()),
        Arc::new(MissingFormRequestsCheck::new()),
        Arc::new(MissingServiceLayerCheck::new()),
        Arc::new(DirectEnvUsageCheck::new()),
        Arc::new(QueriesInBladeCheck::new()),
        Arc::new(MissingMassAssignmentProtectionCheck::new()),
        Arc::new(LogicInRoutesCheck::new()),
        Arc::new(DirectInstantiationCheck::new()),
        Arc::new(JsCssInBladeCheck::new()),
        Arc::new(MagicStringsCheck::new()),
    ]
}
