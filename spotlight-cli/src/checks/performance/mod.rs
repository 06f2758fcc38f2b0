//! Performance checks: framework caches, queue driver and query patterns

mod config_cache;
mod event_cache;
mod missing_chunking;
mod n_plus_one_queries;
mod queue_sync_driver;
mod route_cache;
mod view_cache;

pub use config_cache::ConfigCacheCheck;
pub use event_cache::EventCacheCheck;
pub use missing_chunking::MissingChunkingCheck;
pub use n_plus_one_queries::NPlusOneQueriesCheck;
pub use queue_sync_driver::QueueSyncDriverCheck;
pub use route_cache::RouteCacheCheck;
pub use view_cache::ViewCacheCheck;
