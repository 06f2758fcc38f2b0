//! Architecture checks: advisory suggestions about project structure

mod direct_db_queries;
mod direct_env_usage;
mod direct_instantiation;
mod js_css_in_blade;
mod large_controller;
mod logic_in_routes;
mod magic_strings;
mod missing_api_resources;
mod missing_form_requests;
mod missing_mass_assignment_protection;
mod missing_service_layer;
mod queries_in_blade;
mod route_closure_usage;

pub use direct_db_queries::DirectDbQueriesCheck;
pub use direct_env_usage::DirectEnvUsageCheck;
pub use direct_instantiation::DirectInstantiationCheck;
pub use js_css_in_blade::JsCssInBladeCheck;
pub use large_controller::LargeControllerCheck;
pub use logic_in_routes::LogicInRoutesCheck;
pub use magic_strings::MagicStringsCheck;
pub use missing_api_resources::MissingApiResourcesCheck;
pub use missing_form_requests::MissingFormRequestsCheck;
pub use missing_mass_assignment_protection::MissingMassAssignmentProtectionCheck;
pub use missing_service_layer::MissingServiceLayerCheck;
pub use queries_in_blade::QueriesInBladeCheck;
pub use route_closure_usage::RouteClosureUsageCheck;

/// Directory holding HTTP controllers
pub(crate) const CONTROLLERS: &str = "app/Http/Controllers";
/// Directory holding route files
pub(crate) const ROUTES: &str = "routes";
/// Directory holding Blade views
pub(crate) const VIEWS: &str = "resources/views";
