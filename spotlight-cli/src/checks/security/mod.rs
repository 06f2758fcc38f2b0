//! Security checks against production configuration

mod app_debug_enabled;
mod cookie_secure_flag;
mod https_enforcement;
mod session_driver;

pub use app_debug_enabled::AppDebugEnabledCheck;
pub use cookie_secure_flag::CookieSecureFlagCheck;
pub use https_enforcement::HttpsEnforcementCheck;
pub use session_driver::SessionDriverCheck;
