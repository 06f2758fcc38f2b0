//! Configuration module for Spotlight
//!
//! This module handles:
//! - Project-level configuration (spotlight.toml / .spotlightrc.json)
//! - Enabled checks and the severity threshold
//! - Error handling, CI exit policy and output preferences

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, FailOn, OutputConfig, ProjectConfig, DEBUG_ENV,
    JSON_CONFIG, TOML_CONFIG,
};
