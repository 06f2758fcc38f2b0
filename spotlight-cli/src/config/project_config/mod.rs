//! Project-level configuration support
//!
//! Loads per-project configuration from `spotlight.toml` or
//! `.spotlightrc.json` in the project root.
//!
//! # Configuration Format
//!
//! ```toml
//! # spotlight.toml
//!
//! enabled = true
//! severity_threshold = "low"   # low, medium, high, critical
//! error_handling = "continue"  # continue or stop
//! fail_on = "auto"             # auto, critical, high, medium, low
//! workers = 4
//! custom_rules = ["TeamConventionCheck"]
//!
//! [enabled_rules]
//! "architecture.large-controller" = false
//!
//! [output]
//! show_suggestions = true
//! show_tips = true
//! color = true
//! ```

use crate::checks::ErrorHandling;
use crate::models::Severity;
use crate::source::env::env_bool;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Preferred config file name
pub const TOML_CONFIG: &str = "spotlight.toml";
/// JSON fallback config file name
pub const JSON_CONFIG: &str = ".spotlightrc.json";
/// Environment variable that turns on debug logging
pub const DEBUG_ENV: &str = "SPOTLIGHT_DEBUG";

/// Project-level configuration loaded from spotlight.toml or similar
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Set to false to skip every check
    pub enabled: bool,

    /// Per-check switches keyed by check id; missing ids are enabled
    pub enabled_rules: IndexMap<String, bool>,

    /// Names of host-provided checks to register after the built-ins
    pub custom_rules: Vec<String>,

    /// Built-in checks below this severity are not registered
    #[serde(alias = "minimum_severity")]
    pub severity_threshold: Severity,

    /// Behaviour when a check fails
    pub error_handling: ErrorHandling,

    /// Verbose per-check logging
    pub debug: bool,

    /// Exit-code policy for CI
    pub fail_on: FailOn,

    /// Check bodies run on this many threads (1 = sequential, 0 = auto)
    pub workers: usize,

    pub output: OutputConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enabled_rules: IndexMap::new(),
            custom_rules: Vec::new(),
            severity_threshold: Severity::Low,
            error_handling: ErrorHandling::Continue,
            debug: false,
            fail_on: FailOn::Auto,
            workers: 1,
            output: OutputConfig::default(),
        }
    }
}

/// Terminal output preferences
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Show suggestion outcomes in text output
    pub show_suggestions: bool,
    /// Show recommendation lines under suggestions
    pub show_tips: bool,
    /// Colored output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_suggestions: true,
            show_tips: true,
            color: true,
        }
    }
}

/// Exit-code policy.
///
/// `Auto` maps the worst finding to a graded code; a level makes the scan
/// fail (exit 1) when any suggestion at or above that level exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailOn {
    #[default]
    Auto,
    Level(Severity),
}

impl FromStr for FailOn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(FailOn::Auto);
        }
        let level = s
            .parse::<Severity>()
            .map_err(|_| anyhow::anyhow!("Invalid fail_on '{}' (expected auto, critical, high, medium or low)", s))?;
        Ok(FailOn::Level(level))
    }
}

impl std::fmt::Display for FailOn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailOn::Auto => f.write_str("auto"),
            FailOn::Level(level) => write!(f, "{}", level),
        }
    }
}

impl Serialize for FailOn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FailOn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Load project configuration from the project root.
///
/// Searches for configuration files in this order:
/// 1. `spotlight.toml`
/// 2. `.spotlightrc.json`
///
/// Returns default configuration if no config file is found or the file
/// found cannot be parsed.
pub fn load_project_config(project_root: &Path) -> ProjectConfig {
    // Try TOML first (preferred format)
    let toml_path = project_root.join(TOML_CONFIG);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config.with_env_overrides();
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", toml_path.display(), e);
            }
        }
    }

    // Try JSON
    let json_path = project_root.join(JSON_CONFIG);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config.with_env_overrides();
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default().with_env_overrides()
}

/// Load configuration from an explicit path. Unlike discovery, any failure
/// is an error.
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let config = if is_json {
        load_json_config(path)?
    } else {
        load_toml_config(path)?
    };
    debug!("Loaded config from {}", path.display());
    Ok(config.with_env_overrides())
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid TOML in {}", path.display()))?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(config)
}

impl ProjectConfig {
    /// Whether a built-in check may be registered
    pub fn is_rule_enabled(&self, id: &str) -> bool {
        self.enabled_rules.get(id).copied().unwrap_or(true)
    }

    /// Ids explicitly switched off
    pub fn disabled_rules(&self) -> Vec<&str> {
        self.enabled_rules
            .iter()
            .filter(|(_, enabled)| !**enabled)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Apply `SPOTLIGHT_DEBUG` from the process environment
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(DEBUG_ENV).ok();
        self.with_debug_override(value.as_deref())
    }

    fn with_debug_override(mut self, value: Option<&str>) -> Self {
        if let Some(debug) = value.and_then(env_bool) {
            self.debug = debug;
        }
        self
    }
}
