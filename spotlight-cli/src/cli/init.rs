//! Init command - write a commented spotlight.toml

use crate::config::TOML_CONFIG;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Spotlight configuration

# Set to false to skip every check
enabled = true

# Built-in checks below this severity are skipped (low, medium, high, critical)
severity_threshold = "low"

# What to do when a check fails: "continue" records an error outcome,
# "stop" aborts the scan
error_handling = "continue"

# Exit-code policy for CI:
#   auto: 0 = clean, 1 = low, 2 = medium/high, 3 = critical
#   critical/high/medium/low: exit 1 when that severity or higher is found
fail_on = "auto"

# Per-check debug logging (also enabled by SPOTLIGHT_DEBUG=true)
debug = false

# Check threads (1 = sequential, 0 = one per CPU)
workers = 1

# Host-provided checks registered by name after the built-ins
custom_rules = []

# Disable checks by id
[enabled_rules]
# "architecture.large-controller" = false
# "architecture.magic-strings" = false

[output]
show_suggestions = true
show_tips = true
color = true
"#;

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<i32> {
    let project_root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !project_root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", project_root.display());
    }

    println!("\n{} Initializing Spotlight\n", style("🔦").bold());

    let config_path = project_root.join(TOML_CONFIG);
    if config_path.exists() && !force {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(0);
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Run a scan", style("spotlight .").cyan());
    println!("  {} List checks", style("spotlight rules").cyan());

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_project_config, ProjectConfig};
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let parsed: ProjectConfig = toml::from_str(DEFAULT_CONFIG).expect("parse default config");
        let defaults = ProjectConfig::default();
        assert_eq!(parsed.enabled, defaults.enabled);
        assert_eq!(parsed.severity_threshold, defaults.severity_threshold);
        assert_eq!(parsed.fail_on, defaults.fail_on);
        assert_eq!(parsed.workers, defaults.workers);
        assert_eq!(parsed.output, defaults.output);
        assert!(parsed.enabled_rules.is_empty());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(TOML_CONFIG);
        std::fs::write(&config_path, "workers = 3\n").unwrap();

        run(dir.path(), false).unwrap();
        assert_eq!(load_project_config(dir.path()).workers, 3);

        run(dir.path(), true).unwrap();
        assert_eq!(load_project_config(dir.path()).workers, 1);
    }
}
