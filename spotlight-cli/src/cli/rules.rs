//! Rules command - list checks or show one check's details

use crate::checks::{build_registry, default_checks, Check, CheckCatalog, CheckRegistry};
use crate::config::ProjectConfig;
use crate::models::{capitalize, CheckType, Severity};
use anyhow::Result;
use console::style;
use std::sync::Arc;

fn type_icon(check_type: CheckType) -> &'static str {
    match check_type {
        CheckType::Objective => "🔒",
        CheckType::Advisory => "💡",
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::High => "🟠",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
    }
}

/// Every check this build knows about: built-ins, then catalog entries
fn available_checks(catalog: &CheckCatalog) -> Result<CheckRegistry> {
    let mut all = CheckRegistry::new();
    all.register_many(default_checks())?;
    let custom: Vec<Arc<dyn Check>> = catalog
        .names()
        .filter_map(|name| catalog.resolve(name))
        .collect();
    all.register_many(custom)?;
    Ok(all)
}

/// Run the rules command. Returns the exit code.
pub fn run(config: &ProjectConfig, catalog: &CheckCatalog, rule: Option<&str>) -> Result<i32> {
    let all = available_checks(catalog)?;
    let active = build_registry(config, catalog)?;

    match rule {
        Some(id) => Ok(show_rule(&all, &active, id)),
        None => {
            list_rules(&all, &active);
            Ok(0)
        }
    }
}

fn list_rules(all: &CheckRegistry, active: &CheckRegistry) {
    println!("{}\n", style("📋 Available Spotlight Checks").bold());

    for category in all.categories() {
        let checks = all.by_category(&category);
        println!(
            "{}",
            style(format!("📁 {} ({} checks)", capitalize(&category), checks.len())).bold()
        );

        for (id, check) in &checks {
            let disabled = if active.has(id) {
                String::new()
            } else {
                style(" (disabled)").dim().to_string()
            };
            println!(
                "  {} {} {}{}",
                type_icon(check.check_type()),
                severity_icon(check.severity()),
                id,
                disabled
            );
            println!("     {}", style(check.name()).dim());
        }
        println!();
    }

    println!(
        "{}",
        style("Use 'spotlight rules --rule <check-id>' for detailed information").dim()
    );
}

fn show_rule(all: &CheckRegistry, active: &CheckRegistry, id: &str) -> i32 {
    let Some(check) = all.get(id) else {
        eprintln!("{} Check '{}' not found.", style("✗").red(), id);
        eprintln!(
            "{}",
            style("Use 'spotlight rules' to see all available checks.").dim()
        );
        return 1;
    };

    println!("{}\n", style(format!("📖 Check Details: {}", check.id())).bold());

    let rows = [
        ("Name", check.name().to_string()),
        ("Description", check.description().to_string()),
        ("Category", capitalize(check.category())),
        ("Type", check.check_type().label().to_string()),
        ("Severity", check.severity().label().to_string()),
        (
            "Enabled",
            if active.has(id) { "yes" } else { "no" }.to_string(),
        ),
    ];
    for (property, value) in rows {
        println!("  {:<12} {}", style(property).cyan(), value);
    }
    if let Some(url) = check.documentation_url() {
        println!("  {:<12} {}", style("Docs").cyan(), url);
    }

    println!();
    println!("{}", style("To disable this check, add to spotlight.toml:").dim());
    println!("[enabled_rules]");
    println!("\"{}\" = false", check.id());
    0
}
