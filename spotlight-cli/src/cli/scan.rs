//! Scan command - run the checks and report

use super::ScanArgs;
use crate::checks::{build_registry, CheckCatalog, ScanEngineBuilder};
use crate::config::{FailOn, ProjectConfig};
use crate::models::ScanSummary;
use crate::reporters::{self, OutputFormat, RenderOptions};
use crate::source::ProjectSource;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Process exit code for a finished scan.
///
/// `auto`: 3 when any critical suggestion exists, 2 for high or medium,
/// 1 for low, 0 otherwise. A level: 1 when any suggestion at or above it
/// exists, else 0.
pub fn exit_code(summary: &ScanSummary, fail_on: FailOn) -> i32 {
    match fail_on {
        FailOn::Auto => {
            if summary.critical > 0 {
                3
            } else if summary.high > 0 || summary.medium > 0 {
                2
            } else if summary.low > 0 {
                1
            } else {
                0
            }
        }
        FailOn::Level(level) => i32::from(summary.has_issues_at_or_above(level)),
    }
}

/// Fold command-line overrides into the project configuration
fn apply_overrides(mut config: ProjectConfig, args: &ScanArgs) -> ProjectConfig {
    if let Some(fail_on) = args.fail_on {
        config.fail_on = fail_on;
    }
    if let Some(mode) = args.error_handling {
        config.error_handling = mode;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.debug {
        config.debug = true;
    }
    if args.no_color {
        config.output.color = false;
    }
    config
}

/// Create bar progress style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}

/// Run the scan command
pub fn run(
    path: &Path,
    config: ProjectConfig,
    catalog: &CheckCatalog,
    args: ScanArgs,
) -> Result<i32> {
    let project_root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !project_root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", project_root.display());
    }

    let config = apply_overrides(config, &args);
    let registry = build_registry(&config, catalog)?;
    info!(
        "Scanning {} with {} check(s)",
        project_root.display(),
        registry.len()
    );

    let is_text = args.format == OutputFormat::Text;
    let bar = if is_text && args.output.is_none() {
        ProgressBar::new(registry.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_style(create_bar_style());

    if is_text {
        let heading = style("🔦 Spotlight - Laravel Application Scanner").bold();
        if config.output.color {
            println!("{}\n", heading);
        } else {
            println!("{}\n", heading.force_styling(false));
        }
    }

    let progress = bar.clone();
    let engine = ScanEngineBuilder::new(
        Arc::new(registry),
        Arc::new(ProjectSource::new(project_root)),
    )
    .error_handling(config.error_handling)
    .debug(config.debug)
    .workers(config.workers)
    .on_progress(Box::new(move |id: &str, done: usize, total: usize| {
        progress.set_length(total as u64);
        progress.set_position(done as u64);
        progress.set_message(id.to_string());
    }))
    .build();

    let scanned = engine.scan(&args.categories);
    bar.finish_and_clear();
    let report = scanned?;

    let options = RenderOptions::from(&config.output);
    let rendered = reporters::render(&report, args.format, &options)?;
    match &args.output {
        Some(file) => {
            std::fs::write(file, &rendered)
                .with_context(|| format!("Failed to write report to {}", file.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(file.display()).cyan()
            );
        }
        None if args.format == OutputFormat::Json => println!("{}", rendered),
        None => print!("{}", rendered),
    }

    let code = exit_code(&report.summary, config.fail_on);
    info!(
        "Scan finished: health {}/100, exit code {}",
        report.summary.health_score, code
    );
    Ok(code)
}
