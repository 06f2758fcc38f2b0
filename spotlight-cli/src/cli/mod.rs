//! CLI command definitions and handlers

mod init;
mod make_check;
mod rules;
mod scan;

pub use scan::exit_code;

use crate::checks::{CheckCatalog, ErrorHandling};
use crate::config::{load_config_file, load_project_config, FailOn, ProjectConfig};
use crate::reporters::OutputFormat;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (0 = auto, up to 64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Spotlight - Laravel application scanner
#[derive(Parser, Debug)]
#[command(name = "spotlight")]
#[command(
    version,
    about = "Pattern-based health checks for Laravel codebases: performance, security and architecture insights",
    long_about = "Spotlight runs a registry of pattern checks against a Laravel project tree \
and reports passed checks, suggestions and errors per category, with a \
severity-weighted health score from 0 to 100.\n\n\
Run without a subcommand to scan the current directory:\n  \
spotlight .",
    after_help = "\
Examples:
  spotlight .                                  Scan current directory
  spotlight /path/to/app scan --format json    JSON output for scripting
  spotlight . scan --category security         Only run security checks
  spotlight . scan --fail-on high              Exit code 1 if high+ suggestions (CI mode)
  spotlight rules --rule security.app-debug-enabled   Show one check
  spotlight . make-check MissingIndexes --category performance"
)]
pub struct Cli {
    /// Path to the Laravel project (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: spotlight.toml or .spotlightrc.json in the project)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the project and print a report (default command)
    #[command(after_help = "\
Exit codes with --fail-on auto (default):
  0  no suggestions
  1  only low-severity suggestions
  2  high or medium suggestions
  3  critical suggestions")]
    Scan(ScanArgs),

    /// List available checks, or show one check's details
    Rules {
        /// Show details for a specific check id
        #[arg(long)]
        rule: Option<String>,
    },

    /// Generate a Rust source stub for a new check
    MakeCheck {
        /// Type name of the check (`Check` is appended when missing)
        name: String,

        /// Category (performance, security, architecture, or your own)
        #[arg(long, default_value = "performance")]
        category: String,

        /// Check type (objective or advisory)
        #[arg(long = "type", default_value = "advisory")]
        check_type: String,

        /// Severity level (low, medium, high, critical)
        #[arg(long, default_value = "low")]
        severity: String,

        /// Output directory (default: <path>/src/checks/<category>)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Write a commented spotlight.toml with the default settings
    Init {
        /// Overwrite an existing spotlight.toml
        #[arg(long)]
        force: bool,
    },
}

/// Options of the scan command
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Output format: text or json
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,

    /// Only run checks of this category (repeatable)
    #[arg(long = "category", short = 'c')]
    pub categories: Vec<String>,

    /// Exit-code policy: auto, critical, high, medium, low
    #[arg(long)]
    pub fail_on: Option<FailOn>,

    /// What to do when a check fails: continue or stop
    #[arg(long)]
    pub error_handling: Option<ErrorHandling>,

    /// Log per-check execution details
    #[arg(long)]
    pub debug: bool,

    /// Parallel workers (1 = sequential, 0 = auto)
    #[arg(long, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Whether the command line asks for debug logging
    pub fn debug_requested(&self) -> bool {
        matches!(&self.command, Some(Commands::Scan(args)) if args.debug)
    }

    /// Project configuration: the explicit `--config` file, or discovery in
    /// the project root
    pub fn load_config(&self) -> Result<ProjectConfig> {
        match &self.config {
            Some(path) => load_config_file(path),
            None => Ok(load_project_config(&self.path)),
        }
    }
}

/// Run the parsed command with the built-in checks only
pub fn run(cli: Cli, config: ProjectConfig) -> Result<i32> {
    run_with_catalog(cli, config, &CheckCatalog::new())
}

/// Run the parsed command, resolving `custom_rules` against `catalog`.
/// Returns the process exit code.
pub fn run_with_catalog(cli: Cli, config: ProjectConfig, catalog: &CheckCatalog) -> Result<i32> {
    match cli.command {
        None => scan::run(&cli.path, config, catalog, ScanArgs::default()),

        Some(Commands::Scan(args)) => scan::run(&cli.path, config, catalog, args),

        Some(Commands::Rules { rule }) => rules::run(&config, catalog, rule.as_deref()),

        Some(Commands::MakeCheck {
            name,
            category,
            check_type,
            severity,
            dir,
            force,
        }) => make_check::run(
            &cli.path,
            &make_check::StubOptions {
                name,
                category,
                check_type,
                severity,
                dir,
                force,
            },
        ),

        Some(Commands::Init { force }) => init::run(&cli.path, force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_scan() {
        let cli = Cli::try_parse_from(["spotlight"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_scan_args() {
        let cli = Cli::try_parse_from([
            "spotlight",
            "/srv/app",
            "scan",
            "--format",
            "json",
            "--category",
            "security",
            "-c",
            "performance",
            "--fail-on",
            "high",
            "--error-handling",
            "stop",
            "--workers",
            "4",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.path, PathBuf::from("/srv/app"));
        assert!(cli.debug_requested());
        let Some(Commands::Scan(args)) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.categories, vec!["security", "performance"]);
        assert_eq!(args.fail_on, Some(FailOn::Level(crate::models::Severity::High)));
        assert_eq!(args.error_handling, Some(ErrorHandling::Stop));
        assert_eq!(args.workers, Some(4));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["spotlight", ".", "scan", "--format", "sarif"]).is_err());
        assert!(Cli::try_parse_from(["spotlight", ".", "scan", "--fail-on", "sometimes"]).is_err());
        assert!(Cli::try_parse_from(["spotlight", ".", "scan", "--workers", "100"]).is_err());
    }

    #[test]
    fn test_make_check_args() {
        let cli = Cli::try_parse_from([
            "spotlight",
            "make-check",
            "SlowMigrations",
            "--category",
            "performance",
            "--type",
            "objective",
            "--severity",
            "high",
            "--force",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::MakeCheck {
                name,
                check_type,
                severity,
                force,
                ..
            }) => {
                assert_eq!(name, "SlowMigrations");
                assert_eq!(check_type, "objective");
                assert_eq!(severity, "high");
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("0"), Ok(0));
        assert_eq!(parse_workers("8"), Ok(8));
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("x").is_err());
    }
}
