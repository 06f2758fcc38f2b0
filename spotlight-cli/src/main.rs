//! Spotlight - Laravel application scanner
//!
//! Pattern-based performance, security and architecture checks for Laravel
//! codebases, with a severity-weighted health score.

use anyhow::Result;
use clap::Parser;
use spotlight::cli;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging: RUST_LOG wins, else --log-level
    let from_env = EnvFilter::try_from_default_env().ok();
    let env_overrides = from_env.is_some();
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(&cli.log_level));
    let (filter, filter_handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.load_config()?;
    if (config.debug || cli.debug_requested()) && !env_overrides {
        filter_handle.modify(|filter| *filter = EnvFilter::new("debug"))?;
    }

    let code = cli::run(cli, config)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
