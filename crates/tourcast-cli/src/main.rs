//! Tourcast CLI - Revenue intelligence for touring artists
//!
//! Usage:
//!   tourcast summary                     Window projections and growth
//!   tourcast health --now 2026-03-01     Health score at a given date
//!   tourcast commissions --agencies a.json
//!   tourcast report --json               Full report as JSON

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    // Config is the only command that needs no show data
    let load = || {
        commands::Inputs::load(
            &cli.shows,
            cli.agencies.as_deref(),
            cli.config.as_deref(),
            cli.now.as_deref(),
        )
    };

    match &cli.command {
        Commands::Summary => commands::cmd_summary(&load()?, cli.json),
        Commands::Health => commands::cmd_health(&load()?, cli.json),
        Commands::Alerts => commands::cmd_alerts(&load()?, cli.json),
        Commands::Predict => commands::cmd_predict(&load()?, cli.json),
        Commands::Commissions { show } => {
            commands::cmd_commissions(&load()?, show.as_deref(), cli.json)
        }
        Commands::Report => commands::cmd_report(&load()?, cli.json),
        Commands::Config => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_config(&config)
        }
    }
}
