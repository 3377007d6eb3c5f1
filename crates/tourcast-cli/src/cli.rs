//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tourcast - Revenue intelligence for touring artists
#[derive(Parser)]
#[command(name = "tourcast")]
#[command(about = "Projections, health and alerts for a show pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Shows file (JSON array of show records)
    #[arg(long, default_value = "shows.json", global = true)]
    pub shows: PathBuf,

    /// Agencies file (JSON object with `booking` and `management` lists)
    #[arg(long, global = true)]
    pub agencies: Option<PathBuf>,

    /// Engine config override (TOML)
    ///
    /// Defaults to ~/.local/share/tourcast/engine.toml when present,
    /// otherwise the built-in configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference instant (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Revenue projections per window and growth vs the trailing period
    Summary,

    /// Pipeline health score with insights
    Health,

    /// Actionable alerts, most urgent first
    Alerts,

    /// Damped 90-day predictions
    Predict,

    /// Commission totals per agency and net per show
    Commissions {
        /// Only show the net breakdown for this show id
        #[arg(long)]
        show: Option<String>,
    },

    /// Everything above as one document
    Report,

    /// Print the effective engine configuration
    Config,
}
