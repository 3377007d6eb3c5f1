//! Shared input loading
//!
//! This module contains:
//! - `load_shows` - Read the show collection from JSON
//! - `load_roster` - Read and validate the agency roster
//! - `load_config` - Resolve the engine configuration
//! - `resolve_now` - Parse the reference instant

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tourcast_core::models::parse_instant;
use tourcast_core::{
    AgencyConfig, AgencyRoster, EngineConfig, IntelligenceEngine, IntelligenceReport, Show,
};

/// Everything a report command works from
pub struct Inputs {
    pub shows: Arc<[Show]>,
    pub roster: AgencyRoster,
    pub config: EngineConfig,
    pub now: DateTime<Utc>,
}

impl Inputs {
    pub fn load(
        shows_path: &Path,
        agencies_path: Option<&Path>,
        config_path: Option<&Path>,
        now: Option<&str>,
    ) -> Result<Self> {
        let config = load_config(config_path)?;
        let shows = load_shows(shows_path)?;
        let roster = match agencies_path {
            Some(path) => load_roster(path, config.max_agencies_per_type)?,
            None => AgencyRoster::with_limit(config.max_agencies_per_type),
        };
        let now = resolve_now(now)?;

        tracing::debug!(
            shows = shows.len(),
            agencies = roster.iter().count(),
            now = %now,
            "Inputs loaded"
        );

        Ok(Self {
            shows: shows.into(),
            roster,
            config,
            now,
        })
    }

    pub fn report(&self) -> IntelligenceReport {
        let mut engine = IntelligenceEngine::new(self.config.clone());
        engine.report(&self.shows, &self.roster, self.now)
    }
}

/// Read a JSON array of shows
pub fn load_shows(path: &Path) -> Result<Vec<Show>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read shows file {}", path.display()))?;
    let shows: Vec<Show> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid shows file {}", path.display()))?;

    let mut seen = HashSet::new();
    for show in &shows {
        if !seen.insert(show.id.as_str()) {
            tracing::warn!(show_id = %show.id, "Duplicate show id");
        }
    }

    Ok(shows)
}

#[derive(Debug, Default, Deserialize)]
struct RosterFile {
    #[serde(default)]
    booking: Vec<AgencyConfig>,
    #[serde(default)]
    management: Vec<AgencyConfig>,
}

/// Read the agency roster, enforcing the per-type limit.
///
/// Each agency lands in the list for its own `type`, whichever list it was
/// written under.
pub fn load_roster(path: &Path, max_per_type: usize) -> Result<AgencyRoster> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read agencies file {}", path.display()))?;
    let file: RosterFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid agencies file {}", path.display()))?;

    let mut roster = AgencyRoster::with_limit(max_per_type);
    for agency in file.booking.into_iter().chain(file.management) {
        let name = agency.name.clone();
        roster
            .add(agency)
            .with_context(|| format!("Cannot add agency '{}'", name))?;
    }

    Ok(roster)
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    EngineConfig::load(path).context("Failed to load engine config")
}

/// Parse `--now`, defaulting to the current time
pub fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_instant(raw)
            .with_context(|| format!("Invalid --now value '{}' (use RFC 3339 or YYYY-MM-DD)", raw)),
        None => Ok(Utc::now()),
    }
}
