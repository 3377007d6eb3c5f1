//! Test utilities for tourcast-core
//!
//! Builders for shows and agency rosters around a fixed reference instant,
//! shared by the unit tests and the CLI tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{AgencyConfig, AgencyRoster, Continent, Show, ShowStatus, Territory};

/// Fixed "now" used across tests: 2026-03-01 at midnight UTC
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// RFC 3339 date `days` away from `now` (negative for the past)
pub fn days_from(now: DateTime<Utc>, days: i64) -> String {
    (now + Duration::days(days)).to_rfc3339()
}

pub fn show_on(id: &str, date: String, fee: f64, status: ShowStatus) -> Show {
    Show::new(id, date, fee, status)
}

/// `count` shows every `spacing` days starting at `now`
pub fn spaced_shows(
    now: DateTime<Utc>,
    count: usize,
    spacing: i64,
    fee: f64,
    status: ShowStatus,
) -> Vec<Show> {
    (0..count)
        .map(|i| show_on(&format!("show-{}", i + 1), days_from(now, i as i64 * spacing), fee, status))
        .collect()
}

/// Two booking agencies (worldwide and North America) and one worldwide
/// management agency
pub fn sample_roster() -> AgencyRoster {
    let mut roster = AgencyRoster::new();
    roster.booking = vec![
        AgencyConfig::booking("wb", "Worldwide Booking", 10.0),
        AgencyConfig::booking("na", "North America Live", 12.0)
            .with_territory(Territory::continents([Continent::NorthAmerica])),
    ];
    roster.management = vec![AgencyConfig::management("mgmt", "Road Management", 15.0)];
    roster
}
