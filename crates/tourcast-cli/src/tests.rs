//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};
use tempfile::TempDir;
use tourcast_core::models::ShowStatus;
use tourcast_core::test_utils::{days_from, reference_now, sample_roster, show_on, spaced_shows};
use tourcast_core::{AgencyType, Show};

use crate::commands::{self, truncate, Inputs};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn write_shows(dir: &TempDir, shows: &[Show]) -> PathBuf {
    write_file(dir, "shows.json", &serde_json::to_string(shows).unwrap())
}

fn write_agencies(dir: &TempDir) -> PathBuf {
    write_file(
        dir,
        "agencies.json",
        &serde_json::to_string(&sample_roster()).unwrap(),
    )
}

fn sample_shows() -> Vec<Show> {
    let now = reference_now();
    vec![
        show_on("nyc", days_from(now, 3), 10_000.0, ShowStatus::Confirmed)
            .with_country("US")
            .with_withholding(10.0)
            .with_cost(500.0, "travel"),
        show_on("ber", days_from(now, 20), 9_000.0, ShowStatus::Pending).with_country("DE"),
        show_on("tyo", days_from(now, 70), 4_000.0, ShowStatus::Offer).with_country("JP"),
    ]
}

fn load(shows: &Path, agencies: Option<&Path>) -> Inputs {
    Inputs::load(shows, agencies, None::<&Path>, Some("2026-03-01")).unwrap()
}

// ========== Input Loading Tests ==========

#[test]
fn test_load_shows() {
    let dir = TempDir::new().unwrap();
    let path = write_shows(&dir, &sample_shows());

    let shows = commands::load_shows(&path).unwrap();
    assert_eq!(shows.len(), 3);
    assert_eq!(shows[0].id, "nyc");
    assert_eq!(shows[0].costs_total(), 500.0);
}

#[test]
fn test_load_shows_camel_case_records() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "shows.json",
        r#"[{
            "id": "s1",
            "date": "2026-04-10",
            "fee": 5000,
            "status": "confirmed",
            "country": "es",
            "withholdingPct": 15,
            "bookingAgencyRef": "Worldwide Booking",
            "costs": [{"amount": 200, "type": "hotel"}]
        }]"#,
    );

    let shows = commands::load_shows(&path).unwrap();
    assert_eq!(shows[0].withholding_pct, 15.0);
    assert_eq!(shows[0].booking_agency_ref.as_deref(), Some("Worldwide Booking"));
    assert_eq!(shows[0].costs[0].kind, "hotel");
}

#[test]
fn test_load_shows_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = commands::load_shows(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read shows file"));
}

#[test]
fn test_load_shows_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "shows.json", "{not json");
    let err = commands::load_shows(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid shows file"));
}

#[test]
fn test_load_roster() {
    let dir = TempDir::new().unwrap();
    let path = write_agencies(&dir);

    let roster = commands::load_roster(&path, 3).unwrap();
    assert_eq!(roster.booking.len(), 2);
    assert_eq!(roster.management.len(), 1);
    assert_eq!(roster.find("road management").unwrap().id, "mgmt");
}

#[test]
fn test_load_roster_routes_by_type_and_clamps() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "agencies.json",
        r#"{
            "booking": [
                {"name": "Misfiled", "type": "management", "commissionPct": 140, "territoryMode": "worldwide"}
            ]
        }"#,
    );

    let roster = commands::load_roster(&path, 3).unwrap();
    assert!(roster.booking.is_empty());
    let agency = &roster.management[0];
    assert_eq!(agency.agency_type, AgencyType::Management);
    assert_eq!(agency.commission_pct(), 100.0);
    // Generated id for a record without one
    assert_eq!(agency.id, "management-1");
}

#[test]
fn test_load_roster_enforces_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_agencies(&dir);

    let err = commands::load_roster(&path, 1).unwrap_err();
    assert!(format!("{:#}", err).contains("Agency limit reached"));
}

#[test]
fn test_resolve_now() {
    let now = commands::resolve_now(Some("2026-03-01")).unwrap();
    assert_eq!(now, reference_now());

    let now = commands::resolve_now(Some("2026-03-01T12:30:00+02:00")).unwrap();
    assert_eq!((now.day(), now.hour(), now.minute()), (1, 10, 30));

    assert!(commands::resolve_now(Some("next tuesday")).is_err());
    assert!(commands::resolve_now(None).is_ok());
}

#[test]
fn test_load_config_override() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "engine.toml", "[health]\nbenchmark_value = 8000.0\n");

    let config = commands::load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.health.benchmark_value, 8000.0);

    let bad = write_file(&dir, "bad.toml", "health = [");
    assert!(commands::load_config(Some(bad.as_path())).is_err());
}

#[test]
fn test_inputs_load_without_agencies() {
    let dir = TempDir::new().unwrap();
    let shows = write_shows(&dir, &sample_shows());

    let inputs = load(&shows, None);
    assert!(inputs.roster.is_empty());
    assert_eq!(inputs.now, reference_now());
    assert_eq!(inputs.shows.len(), 3);
}

// ========== Report Tests ==========

#[test]
fn test_report_values() {
    let dir = TempDir::new().unwrap();
    let shows = write_shows(&dir, &sample_shows());
    let agencies = write_agencies(&dir);

    let report = load(&shows, Some(agencies.as_path())).report();

    // US show pays the worldwide booker (10%), the NA booker (12%) and management (15%)
    let nyc = report.net_for("nyc").unwrap();
    assert_eq!(nyc.commissions.len(), 3);
    assert!((nyc.breakdown.commission - 3_700.0).abs() < 1e-9);
    assert!((nyc.breakdown.net - (10_000.0 - 1_000.0 - 3_700.0 - 500.0)).abs() < 1e-9);

    // The NA booker earns nothing in Germany or Japan
    assert!((report.commissions_by_agency["na"] - 1_200.0).abs() < 1e-9);
    // The Tokyo offer is not a deal yet, so only nyc and ber pay the worldwide booker
    assert!((report.commissions_by_agency["wb"] - 1_900.0).abs() < 1e-9);
    let tyo = report.net_for("tyo").unwrap();
    assert!(tyo.commissions.is_empty());
    assert_eq!(tyo.breakdown.commission, 0.0);
}

#[test]
fn test_ten_show_scenario_at_midnight() {
    let dir = TempDir::new().unwrap();
    let shows = write_shows(
        &dir,
        &spaced_shows(reference_now(), 10, 5, 6000.0, ShowStatus::Confirmed),
    );

    let report = load(&shows, None).report();
    // Day 0 through day 30 inclusive
    assert_eq!(report.snapshot.window(30).unwrap().shows, 7);
    assert_eq!(report.health.factors.booking_rate.points, 30.0);
    assert_eq!(report.health.factors.revenue_health.points, 30.0);
}

#[test]
fn test_commands_succeed() {
    let dir = TempDir::new().unwrap();
    let shows = write_shows(&dir, &sample_shows());
    let agencies = write_agencies(&dir);
    let inputs = load(&shows, Some(agencies.as_path()));

    for json in [false, true] {
        assert!(commands::cmd_summary(&inputs, json).is_ok());
        assert!(commands::cmd_health(&inputs, json).is_ok());
        assert!(commands::cmd_alerts(&inputs, json).is_ok());
        assert!(commands::cmd_predict(&inputs, json).is_ok());
        assert!(commands::cmd_commissions(&inputs, None, json).is_ok());
        assert!(commands::cmd_commissions(&inputs, Some("nyc"), json).is_ok());
        assert!(commands::cmd_report(&inputs, json).is_ok());
    }
}

#[test]
fn test_commands_with_empty_collection() {
    let dir = TempDir::new().unwrap();
    let shows = write_file(&dir, "shows.json", "[]");
    let inputs = load(&shows, None);

    let report = inputs.report();
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.health.score, 25);
    assert!(commands::cmd_report(&inputs, false).is_ok());
}

#[test]
fn test_commissions_unknown_show() {
    let dir = TempDir::new().unwrap();
    let shows = write_shows(&dir, &sample_shows());
    let inputs = load(&shows, None);

    let err = commands::cmd_commissions(&inputs, Some("missing"), false).unwrap_err();
    assert!(err.to_string().contains("Show not found"));
}

#[test]
fn test_bad_dates_do_not_fail_reports() {
    let dir = TempDir::new().unwrap();
    let mut shows = sample_shows();
    shows[1].date = "sometime in may".to_string();
    let path = write_shows(&dir, &shows);
    let inputs = load(&path, None);

    let report = inputs.report();
    assert_eq!(report.snapshot.excluded, vec!["ber".to_string()]);
    // Net does not depend on the date
    assert!(report.net_for("ber").is_some());
    assert!(commands::cmd_summary(&inputs, false).is_ok());
}

#[test]
fn test_cmd_config() {
    let config = commands::load_config(None).unwrap();
    assert!(commands::cmd_config(&config).is_ok());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long agency name", 10), "a very ...");
    assert_eq!(truncate("Zürich Booking", 6), "Zür...");
}
