//! Alert Generator
//!
//! A fixed list of independent rules evaluated in order. Rule order is also
//! priority order, so truncation keeps the most urgent alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::days_after;
use crate::models::{Show, ShowStatus};

use super::types::{Alert, AlertKind, Impact};

/// Alert rule thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// An empty schedule over this many days is critical
    pub gap_days: u32,
    /// Pending fees above this are worth chasing
    pub high_value_threshold: f64,
    pub high_value_window_days: u32,
    /// Mid-term pipeline range, in days from now
    pub pipeline_start_days: u32,
    pub pipeline_end_days: u32,
    pub pipeline_min_shows: usize,
    /// Confirmed revenue target and how close counts as "near"
    pub milestone: f64,
    pub milestone_band: f64,
    pub milestone_window_days: u32,
    pub max_alerts: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            gap_days: 14,
            high_value_threshold: 8000.0,
            high_value_window_days: 30,
            pipeline_start_days: 60,
            pipeline_end_days: 90,
            pipeline_min_shows: 5,
            milestone: 50_000.0,
            milestone_band: 5_000.0,
            milestone_window_days: 90,
            max_alerts: 4,
        }
    }
}

/// Evaluates alert rules against a show collection
#[derive(Debug, Clone, Default)]
pub struct AlertGenerator {
    config: AlertConfig,
}

impl AlertGenerator {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, shows: &[Show], now: DateTime<Utc>) -> Vec<Alert> {
        let cfg = &self.config;

        let dated: Vec<(&Show, DateTime<Utc>)> = shows
            .iter()
            .filter(|show| show.status != ShowStatus::Archived)
            .filter_map(|show| match show.instant() {
                Some(at) => Some((show, at)),
                None => {
                    tracing::debug!(show_id = %show.id, "Skipping show with unparsable date");
                    None
                }
            })
            .collect();

        let between = |from_days: u32, to_days: u32| {
            let start = days_after(now, from_days);
            let end = days_after(now, to_days);
            dated
                .iter()
                .filter(move |(_, at)| *at >= start && *at <= end)
                .map(|(show, _)| *show)
        };

        let mut alerts = vec![];

        if between(0, cfg.gap_days).next().is_none() {
            alerts.push(
                Alert::new(
                    format!("no-shows-{}d", cfg.gap_days),
                    AlertKind::Critical,
                    Impact::High,
                    "Schedule Gap Detected",
                    format!("No shows scheduled for the next {} days", cfg.gap_days),
                )
                .with_action("Book Shows", "shows"),
            );
        }

        let high_value: Vec<&Show> = between(0, cfg.high_value_window_days)
            .filter(|show| show.status == ShowStatus::Pending && show.fee > cfg.high_value_threshold)
            .collect();
        if !high_value.is_empty() {
            let at_risk: f64 = high_value.iter().map(|show| show.fee).sum();
            let title = if high_value.len() == 1 {
                "1 High-Value Show Pending".to_string()
            } else {
                format!("{} High-Value Shows Pending", high_value.len())
            };
            alerts.push(
                Alert::new(
                    "high-value-pending",
                    AlertKind::Opportunity,
                    Impact::High,
                    title,
                    format!("{} potential revenue at risk", format_amount(at_risk)),
                )
                .with_action("Review", "shows?filter=pending"),
            );
        }

        // With nothing booked at all the schedule gap already says it
        let pipeline = between(cfg.pipeline_start_days, cfg.pipeline_end_days).count();
        if !dated.is_empty() && pipeline < cfg.pipeline_min_shows {
            alerts.push(
                Alert::new(
                    format!("low-pipeline-{}-{}", cfg.pipeline_start_days, cfg.pipeline_end_days),
                    AlertKind::Warning,
                    Impact::Medium,
                    "Weak Future Pipeline",
                    format!(
                        "Only {} shows in {}-{} day window",
                        pipeline, cfg.pipeline_start_days, cfg.pipeline_end_days
                    ),
                )
                .with_action("Plan Ahead", "shows"),
            );
        }

        let confirmed: f64 = between(0, cfg.milestone_window_days)
            .filter(|show| show.status == ShowStatus::Confirmed)
            .map(|show| show.fee)
            .sum();
        if confirmed >= cfg.milestone - cfg.milestone_band && confirmed < cfg.milestone {
            alerts.push(Alert::new(
                format!("milestone-{}", cfg.milestone.round() as i64),
                AlertKind::Info,
                Impact::Low,
                "Revenue Milestone Near",
                format!(
                    "{} away from {} confirmed",
                    format_amount(cfg.milestone - confirmed),
                    format_amount(cfg.milestone)
                ),
            ));
        }

        alerts.truncate(cfg.max_alerts);
        tracing::debug!(count = alerts.len(), "Alerts generated");
        alerts
    }
}

/// Format an amount rounded to whole units with thousands separators
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{days_from, reference_now, show_on};

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.4), "999");
        assert_eq!(format_amount(1234.0), "1,234");
        assert_eq!(format_amount(50_000.0), "50,000");
        assert_eq!(format_amount(1_234_567.8), "1,234,568");
        assert_eq!(format_amount(-4500.0), "-4,500");
    }

    #[test]
    fn test_empty_collection_only_schedule_gap() {
        let alerts = AlertGenerator::default().generate(&[], reference_now());
        assert_eq!(ids(&alerts), vec!["no-shows-14d"]);
        assert_eq!(alerts[0].kind, AlertKind::Critical);
        assert_eq!(alerts[0].impact, Impact::High);
        assert_eq!(alerts[0].action.as_ref().unwrap().target, "shows");
    }

    #[test]
    fn test_high_value_pending_aggregates() {
        let now = reference_now();
        let shows = vec![
            show_on("p1", days_from(now, 3), 9000.0, ShowStatus::Pending),
            show_on("p2", days_from(now, 20), 12000.0, ShowStatus::Pending),
            show_on("small", days_from(now, 4), 8000.0, ShowStatus::Pending),
            show_on("late", days_from(now, 31), 20000.0, ShowStatus::Pending),
            show_on("conf", days_from(now, 5), 30000.0, ShowStatus::Confirmed),
        ];
        let alerts = AlertGenerator::default().generate(&shows, now);

        let alert = alerts.iter().find(|a| a.id == "high-value-pending").unwrap();
        assert_eq!(alert.kind, AlertKind::Opportunity);
        assert_eq!(alert.title, "2 High-Value Shows Pending");
        assert_eq!(alert.message, "21,000 potential revenue at risk");
        assert!(!ids(&alerts).contains(&"no-shows-14d"));
    }

    #[test]
    fn test_healthy_pipeline_has_no_warning() {
        let now = reference_now();
        let shows: Vec<Show> = (0..5)
            .map(|i| show_on(&format!("s{}", i), days_from(now, 60 + i * 6), 1000.0, ShowStatus::Pending))
            .chain(std::iter::once(show_on(
                "soon",
                days_from(now, 2),
                1000.0,
                ShowStatus::Confirmed,
            )))
            .collect();
        let alerts = AlertGenerator::default().generate(&shows, now);
        assert!(alerts.is_empty(), "unexpected alerts: {:?}", ids(&alerts));
    }

    #[test]
    fn test_milestone_band() {
        let now = reference_now();
        let near = vec![
            show_on("a", days_from(now, 1), 30000.0, ShowStatus::Confirmed),
            show_on("b", days_from(now, 40), 16000.0, ShowStatus::Confirmed),
        ];
        let alerts = AlertGenerator::default().generate(&near, now);
        let milestone = alerts.iter().find(|a| a.id == "milestone-50000").unwrap();
        assert_eq!(milestone.kind, AlertKind::Info);
        assert_eq!(milestone.message, "4,000 away from 50,000 confirmed");
        assert!(milestone.action.is_none());

        let reached = vec![show_on("a", days_from(now, 1), 50000.0, ShowStatus::Confirmed)];
        let alerts = AlertGenerator::default().generate(&reached, now);
        assert!(!ids(&alerts).iter().any(|id| id.starts_with("milestone")));

        let far = vec![show_on("a", days_from(now, 1), 44999.0, ShowStatus::Confirmed)];
        let alerts = AlertGenerator::default().generate(&far, now);
        assert!(!ids(&alerts).iter().any(|id| id.starts_with("milestone")));
    }

    #[test]
    fn test_order_and_truncation() {
        let now = reference_now();
        // Pending high-value show beyond the gap window, milestone in range
        let shows = vec![
            show_on("p", days_from(now, 20), 9000.0, ShowStatus::Pending),
            show_on("c", days_from(now, 25), 47000.0, ShowStatus::Confirmed),
        ];
        let alerts = AlertGenerator::default().generate(&shows, now);
        assert_eq!(
            ids(&alerts),
            vec![
                "no-shows-14d",
                "high-value-pending",
                "low-pipeline-60-90",
                "milestone-50000"
            ]
        );

        let capped = AlertGenerator::new(AlertConfig {
            max_alerts: 2,
            ..Default::default()
        })
        .generate(&shows, now);
        assert_eq!(ids(&capped), vec!["no-shows-14d", "high-value-pending"]);
    }

    #[test]
    fn test_archived_and_bad_dates_ignored() {
        let now = reference_now();
        let mut bad = show_on("bad", days_from(now, 1), 1000.0, ShowStatus::Confirmed);
        bad.date = "tbd".to_string();
        let shows = vec![
            bad,
            show_on("arch", days_from(now, 1), 1000.0, ShowStatus::Archived),
        ];
        let alerts = AlertGenerator::default().generate(&shows, now);
        assert_eq!(ids(&alerts), vec!["no-shows-14d"]);
    }

    #[test]
    fn test_weak_pipeline_warning() {
        let now = reference_now();
        let shows = vec![
            show_on("soon", days_from(now, 2), 1000.0, ShowStatus::Confirmed),
            show_on("mid", days_from(now, 70), 1000.0, ShowStatus::Offer),
        ];
        let alerts = AlertGenerator::default().generate(&shows, now);
        assert_eq!(ids(&alerts), vec!["low-pipeline-60-90"]);
        assert_eq!(alerts[0].kind, AlertKind::Warning);
        assert_eq!(alerts[0].impact, Impact::Medium);
        assert_eq!(alerts[0].message, "Only 1 shows in 60-90 day window");
    }
}
