//! Intelligence pipeline
//!
//! Runs the aggregator once per recomputation and feeds its snapshot to the
//! health scorer and predictor, alongside alert generation and commission
//! attribution over the raw collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::aggregate::Snapshot;
use crate::cache::SnapshotCache;
use crate::commission::{agencies_for_show, commission_breakdown, commission_by_agency, CommissionLine};
use crate::config::EngineConfig;
use crate::insights::{
    Alert, AlertGenerator, HealthScore, HealthScorer, Prediction, PredictionInput, Predictor,
};
use crate::models::{AgencyRoster, Show};
use crate::projection::{net_breakdown, NetBreakdown};

/// Net figures for one show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowNet {
    pub show_id: String,
    pub breakdown: NetBreakdown,
    /// Per-agency shares making up `breakdown.commission`
    pub commissions: Vec<CommissionLine>,
}

/// Everything the engine derives from one show collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceReport {
    pub snapshot: Arc<Snapshot>,
    pub health: HealthScore,
    pub alerts: Vec<Alert>,
    pub predictions: Vec<Prediction>,
    /// In input order
    pub nets: Vec<ShowNet>,
    pub commissions_by_agency: BTreeMap<String, f64>,
}

impl IntelligenceReport {
    pub fn net_for(&self, show_id: &str) -> Option<&ShowNet> {
        self.nets.iter().find(|n| n.show_id == show_id)
    }
}

/// Stateless entry points
pub struct Intelligence;

impl Intelligence {
    /// Compute a full report without caching
    pub fn compute(
        shows: &[Show],
        roster: &AgencyRoster,
        now: DateTime<Utc>,
        config: &EngineConfig,
    ) -> IntelligenceReport {
        let snapshot = Arc::new(config.aggregator().aggregate(shows, now, &config.effective_windows()));
        Self::from_snapshot(snapshot, shows, roster, now, config)
    }

    /// Per-show net breakdowns under the configured commission policy
    pub fn nets(shows: &[Show], roster: &AgencyRoster, config: &EngineConfig) -> Vec<ShowNet> {
        shows
            .iter()
            .map(|show| {
                let agencies = agencies_for_show(show, roster, config.commission_policy);
                ShowNet {
                    show_id: show.id.clone(),
                    breakdown: net_breakdown(show, agencies.all()),
                    commissions: commission_breakdown(show, agencies.all()),
                }
            })
            .collect()
    }

    fn from_snapshot(
        snapshot: Arc<Snapshot>,
        shows: &[Show],
        roster: &AgencyRoster,
        now: DateTime<Utc>,
        config: &EngineConfig,
    ) -> IntelligenceReport {
        let health = HealthScorer::new(config.health.clone()).score(&snapshot);
        let alerts = AlertGenerator::new(config.alerts.clone()).generate(shows, now);

        let predictor = Predictor::new(config.prediction.clone());
        let input = PredictionInput::from_snapshot(&snapshot, predictor.horizon_days());
        let predictions = predictor.predict(&input);

        let nets = Self::nets(shows, roster, config);
        let commissions_by_agency = commission_by_agency(shows, roster, config.commission_policy);

        tracing::info!(
            shows = shows.len(),
            excluded = snapshot.excluded.len(),
            score = health.score,
            grade = health.grade.as_str(),
            alerts = alerts.len(),
            "Intelligence report computed"
        );

        IntelligenceReport {
            snapshot,
            health,
            alerts,
            predictions,
            nets,
            commissions_by_agency,
        }
    }
}

/// Report generator that reuses the last snapshot while inputs are unchanged
pub struct IntelligenceEngine {
    config: EngineConfig,
    cache: SnapshotCache,
}

impl IntelligenceEngine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = config.snapshot_cache();
        Self { config, cache }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Aggregated snapshot, shared with earlier calls when nothing changed
    pub fn snapshot(&mut self, shows: &Arc<[Show]>, now: DateTime<Utc>) -> Arc<Snapshot> {
        let windows = self.config.effective_windows();
        self.cache.get(shows, now, &windows)
    }

    pub fn report(
        &mut self,
        shows: &Arc<[Show]>,
        roster: &AgencyRoster,
        now: DateTime<Utc>,
    ) -> IntelligenceReport {
        let snapshot = self.snapshot(shows, now);
        tracing::debug!(
            hits = self.cache.hits(),
            misses = self.cache.misses(),
            "Snapshot cache state"
        );
        Intelligence::from_snapshot(snapshot, shows, roster, now, &self.config)
    }

    /// Swap the configuration; cached snapshots are dropped
    pub fn set_config(&mut self, config: EngineConfig) {
        self.cache = config.snapshot_cache();
        self.config = config;
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }
}

impl Default for IntelligenceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::CommissionPolicy;
    use crate::insights::{Grade, PredictionMetric};
    use crate::models::{AgencyConfig, ShowStatus};
    use crate::test_utils::{days_from, reference_now, sample_roster, show_on};

    fn shows() -> Vec<Show> {
        let now = reference_now();
        vec![
            show_on("nyc", days_from(now, 3), 10_000.0, ShowStatus::Confirmed)
                .with_country("US")
                .with_withholding(10.0),
            show_on("ber", days_from(now, 20), 9_000.0, ShowStatus::Pending).with_country("DE"),
            show_on("tyo", days_from(now, 70), 4_000.0, ShowStatus::Offer).with_country("JP"),
            show_on("old", days_from(now, -10), 3_000.0, ShowStatus::Confirmed).with_country("FR"),
        ]
    }

    #[test]
    fn test_empty_inputs_yield_defaults() {
        let report = Intelligence::compute(&[], &AgencyRoster::new(), reference_now(), &EngineConfig::default());

        assert!(report.snapshot.windows.iter().all(|w| w.shows == 0 && w.expected_revenue == 0.0));
        assert_eq!(report.health.score, 25);
        assert_eq!(report.health.grade, Grade::F);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].id, "no-shows-14d");
        assert_eq!(report.predictions.len(), 3);
        assert_eq!(report.predictions[0].confidence, 0.4);
        assert!(report.nets.is_empty());
        assert!(report.commissions_by_agency.is_empty());
    }

    #[test]
    fn test_oversized_day_counts_do_not_panic() {
        let config = EngineConfig::parse(
            r#"
            windows_days = [100000000]
            trailing_days = 4000000000

            [alerts]
            gap_days = 100000000
            pipeline_end_days = 4000000000

            [prediction]
            horizon_days = 100000000
            "#,
        )
        .unwrap();

        let empty = Intelligence::compute(&[], &AgencyRoster::new(), reference_now(), &config);
        assert_eq!(empty.alerts[0].id, "no-shows-100000000d");

        let report = Intelligence::compute(&shows(), &sample_roster(), reference_now(), &config);
        assert_eq!(report.snapshot.window(100_000_000).unwrap().shows, 3);
        assert_eq!(report.snapshot.trailing.shows, 1);
    }

    #[test]
    fn test_net_scenario() {
        let now = reference_now();
        let show = show_on("s", days_from(now, 1), 10_000.0, ShowStatus::Confirmed)
            .with_country("US")
            .with_withholding(10.0);
        let mut roster = AgencyRoster::new();
        roster.add(AgencyConfig::booking("b", "Booker", 15.0)).unwrap();

        let report = Intelligence::compute(&[show], &roster, now, &EngineConfig::default());
        let net = report.net_for("s").unwrap();
        assert!((net.breakdown.commission - 1_500.0).abs() < 1e-9);
        assert!((net.breakdown.net - 7_500.0).abs() < 1e-9);
        assert_eq!(net.commissions.len(), 1);
        assert_eq!(report.commissions_by_agency["b"], 1_500.0);
    }

    #[test]
    fn test_report_covers_every_show() {
        let shows = shows();
        let report = Intelligence::compute(&shows, &sample_roster(), reference_now(), &EngineConfig::default());

        let ids: Vec<&str> = report.nets.iter().map(|n| n.show_id.as_str()).collect();
        assert_eq!(ids, vec!["nyc", "ber", "tyo", "old"]);
        assert_eq!(report.predictions[0].metric, PredictionMetric::Revenue90d);
        // Trailing baseline holds the confirmed show from 10 days ago
        assert_eq!(report.predictions[0].confidence, 0.75);
        assert!(report.snapshot.window(90).is_some());
    }

    #[test]
    fn test_policy_changes_attribution() {
        let shows = vec![show_on("s", "2026-04-01".to_string(), 1_000.0, ShowStatus::Confirmed)
            .with_country("US")
            .with_booking_agency("Worldwide Booking")];
        let roster = sample_roster();

        let territory = Intelligence::compute(&shows, &roster, reference_now(), &EngineConfig::default());
        let referenced = Intelligence::compute(
            &shows,
            &roster,
            reference_now(),
            &EngineConfig {
                commission_policy: CommissionPolicy::ReferencedOnly,
                ..Default::default()
            },
        );

        assert!(territory.nets[0].commissions.len() > referenced.nets[0].commissions.len());
        assert_eq!(referenced.nets[0].commissions.len(), 1);
        assert_eq!(referenced.nets[0].commissions[0].agency_id, "wb");
    }

    #[test]
    fn test_engine_reuses_snapshot() {
        let mut engine = IntelligenceEngine::default();
        let shows: Arc<[Show]> = shows().into();
        let roster = sample_roster();
        let now = reference_now();

        let first = engine.report(&shows, &roster, now);
        let second = engine.report(&shows, &roster, now);
        assert!(Arc::ptr_eq(&first.snapshot, &second.snapshot));
        assert_eq!(first, second);
        assert_eq!(engine.cache().hits(), 1);

        // Same as the uncached path
        let direct = Intelligence::compute(&shows, &roster, now, engine.config());
        assert_eq!(*direct.snapshot, *first.snapshot);
        assert_eq!(direct.health, first.health);
    }

    #[test]
    fn test_set_config_drops_cache() {
        let mut engine = IntelligenceEngine::default();
        let shows: Arc<[Show]> = shows().into();
        let now = reference_now();

        let before = engine.snapshot(&shows, now);
        engine.set_config(EngineConfig {
            windows_days: vec![14],
            ..Default::default()
        });
        let after = engine.snapshot(&shows, now);
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(after.window(14).is_some());
        assert!(after.window(180).is_none());
    }
}
