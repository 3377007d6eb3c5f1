//! Health Scorer
//!
//! Scores the next 90 days of the pipeline out of 100:
//! - Booking rate (30): share of confirmed shows
//! - Revenue health (30): average expected value vs a benchmark
//! - Conversion (25): confirmed vs confirmed + open offers
//! - Pipeline timing (15): enough shows booked near and mid term

use serde::{Deserialize, Serialize};

use crate::aggregate::Snapshot;

use super::types::{FactorScore, Grade, HealthFactors, HealthScore};

const BOOKING_POINTS: f64 = 30.0;
const REVENUE_POINTS: f64 = 30.0;
const CONVERSION_POINTS: f64 = 25.0;
const TIMING_POINTS: f64 = 15.0;

/// Health scoring thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Reference average show value (currency units)
    pub benchmark_value: f64,
    /// Window the factors are computed over
    pub pipeline_days: u32,
    /// Near-term window for the timing factor
    pub near_term_days: u32,
    /// Shows needed in the near-term window for half the timing points
    pub near_term_min_shows: usize,
    /// Shows needed in the pipeline window for the other half
    pub pipeline_min_shows: usize,
    /// Booking rate below this triggers an insight
    pub low_booking_rate: f64,
    /// Average value below this share of the benchmark triggers an insight
    pub low_value_ratio: f64,
    /// Conversion below this (with at least one offer) triggers an insight
    pub low_conversion: f64,
    /// Scores at or above this get a positive insight
    pub excellent_score: u8,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            benchmark_value: 5000.0,
            pipeline_days: 90,
            near_term_days: 30,
            near_term_min_shows: 3,
            pipeline_min_shows: 8,
            low_booking_rate: 0.5,
            low_value_ratio: 0.7,
            low_conversion: 0.4,
            excellent_score: 85,
        }
    }
}

impl HealthConfig {
    /// Windows the scorer reads from a snapshot
    pub fn required_windows(&self) -> [u32; 2] {
        [self.near_term_days, self.pipeline_days]
    }
}

/// Computes a [`HealthScore`] from an aggregated snapshot
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    config: HealthConfig,
}

impl HealthScorer {
    pub fn new(config: HealthConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, snapshot: &Snapshot) -> HealthScore {
        let cfg = &self.config;
        let pipeline = snapshot.window_or_empty(cfg.pipeline_days);
        let near_term = snapshot.window_or_empty(cfg.near_term_days);

        let booking_rate = if pipeline.shows > 0 {
            pipeline.confirmed as f64 / pipeline.shows as f64
        } else {
            0.0
        };

        let avg_show_value = pipeline.avg_show_value();
        let value_ratio = if cfg.benchmark_value > 0.0 {
            (avg_show_value / cfg.benchmark_value).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // No open offers means nothing failed to convert
        let conversion_rate = if pipeline.offer > 0 {
            pipeline.confirmed as f64 / (pipeline.confirmed + pipeline.offer) as f64
        } else {
            1.0
        };

        let near_term_ok = near_term.shows >= cfg.near_term_min_shows;
        let pipeline_ok = pipeline.shows >= cfg.pipeline_min_shows;
        let timing_points = (if near_term_ok { TIMING_POINTS / 2.0 } else { 0.0 })
            + (if pipeline_ok { TIMING_POINTS / 2.0 } else { 0.0 });

        let factors = HealthFactors {
            booking_rate: FactorScore::new(booking_rate * BOOKING_POINTS, BOOKING_POINTS),
            revenue_health: FactorScore::new(value_ratio * REVENUE_POINTS, REVENUE_POINTS),
            conversion: FactorScore::new(conversion_rate * CONVERSION_POINTS, CONVERSION_POINTS),
            timing: FactorScore::new(timing_points, TIMING_POINTS),
        };

        let score = factors.total_points().round().clamp(0.0, 100.0) as u8;
        let grade = Grade::from_score(score);

        let mut insights = vec![];
        let mut recommendations = vec![];
        let mut note = |insight: &str, recommendation: &str| {
            insights.push(insight.to_string());
            recommendations.push(recommendation.to_string());
        };

        if booking_rate < cfg.low_booking_rate {
            note(
                "Low confirmation rate detected",
                "Follow up on pending shows to improve booking rate",
            );
        }
        if avg_show_value < cfg.benchmark_value * cfg.low_value_ratio {
            note(
                "Below-average show values",
                "Focus on higher-value venues and negotiate better fees",
            );
        }
        if near_term.shows < cfg.near_term_min_shows {
            note(
                "Thin pipeline for next 30 days",
                "Urgently book more shows to maintain momentum",
            );
        }
        if conversion_rate < cfg.low_conversion && pipeline.offer > 0 {
            note(
                "Low offer conversion rate",
                "Review offer strategy and follow up more aggressively",
            );
        }
        if score >= cfg.excellent_score {
            note(
                "Tour is performing exceptionally well",
                "Maintain current momentum and explore expansion opportunities",
            );
        }

        tracing::debug!(
            score,
            grade = grade.as_str(),
            insights = insights.len(),
            "Health score computed"
        );

        HealthScore {
            score,
            grade,
            status: grade.status(),
            factors,
            insights,
            recommendations,
        }
    }
}
