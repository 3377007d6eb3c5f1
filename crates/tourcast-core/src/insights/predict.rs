//! Prediction Engine
//!
//! Damped linear extrapolation of the 90-day outlook from the change between
//! the trailing and upcoming 30-day periods. Confidence reflects only whether
//! a trailing baseline exists.

use serde::{Deserialize, Serialize};

use crate::aggregate::{growth_pct, Snapshot};

use super::types::{Prediction, PredictionMetric, Trend};

/// Damping factors and confidence levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Window being projected
    pub horizon_days: u32,
    pub revenue_damping: f64,
    pub show_damping: f64,
    pub revenue_confidence: f64,
    pub revenue_confidence_no_baseline: f64,
    pub show_confidence: f64,
    pub show_confidence_no_baseline: f64,
    pub avg_value_confidence: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            horizon_days: 90,
            revenue_damping: 0.5,
            show_damping: 0.3,
            revenue_confidence: 0.75,
            revenue_confidence_no_baseline: 0.4,
            show_confidence: 0.70,
            show_confidence_no_baseline: 0.35,
            avg_value_confidence: 0.65,
        }
    }
}

/// Figures the predictor extrapolates from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    pub current90d_revenue: f64,
    pub current90d_shows: usize,
    pub trailing30d_revenue: f64,
    pub current30d_revenue: f64,
    pub trailing30d_show_count: usize,
    pub current30d_show_count: usize,
}

impl PredictionInput {
    /// Read the comparison periods from a snapshot.
    ///
    /// The current period is the forward window matching the trailing
    /// baseline; the horizon window supplies the 90-day figures.
    pub fn from_snapshot(snapshot: &Snapshot, horizon_days: u32) -> Self {
        let horizon = snapshot.window_or_empty(horizon_days);
        Self {
            current90d_revenue: horizon.expected_revenue,
            current90d_shows: horizon.shows,
            trailing30d_revenue: snapshot.trailing.revenue,
            current30d_revenue: snapshot.forward.expected_revenue,
            trailing30d_show_count: snapshot.trailing.shows,
            current30d_show_count: snapshot.forward.shows,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Predictor {
    config: PredictionConfig,
}

impl Predictor {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    pub fn horizon_days(&self) -> u32 {
        self.config.horizon_days
    }

    pub fn predict(&self, input: &PredictionInput) -> Vec<Prediction> {
        let cfg = &self.config;

        let revenue_growth = growth_pct(input.current30d_revenue, input.trailing30d_revenue);
        let predicted_revenue =
            input.current90d_revenue * (1.0 + revenue_growth / 100.0 * cfg.revenue_damping);

        let show_growth = growth_pct(
            input.current30d_show_count as f64,
            input.trailing30d_show_count as f64,
        );
        let current_shows = input.current90d_shows as f64;
        let predicted_shows =
            (current_shows * (1.0 + show_growth / 100.0 * cfg.show_damping)).round().max(0.0);

        let current_avg = if input.current90d_shows > 0 {
            input.current90d_revenue / current_shows
        } else {
            0.0
        };
        let predicted_avg = if predicted_shows > 0.0 {
            predicted_revenue / predicted_shows
        } else {
            0.0
        };

        let revenue_confidence = if input.trailing30d_revenue != 0.0 {
            cfg.revenue_confidence
        } else {
            cfg.revenue_confidence_no_baseline
        };
        let show_confidence = if input.trailing30d_show_count > 0 {
            cfg.show_confidence
        } else {
            cfg.show_confidence_no_baseline
        };

        tracing::debug!(
            revenue_growth,
            show_growth,
            predicted_revenue,
            predicted_shows,
            "Predictions computed"
        );

        vec![
            Prediction {
                metric: PredictionMetric::Revenue90d,
                current: input.current90d_revenue,
                predicted: predicted_revenue,
                confidence: revenue_confidence,
                trend: Trend::between(input.current90d_revenue, predicted_revenue),
            },
            Prediction {
                metric: PredictionMetric::ShowCount90d,
                current: current_shows,
                predicted: predicted_shows,
                confidence: show_confidence,
                trend: Trend::between(current_shows, predicted_shows),
            },
            Prediction {
                metric: PredictionMetric::AvgShowValue90d,
                current: current_avg,
                predicted: predicted_avg,
                confidence: cfg.avg_value_confidence,
                trend: Trend::Stable,
            },
        ]
    }
}

/// Predict with the default damping factors.
///
/// The 90-day show count is not among the arguments, so it is estimated as
/// three times the upcoming 30-day count. Use [`Predictor::predict`] with a
/// full [`PredictionInput`] when the real count is known.
pub fn predict(
    current90d_revenue: f64,
    trailing30d_revenue: f64,
    current30d_revenue: f64,
    trailing30d_show_count: usize,
    current30d_show_count: usize,
) -> Vec<Prediction> {
    Predictor::default().predict(&PredictionInput {
        current90d_revenue,
        current90d_shows: current30d_show_count.saturating_mul(3),
        trailing30d_revenue,
        current30d_revenue,
        trailing30d_show_count,
        current30d_show_count,
    })
}
