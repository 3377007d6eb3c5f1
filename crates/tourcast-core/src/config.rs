//! Engine configuration
//!
//! Loads thresholds, stage weights and damping factors from TOML:
//! 1. The explicit override path, or `~/.local/share/tourcast/engine.toml`
//! 2. The embedded default (`config/engine.toml`)
//!
//! Every table is optional. Missing keys keep their default values, so an
//! override file only needs the settings it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::{normalize_windows, Aggregator, DEFAULT_TRAILING_DAYS, DEFAULT_WINDOWS};
use crate::cache::{SnapshotCache, DEFAULT_BUCKET_SECS};
use crate::commission::CommissionPolicy;
use crate::error::{Error, Result};
use crate::insights::{AlertConfig, HealthConfig, PredictionConfig};
use crate::models::DEFAULT_MAX_AGENCIES_PER_TYPE;
use crate::projection::StageProbabilities;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Forward windows to aggregate, in days
    pub windows_days: Vec<u32>,
    /// Length of the trailing comparison period
    pub trailing_days: u32,
    pub commission_policy: CommissionPolicy,
    pub max_agencies_per_type: usize,
    /// Time bucket of the snapshot cache key
    pub cache_bucket_secs: i64,
    pub stage_probabilities: StageProbabilities,
    pub health: HealthConfig,
    pub alerts: AlertConfig,
    pub prediction: PredictionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            windows_days: DEFAULT_WINDOWS.to_vec(),
            trailing_days: DEFAULT_TRAILING_DAYS,
            commission_policy: CommissionPolicy::default(),
            max_agencies_per_type: DEFAULT_MAX_AGENCIES_PER_TYPE,
            cache_bucket_secs: DEFAULT_BUCKET_SECS,
            stage_probabilities: StageProbabilities::default(),
            health: HealthConfig::default(),
            alerts: AlertConfig::default(),
            prediction: PredictionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration (override first, then default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => {
                // An explicitly requested file must exist
                tracing::debug!(path = %path.display(), "Loading engine config");
                fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "Loading engine config override");
                    fs::read_to_string(&path).map_err(|e| {
                        Error::Config(format!("Failed to read {}: {}", path.display(), e))
                    })?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// The embedded default configuration
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        Ok(config.sanitized())
    }

    /// Pull out-of-range values back into their valid ranges
    pub fn sanitized(mut self) -> Self {
        let unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };

        self.windows_days = normalize_windows(&self.windows_days);
        self.windows_days.retain(|&days| days > 0);
        if self.windows_days.is_empty() {
            tracing::warn!("No forward windows configured, using defaults");
            self.windows_days = DEFAULT_WINDOWS.to_vec();
        }
        if self.trailing_days == 0 {
            self.trailing_days = DEFAULT_TRAILING_DAYS;
        }
        self.cache_bucket_secs = self.cache_bucket_secs.max(1);

        self.stage_probabilities = self.stage_probabilities.sanitized();

        let prediction = &mut self.prediction;
        prediction.revenue_damping = unit(prediction.revenue_damping);
        prediction.show_damping = unit(prediction.show_damping);
        prediction.revenue_confidence = unit(prediction.revenue_confidence);
        prediction.revenue_confidence_no_baseline = unit(prediction.revenue_confidence_no_baseline);
        prediction.show_confidence = unit(prediction.show_confidence);
        prediction.show_confidence_no_baseline = unit(prediction.show_confidence_no_baseline);
        prediction.avg_value_confidence = unit(prediction.avg_value_confidence);

        self.health.low_booking_rate = unit(self.health.low_booking_rate);
        self.health.low_value_ratio = unit(self.health.low_value_ratio);
        self.health.low_conversion = unit(self.health.low_conversion);
        self.health.excellent_score = self.health.excellent_score.min(100);

        self
    }

    /// Every window the engine aggregates: configured ones plus those the
    /// health scorer and predictor read
    pub fn effective_windows(&self) -> Vec<u32> {
        let mut windows = self.windows_days.clone();
        windows.extend(self.health.required_windows());
        windows.push(self.prediction.horizon_days);
        normalize_windows(&windows)
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.stage_probabilities, self.trailing_days)
    }

    pub fn snapshot_cache(&self) -> SnapshotCache {
        SnapshotCache::with_bucket(self.aggregator(), self.cache_bucket_secs)
    }

    /// Render the effective configuration
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to render config: {}", e)))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tourcast").join("engine.toml"))
}
