//! Tourcast Core Library
//!
//! Financial intelligence for a touring business:
//! - Territory resolution for agency commission scopes
//! - Commission attribution per show and per agency
//! - Probability-weighted revenue projection and net calculation
//! - Rolling time-window aggregation with a memoizing snapshot cache
//! - Health scoring, alerts and damped predictions
//! - TOML engine configuration with embedded defaults

pub mod aggregate;
pub mod cache;
pub mod commission;
pub mod config;
pub mod error;
pub mod insights;
pub mod intelligence;
pub mod models;
pub mod projection;
pub mod territory;

/// Show and roster builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    aggregate, growth_pct, Aggregator, Snapshot, TrailingWindow, WindowSnapshot, DEFAULT_WINDOWS,
};
pub use cache::{fingerprint, SnapshotCache};
pub use commission::{
    applicable_agencies, commission, commission_by_agency, ApplicableAgencies, CommissionLine,
    CommissionPolicy,
};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use insights::{
    predict, Alert, AlertGenerator, Grade, HealthScore, HealthScorer, Prediction, Predictor,
};
pub use intelligence::{Intelligence, IntelligenceEngine, IntelligenceReport, ShowNet};
pub use models::{
    AgencyConfig, AgencyPatch, AgencyRoster, AgencyType, Continent, Cost, Show, ShowStatus,
    Territory,
};
pub use projection::{
    confirmed_revenue, expected_revenue, net_breakdown, net_of, NetBreakdown, StageProbabilities,
};
pub use territory::{applies_to, continent_of};
