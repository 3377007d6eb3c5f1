//! Pipeline Insights
//!
//! Downstream consumers of an aggregated [`Snapshot`](crate::aggregate::Snapshot).
//! They are independent of each other and can run in any order or be skipped.
//!
//! ## Consumers
//!
//! - **Health Scorer** - Composite 0-100 score with paired insights and recommendations
//! - **Alert Generator** - Ordered, truncated list of actionable alerts
//! - **Prediction Engine** - Damped 90-day revenue and show-count projections
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tourcast_core::aggregate::{aggregate, DEFAULT_WINDOWS};
//! use tourcast_core::insights::{AlertGenerator, HealthScorer};
//!
//! let snapshot = aggregate(&shows, now, DEFAULT_WINDOWS);
//! let health = HealthScorer::default().score(&snapshot);
//! let alerts = AlertGenerator::default().generate(&shows, now);
//! ```

pub mod alerts;
pub mod health;
pub mod predict;
pub mod types;

pub use alerts::{format_amount, AlertConfig, AlertGenerator};
pub use health::{HealthConfig, HealthScorer};
pub use predict::{predict, PredictionConfig, PredictionInput, Predictor};
pub use types::{
    Alert, AlertAction, AlertKind, FactorScore, Grade, HealthFactors, HealthScore, HealthStatus,
    Impact, Prediction, PredictionMetric, Trend,
};
