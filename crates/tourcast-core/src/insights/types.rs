//! Result types for the health scorer, alert generator and predictor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grade for a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a 0-100 score onto contiguous grade bands
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Status label shown next to the grade
    pub fn status(&self) -> HealthStatus {
        match self {
            Grade::A => HealthStatus::Excellent,
            Grade::B => HealthStatus::Good,
            Grade::C => HealthStatus::Fair,
            Grade::D => HealthStatus::Poor,
            Grade::F => HealthStatus::Critical,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Fair => "fair",
            HealthStatus::Poor => "poor",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Points earned by one health factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    pub points: f64,
    pub max_points: f64,
    /// Share of the maximum, rounded to 0-100
    pub percent: u8,
}

impl FactorScore {
    pub fn new(points: f64, max_points: f64) -> Self {
        let percent = if max_points > 0.0 {
            (points / max_points * 100.0).round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        Self {
            points,
            max_points,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFactors {
    pub booking_rate: FactorScore,
    pub revenue_health: FactorScore,
    pub conversion: FactorScore,
    pub timing: FactorScore,
}

impl HealthFactors {
    pub fn total_points(&self) -> f64 {
        self.booking_rate.points + self.revenue_health.points + self.conversion.points + self.timing.points
    }
}

/// Composite health of the show pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// 0-100
    pub score: u8,
    pub grade: Grade,
    pub status: HealthStatus,
    pub factors: HealthFactors,
    pub insights: Vec<String>,
    /// Paired with `insights` by position
    pub recommendations: Vec<String>,
}

/// Alert category, which doubles as its urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Critical,
    Warning,
    Opportunity,
    Info,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Critical => "critical",
            AlertKind::Warning => "warning",
            AlertKind::Opportunity => "opportunity",
            AlertKind::Info => "info",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(AlertKind::Critical),
            "warning" => Ok(AlertKind::Warning),
            "opportunity" => Ok(AlertKind::Opportunity),
            "info" => Ok(AlertKind::Info),
            _ => Err(format!("Unknown alert kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something the host can offer as a follow-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertAction {
    pub label: String,
    /// Opaque route understood by the host
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AlertAction>,
}

impl Alert {
    pub fn new(
        id: impl Into<String>,
        kind: AlertKind,
        impact: Impact,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            impact,
            action: None,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, target: impl Into<String>) -> Self {
        self.action = Some(AlertAction {
            label: label.into(),
            target: target.into(),
        });
        self
    }
}

/// What a prediction projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionMetric {
    #[serde(rename = "revenue_90d")]
    Revenue90d,
    #[serde(rename = "show_count_90d")]
    ShowCount90d,
    #[serde(rename = "avg_show_value_90d")]
    AvgShowValue90d,
}

impl PredictionMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMetric::Revenue90d => "revenue_90d",
            PredictionMetric::ShowCount90d => "show_count_90d",
            PredictionMetric::AvgShowValue90d => "avg_show_value_90d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PredictionMetric::Revenue90d => "90-Day Revenue",
            PredictionMetric::ShowCount90d => "Show Count",
            PredictionMetric::AvgShowValue90d => "Avg Show Value",
        }
    }
}

impl fmt::Display for PredictionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn between(current: f64, predicted: f64) -> Self {
        if predicted > current {
            Trend::Up
        } else if predicted < current {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub metric: PredictionMetric,
    pub current: f64,
    pub predicted: f64,
    /// Heuristic in [0, 1]
    pub confidence: f64,
    pub trend: Trend,
}
