//! Revenue projection
//!
//! Probability-weighted expected revenue per show and the net amount that
//! remains after withholding, commissions and itemized costs.

use serde::{Deserialize, Serialize};

use crate::commission::commission;
use crate::models::{clamp_pct, AgencyConfig, Show, ShowStatus};

/// Expected-realization weight for each show status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageProbabilities {
    pub confirmed: f64,
    pub pending: f64,
    pub offer: f64,
    pub canceled: f64,
    pub archived: f64,
    /// Postponed shows carry no weight until they are re-scheduled
    pub postponed: f64,
}

impl Default for StageProbabilities {
    fn default() -> Self {
        Self {
            confirmed: 1.0,
            pending: 0.6,
            offer: 0.3,
            canceled: 0.0,
            archived: 0.0,
            postponed: 0.0,
        }
    }
}

impl StageProbabilities {
    pub fn weight(&self, status: ShowStatus) -> f64 {
        match status {
            ShowStatus::Confirmed => self.confirmed,
            ShowStatus::Pending => self.pending,
            ShowStatus::Offer => self.offer,
            ShowStatus::Canceled => self.canceled,
            ShowStatus::Archived => self.archived,
            ShowStatus::Postponed => self.postponed,
        }
    }

    /// Clamp every weight into [0, 1]
    pub fn sanitized(self) -> Self {
        let unit = |p: f64| if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        Self {
            confirmed: unit(self.confirmed),
            pending: unit(self.pending),
            offer: unit(self.offer),
            canceled: unit(self.canceled),
            archived: unit(self.archived),
            postponed: unit(self.postponed),
        }
    }

    pub fn expected_revenue(&self, show: &Show) -> f64 {
        show.fee * self.weight(show.status)
    }
}

/// Expected revenue using the default stage probabilities
pub fn expected_revenue(show: &Show) -> f64 {
    StageProbabilities::default().expected_revenue(show)
}

/// The full fee when the show is confirmed, otherwise nothing
pub fn confirmed_revenue(show: &Show) -> f64 {
    if show.status == ShowStatus::Confirmed {
        show.fee
    } else {
        0.0
    }
}

/// Components of a show's net amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetBreakdown {
    pub gross: f64,
    pub withholding: f64,
    pub commission: f64,
    pub costs: f64,
    /// May be negative when deductions exceed the fee
    pub net: f64,
}

/// Break a show's fee down into deductions and net
pub fn net_breakdown<'a>(
    show: &Show,
    agencies: impl IntoIterator<Item = &'a AgencyConfig>,
) -> NetBreakdown {
    let gross = show.fee;
    let withholding = gross * clamp_pct(show.withholding_pct) / 100.0;
    let commission = commission(show, agencies);
    let costs = show.costs_total();

    NetBreakdown {
        gross,
        withholding,
        commission,
        costs,
        net: gross - withholding - commission - costs,
    }
}

/// Fee minus withholding, commissions and costs
pub fn net_of<'a>(show: &Show, agencies: impl IntoIterator<Item = &'a AgencyConfig>) -> f64 {
    net_breakdown(show, agencies).net
}
