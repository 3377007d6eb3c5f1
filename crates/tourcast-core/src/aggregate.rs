//! Time-window aggregation
//!
//! Buckets shows into forward windows `[now, now + N days]` (both ends
//! inclusive) and a trailing baseline `[now - N days, now)`. The resulting
//! [`Snapshot`] is the single input of the health scorer and the predictor.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Show, ShowStatus};
use crate::projection::{confirmed_revenue, StageProbabilities};

/// Window lengths used when the caller asks for nothing specific
pub const DEFAULT_WINDOWS: &[u32] = &[7, 30, 90, 180];

/// Default trailing baseline length
pub const DEFAULT_TRAILING_DAYS: u32 = 30;

/// Percentage change from `previous` to `current`.
///
/// A zero baseline yields 0 when nothing changed and 100 otherwise, so the
/// result is always finite.
pub fn growth_pct(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// `now` moved `days` forward, saturating at the end of representable time
pub fn days_after(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `now` moved `days` back, saturating at the start of representable time
pub fn days_before(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Sort and deduplicate requested window lengths
pub fn normalize_windows(windows_days: &[u32]) -> Vec<u32> {
    let mut windows = windows_days.to_vec();
    windows.sort_unstable();
    windows.dedup();
    windows
}

/// Aggregates for one forward window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub days: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub shows: usize,
    pub expected_revenue: f64,
    pub confirmed_revenue: f64,
    pub confirmed: usize,
    pub pending: usize,
    pub offer: usize,
}

impl WindowSnapshot {
    fn empty(days: u32, now: DateTime<Utc>) -> Self {
        Self {
            days,
            start: now,
            end: days_after(now, days),
            shows: 0,
            expected_revenue: 0.0,
            confirmed_revenue: 0.0,
            confirmed: 0,
            pending: 0,
            offer: 0,
        }
    }

    /// Expected revenue per show, 0 for an empty window
    pub fn avg_show_value(&self) -> f64 {
        if self.shows == 0 {
            0.0
        } else {
            self.expected_revenue / self.shows as f64
        }
    }
}

/// The trailing comparison baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailingWindow {
    pub days: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Every non-archived show in the range
    pub shows: usize,
    /// Fees of confirmed shows only
    pub revenue: f64,
}

/// Aggregated view of a show collection at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub now: DateTime<Utc>,
    pub windows: Vec<WindowSnapshot>,
    /// Forward window with the same length as the trailing baseline
    pub forward: WindowSnapshot,
    pub trailing: TrailingWindow,
    /// Forward expected revenue vs trailing confirmed revenue
    pub growth_pct: f64,
    pub total_shows: usize,
    pub archived_shows: usize,
    /// Ids of shows whose date could not be parsed
    pub excluded: Vec<String>,
}

impl Snapshot {
    pub fn window(&self, days: u32) -> Option<&WindowSnapshot> {
        self.windows.iter().find(|w| w.days == days)
    }

    /// The requested window, or a zero-valued one when it was not requested
    pub fn window_or_empty(&self, days: u32) -> WindowSnapshot {
        self.window(days)
            .cloned()
            .unwrap_or_else(|| WindowSnapshot::empty(days, self.now))
    }
}

/// Aggregator parameterized by stage weights and baseline length
#[derive(Debug, Clone)]
pub struct Aggregator {
    probabilities: StageProbabilities,
    trailing_days: u32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(StageProbabilities::default(), DEFAULT_TRAILING_DAYS)
    }
}

impl Aggregator {
    pub fn new(probabilities: StageProbabilities, trailing_days: u32) -> Self {
        Self {
            probabilities,
            trailing_days,
        }
    }

    pub fn aggregate(&self, shows: &[Show], now: DateTime<Utc>, windows_days: &[u32]) -> Snapshot {
        let mut excluded = vec![];
        let mut archived_shows = 0;
        let mut dated: Vec<(&Show, DateTime<Utc>)> = Vec::with_capacity(shows.len());

        for show in shows {
            if show.status == ShowStatus::Archived {
                archived_shows += 1;
            }
            match show.instant() {
                Some(at) => dated.push((show, at)),
                None => {
                    tracing::warn!(
                        show_id = %show.id,
                        date = %show.date,
                        "Unparsable show date, excluded from every window"
                    );
                    excluded.push(show.id.clone());
                }
            }
        }

        // Archived shows only count toward the historical total
        let active: Vec<(&Show, DateTime<Utc>)> = dated
            .into_iter()
            .filter(|(show, _)| show.status != ShowStatus::Archived)
            .collect();

        let windows: Vec<WindowSnapshot> = normalize_windows(windows_days)
            .into_iter()
            .map(|days| self.forward_window(&active, now, days))
            .collect();

        let forward = self.forward_window(&active, now, self.trailing_days);
        let trailing = self.trailing_window(&active, now);
        let growth_pct = growth_pct(forward.expected_revenue, trailing.revenue);

        tracing::debug!(
            shows = shows.len(),
            excluded = excluded.len(),
            windows = windows.len(),
            growth_pct,
            "Aggregated show windows"
        );

        Snapshot {
            now,
            windows,
            forward,
            trailing,
            growth_pct,
            total_shows: shows.len(),
            archived_shows,
            excluded,
        }
    }

    fn forward_window(
        &self,
        shows: &[(&Show, DateTime<Utc>)],
        now: DateTime<Utc>,
        days: u32,
    ) -> WindowSnapshot {
        let mut window = WindowSnapshot::empty(days, now);

        for (show, at) in shows {
            if *at < window.start || *at > window.end {
                continue;
            }
            window.shows += 1;
            window.expected_revenue += self.probabilities.expected_revenue(show);
            window.confirmed_revenue += confirmed_revenue(show);
            match show.status {
                ShowStatus::Confirmed => window.confirmed += 1,
                ShowStatus::Pending => window.pending += 1,
                ShowStatus::Offer => window.offer += 1,
                _ => {}
            }
        }

        window
    }

    fn trailing_window(&self, shows: &[(&Show, DateTime<Utc>)], now: DateTime<Utc>) -> TrailingWindow {
        let start = days_before(now, self.trailing_days);
        let mut trailing = TrailingWindow {
            days: self.trailing_days,
            start,
            end: now,
            shows: 0,
            revenue: 0.0,
        };

        for (show, at) in shows {
            if *at >= start && *at < now {
                trailing.shows += 1;
                trailing.revenue += confirmed_revenue(show);
            }
        }

        trailing
    }
}

/// Aggregate with default stage weights and a 30-day baseline
pub fn aggregate(shows: &[Show], now: DateTime<Utc>, windows_days: &[u32]) -> Snapshot {
    Aggregator::default().aggregate(shows, now, windows_days)
}
