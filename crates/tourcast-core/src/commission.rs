//! Agency commission attribution
//!
//! Commissions from booking and management agencies are additive: when both
//! roles apply to a show each one is paid on the gross fee.
//!
//! [`commission`] is the plain sum over whatever agencies it is given.
//! Attribution through [`agencies_for_show`] only charges shows whose status
//! earns commission, so offers, canceled and archived shows pay nobody.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{AgencyConfig, AgencyRoster, AgencyType, Show};
use crate::territory::applies_to;

/// Which agencies a show pays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionPolicy {
    /// Every roster agency whose territory covers the show's country
    #[default]
    Territory,
    /// Only the agencies the show references, if their territory covers it
    ReferencedOnly,
}

/// Agencies that earn commission on a particular show
#[derive(Debug, Clone, Default)]
pub struct ApplicableAgencies<'a> {
    pub booking: Vec<&'a AgencyConfig>,
    pub management: Vec<&'a AgencyConfig>,
}

impl<'a> ApplicableAgencies<'a> {
    /// Booking agencies first, then management
    pub fn all(&self) -> impl Iterator<Item = &'a AgencyConfig> + '_ {
        self.booking.iter().chain(self.management.iter()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.booking.is_empty() && self.management.is_empty()
    }
}

/// One agency's share of a show's fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionLine {
    pub agency_id: String,
    pub agency_name: String,
    pub agency_type: AgencyType,
    pub pct: f64,
    pub amount: f64,
}

/// Filter both rosters through the territory resolver
pub fn applicable_agencies<'a>(
    show: &Show,
    booking: &'a [AgencyConfig],
    management: &'a [AgencyConfig],
) -> ApplicableAgencies<'a> {
    ApplicableAgencies {
        booking: booking
            .iter()
            .filter(|a| applies_to(a, &show.country))
            .collect(),
        management: management
            .iter()
            .filter(|a| applies_to(a, &show.country))
            .collect(),
    }
}

/// Resolve the agencies a show pays under `policy`
pub fn agencies_for_show<'a>(
    show: &Show,
    roster: &'a AgencyRoster,
    policy: CommissionPolicy,
) -> ApplicableAgencies<'a> {
    if !show.status.earns_commission() {
        return ApplicableAgencies::default();
    }

    let applicable = applicable_agencies(show, &roster.booking, &roster.management);
    match policy {
        CommissionPolicy::Territory => applicable,
        CommissionPolicy::ReferencedOnly => ApplicableAgencies {
            booking: referenced(
                show,
                show.booking_agency_ref.as_deref(),
                &roster.booking,
                applicable.booking,
            ),
            management: referenced(
                show,
                show.management_agency_ref.as_deref(),
                &roster.management,
                applicable.management,
            ),
        },
    }
}

fn referenced<'a>(
    show: &Show,
    reference: Option<&str>,
    list: &'a [AgencyConfig],
    applicable: Vec<&'a AgencyConfig>,
) -> Vec<&'a AgencyConfig> {
    let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
        return vec![];
    };

    let known = list
        .iter()
        .any(|a| a.id == reference || a.name.trim().eq_ignore_ascii_case(reference));
    if !known {
        tracing::warn!(
            show_id = %show.id,
            reference,
            "Show references an unknown agency, no commission applied"
        );
        return vec![];
    }

    applicable
        .into_iter()
        .filter(|a| a.id == reference || a.name.trim().eq_ignore_ascii_case(reference))
        .collect()
}

/// Per-agency commission amounts for a show
pub fn commission_breakdown<'a>(
    show: &Show,
    agencies: impl IntoIterator<Item = &'a AgencyConfig>,
) -> Vec<CommissionLine> {
    agencies
        .into_iter()
        .map(|agency| CommissionLine {
            agency_id: agency.id.clone(),
            agency_name: agency.name.clone(),
            agency_type: agency.agency_type,
            pct: agency.commission_pct(),
            amount: line_amount(show.fee, agency.commission_pct()),
        })
        .collect()
}

fn line_amount(fee: f64, pct: f64) -> f64 {
    // f64::max drops NaN, so a garbage fee earns nothing
    (fee * pct / 100.0).max(0.0)
}

/// Total commission owed on a show across `agencies`
pub fn commission<'a>(
    show: &Show,
    agencies: impl IntoIterator<Item = &'a AgencyConfig>,
) -> f64 {
    agencies
        .into_iter()
        .map(|agency| line_amount(show.fee, agency.commission_pct()))
        .sum()
}

/// Commission totals per agency id across a show collection.
///
/// Every roster agency is present, with 0.0 when it earned nothing.
pub fn commission_by_agency(
    shows: &[Show],
    roster: &AgencyRoster,
    policy: CommissionPolicy,
) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = roster.iter().map(|a| (a.id.clone(), 0.0)).collect();

    for show in shows {
        let applicable = agencies_for_show(show, roster, policy);
        for line in commission_breakdown(show, applicable.all()) {
            *totals.entry(line.agency_id).or_insert(0.0) += line.amount;
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Continent, ShowStatus, Territory};

    fn roster() -> AgencyRoster {
        let mut roster = AgencyRoster::new();
        roster
            .add(
                AgencyConfig::booking("uta", "UTA", 10.0).with_territory(Territory::continents([
                    Continent::NorthAmerica,
                    Continent::SouthAmerica,
                ])),
            )
            .unwrap();
        roster
            .add(AgencyConfig::booking("shushi", "Shushi 3000", 15.0))
            .unwrap();
        roster
            .add(AgencyConfig::management("cp", "Creative Primates", 15.0))
            .unwrap();
        roster
    }

    fn show(country: &str) -> Show {
        Show::new("s1", "2026-05-01", 10_000.0, ShowStatus::Confirmed).with_country(country)
    }

    #[test]
    fn test_applicable_agencies_by_territory() {
        let roster = roster();

        let us = applicable_agencies(&show("US"), &roster.booking, &roster.management);
        assert_eq!(us.booking.len(), 2);
        assert_eq!(us.management.len(), 1);

        let de = applicable_agencies(&show("DE"), &roster.booking, &roster.management);
        let ids: Vec<&str> = de.booking.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["shushi"]);

        // Unmapped country only keeps worldwide agencies
        let zz = applicable_agencies(&show("ZZ"), &roster.booking, &roster.management);
        assert_eq!(zz.all().count(), 2);
    }

    #[test]
    fn test_commission_is_additive_across_roles() {
        let roster = roster();
        let s = show("US");
        let applicable = applicable_agencies(&s, &roster.booking, &roster.management);

        // 10% + 15% + 15% of 10000
        assert!((commission(&s, applicable.all()) - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn test_commission_matches_literal_sum() {
        let roster = roster();
        let s = show("JP");
        let expected: f64 = roster
            .iter()
            .filter(|a| applies_to(a, &s.country))
            .map(|a| s.fee * a.commission_pct() / 100.0)
            .sum();
        let applicable = applicable_agencies(&s, &roster.booking, &roster.management);
        assert!((commission(&s, applicable.all()) - expected).abs() < 1e-9);
        assert!(commission(&s, applicable.all()) >= 0.0);
    }

    #[test]
    fn test_commission_empty_and_degenerate() {
        let s = show("US");
        assert_eq!(commission(&s, std::iter::empty::<&AgencyConfig>()), 0.0);

        let agency = AgencyConfig::booking("a", "A", 20.0);
        let mut negative = s.clone();
        negative.fee = -100.0;
        assert_eq!(commission(&negative, [&agency]), 0.0);

        let mut nan = s;
        nan.fee = f64::NAN;
        assert_eq!(commission(&nan, [&agency]), 0.0);
    }

    #[test]
    fn test_breakdown_lines() {
        let roster = roster();
        let s = show("FR");
        let applicable = applicable_agencies(&s, &roster.booking, &roster.management);
        let lines = commission_breakdown(&s, applicable.all());

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].agency_id, "shushi");
        assert_eq!(lines[0].agency_type, AgencyType::Booking);
        assert_eq!(lines[1].agency_id, "cp");
        assert!((lines[1].amount - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_referenced_only_policy() {
        let roster = roster();
        let s = show("US")
            .with_booking_agency("UTA")
            .with_management_agency("cp");
        let applicable = agencies_for_show(&s, &roster, CommissionPolicy::ReferencedOnly);
        let ids: Vec<&str> = applicable.all().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["uta", "cp"]);

        // Referenced but out of territory
        let de = show("DE").with_booking_agency("uta");
        let applicable = agencies_for_show(&de, &roster, CommissionPolicy::ReferencedOnly);
        assert!(applicable.is_empty());

        // No references at all
        let bare = show("US");
        assert!(agencies_for_show(&bare, &roster, CommissionPolicy::ReferencedOnly).is_empty());

        // Dangling reference is skipped
        let dangling = show("US").with_booking_agency("Nobody");
        assert!(agencies_for_show(&dangling, &roster, CommissionPolicy::ReferencedOnly).is_empty());
    }

    #[test]
    fn test_inactive_statuses_pay_no_commission() {
        let mut roster = AgencyRoster::new();
        roster.add(AgencyConfig::booking("b", "Booker", 10.0)).unwrap();
        let shows: Vec<Show> = [ShowStatus::Canceled, ShowStatus::Offer, ShowStatus::Archived]
            .into_iter()
            .enumerate()
            .map(|(i, status)| {
                Show::new(format!("s{}", i), "2026-05-01", 10_000.0, status).with_country("US")
            })
            .collect();

        for show in &shows {
            assert!(agencies_for_show(show, &roster, CommissionPolicy::Territory).is_empty());
        }
        let totals = commission_by_agency(&shows, &roster, CommissionPolicy::Territory);
        assert_eq!(totals["b"], 0.0);

        // Postponed shows still owe their agencies
        let postponed = Show::new("p", "2026-05-01", 10_000.0, ShowStatus::Postponed);
        let totals = commission_by_agency(&[postponed], &roster, CommissionPolicy::Territory);
        assert!((totals["b"] - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_commission_by_agency_totals() {
        let roster = roster();
        let shows = vec![
            show("US"),
            Show::new("s2", "2026-06-01", 5_000.0, ShowStatus::Pending).with_country("DE"),
        ];
        let totals = commission_by_agency(&shows, &roster, CommissionPolicy::Territory);

        assert_eq!(totals.len(), 3);
        assert!((totals["uta"] - 1000.0).abs() < 1e-9);
        assert!((totals["shushi"] - (1500.0 + 750.0)).abs() < 1e-9);
        assert!((totals["cp"] - (1500.0 + 750.0)).abs() < 1e-9);

        let empty = commission_by_agency(&[], &roster, CommissionPolicy::Territory);
        assert!(empty.values().all(|v| *v == 0.0));
    }
}
