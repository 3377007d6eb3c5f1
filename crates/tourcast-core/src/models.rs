//! Data models for Tourcast
//!
//! Shows and agencies arrive from the booking and settings collaborators in
//! their wire shape (camelCase JSON). The models keep that shape so records
//! can be passed through without a translation layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Lifecycle status of a show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowStatus {
    Confirmed,
    Pending,
    Offer,
    Canceled,
    Archived,
    Postponed,
}

impl ShowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowStatus::Confirmed => "confirmed",
            ShowStatus::Pending => "pending",
            ShowStatus::Offer => "offer",
            ShowStatus::Canceled => "canceled",
            ShowStatus::Archived => "archived",
            ShowStatus::Postponed => "postponed",
        }
    }

    pub fn all() -> &'static [ShowStatus] {
        &[
            ShowStatus::Confirmed,
            ShowStatus::Pending,
            ShowStatus::Offer,
            ShowStatus::Canceled,
            ShowStatus::Archived,
            ShowStatus::Postponed,
        ]
    }

    /// Whether agencies are owed commission on a show in this status.
    /// Offers are not yet deals; canceled and archived shows are off the books.
    pub fn earns_commission(&self) -> bool {
        matches!(
            self,
            ShowStatus::Confirmed | ShowStatus::Pending | ShowStatus::Postponed
        )
    }
}

impl fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShowStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(ShowStatus::Confirmed),
            "pending" => Ok(ShowStatus::Pending),
            "offer" => Ok(ShowStatus::Offer),
            "canceled" | "cancelled" => Ok(ShowStatus::Canceled),
            "archived" => Ok(ShowStatus::Archived),
            "postponed" => Ok(ShowStatus::Postponed),
            _ => Err(format!("Unknown show status: {}", s)),
        }
    }
}

/// An itemized cost deducted from a show's fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Cost {
    pub fn new(amount: f64, kind: impl Into<String>) -> Self {
        Self {
            amount,
            kind: kind.into(),
        }
    }
}

/// A booked or offered event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    /// Raw date as supplied by the booking workflow; see [`Show::instant`]
    pub date: String,
    #[serde(default)]
    pub fee: f64,
    pub status: ShowStatus,
    /// ISO-2 country code
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub withholding_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_agency_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_agency_ref: Option<String>,
    #[serde(default)]
    pub costs: Vec<Cost>,
}

impl Show {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        fee: f64,
        status: ShowStatus,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            fee,
            status,
            country: String::new(),
            withholding_pct: 0.0,
            booking_agency_ref: None,
            management_agency_ref: None,
            costs: vec![],
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_withholding(mut self, pct: f64) -> Self {
        self.withholding_pct = pct;
        self
    }

    pub fn with_booking_agency(mut self, reference: impl Into<String>) -> Self {
        self.booking_agency_ref = Some(reference.into());
        self
    }

    pub fn with_management_agency(mut self, reference: impl Into<String>) -> Self {
        self.management_agency_ref = Some(reference.into());
        self
    }

    pub fn with_cost(mut self, amount: f64, kind: impl Into<String>) -> Self {
        self.costs.push(Cost::new(amount, kind));
        self
    }

    /// Parse the show date into an instant.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) and `YYYY-MM-DD`
    /// (midnight UTC). Returns `None` for anything else.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.date)
    }

    /// Sum of itemized costs
    pub fn costs_total(&self) -> f64 {
        self.costs.iter().map(|c| c.amount).sum()
    }
}

/// Parse a collaborator-supplied date string
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Role an agency plays for the artist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyType {
    Booking,
    Management,
}

impl AgencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyType::Booking => "booking",
            AgencyType::Management => "management",
        }
    }
}

impl fmt::Display for AgencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgencyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "booking" => Ok(AgencyType::Booking),
            "management" => Ok(AgencyType::Management),
            _ => Err(format!("Unknown agency type: {}", s)),
        }
    }
}

/// Continent codes used for territory scoping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "NA")]
    NorthAmerica,
    #[serde(rename = "SA")]
    SouthAmerica,
    #[serde(rename = "EU")]
    Europe,
    #[serde(rename = "AS")]
    Asia,
    #[serde(rename = "AF")]
    Africa,
    #[serde(rename = "OC")]
    Oceania,
}

impl Continent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::NorthAmerica => "NA",
            Continent::SouthAmerica => "SA",
            Continent::Europe => "EU",
            Continent::Asia => "AS",
            Continent::Africa => "AF",
            Continent::Oceania => "OC",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NA" => Ok(Continent::NorthAmerica),
            "SA" => Ok(Continent::SouthAmerica),
            "EU" => Ok(Continent::Europe),
            "AS" => Ok(Continent::Asia),
            "AF" => Ok(Continent::Africa),
            "OC" => Ok(Continent::Oceania),
            _ => Err(format!("Unknown continent: {}", s)),
        }
    }
}

/// Geographic scope of an agency.
///
/// On the wire this is the `territoryMode` tag plus either a `continents` or
/// a `countries` list, so the list is present exactly when the mode needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "territoryMode", rename_all = "snake_case")]
pub enum Territory {
    Worldwide,
    Continents {
        #[serde(default)]
        continents: BTreeSet<Continent>,
    },
    Countries {
        #[serde(default)]
        countries: BTreeSet<String>,
    },
}

impl Territory {
    pub fn continents(continents: impl IntoIterator<Item = Continent>) -> Self {
        Territory::Continents {
            continents: continents.into_iter().collect(),
        }
    }

    /// Country codes are stored trimmed and uppercased
    pub fn countries<S: AsRef<str>>(countries: impl IntoIterator<Item = S>) -> Self {
        Territory::Countries {
            countries: countries
                .into_iter()
                .map(|c| c.as_ref().trim().to_ascii_uppercase())
                .collect(),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Territory::Worldwide => "worldwide",
            Territory::Continents { .. } => "continents",
            Territory::Countries { .. } => "countries",
        }
    }
}

/// A commission-bearing booking or management agency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyConfig {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub agency_type: AgencyType,
    #[serde(deserialize_with = "deserialize_commission_pct")]
    commission_pct: f64,
    #[serde(flatten)]
    pub territory: Territory,
}

impl AgencyConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        agency_type: AgencyType,
        commission_pct: f64,
        territory: Territory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            agency_type,
            commission_pct: clamp_pct(commission_pct),
            territory,
        }
    }

    pub fn booking(id: impl Into<String>, name: impl Into<String>, commission_pct: f64) -> Self {
        Self::new(id, name, AgencyType::Booking, commission_pct, Territory::Worldwide)
    }

    pub fn management(
        id: impl Into<String>,
        name: impl Into<String>,
        commission_pct: f64,
    ) -> Self {
        Self::new(id, name, AgencyType::Management, commission_pct, Territory::Worldwide)
    }

    pub fn with_territory(mut self, territory: Territory) -> Self {
        self.territory = territory;
        self
    }

    /// Commission percentage, always within [0, 100]
    pub fn commission_pct(&self) -> f64 {
        self.commission_pct
    }

    pub fn set_commission_pct(&mut self, pct: f64) {
        self.commission_pct = clamp_pct(pct);
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: AgencyPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(pct) = patch.commission_pct {
            self.set_commission_pct(pct);
        }
        if let Some(territory) = patch.territory {
            self.territory = territory;
        }
    }
}

/// Clamp a percentage into [0, 100]; NaN becomes 0
pub fn clamp_pct(pct: f64) -> f64 {
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, 100.0)
    }
}

fn deserialize_commission_pct<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_pct(raw))
}

/// Partial update for an agency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyPatch {
    pub name: Option<String>,
    pub commission_pct: Option<f64>,
    pub territory: Option<Territory>,
}

/// Default per-type agency limit
pub const DEFAULT_MAX_AGENCIES_PER_TYPE: usize = 3;

fn default_max_per_type() -> usize {
    DEFAULT_MAX_AGENCIES_PER_TYPE
}

/// The user-managed set of booking and management agencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyRoster {
    #[serde(default)]
    pub booking: Vec<AgencyConfig>,
    #[serde(default)]
    pub management: Vec<AgencyConfig>,
    #[serde(default = "default_max_per_type", skip_serializing)]
    max_per_type: usize,
}

impl Default for AgencyRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl AgencyRoster {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_AGENCIES_PER_TYPE)
    }

    pub fn with_limit(max_per_type: usize) -> Self {
        Self {
            booking: vec![],
            management: vec![],
            max_per_type,
        }
    }

    pub fn set_limit(&mut self, max_per_type: usize) {
        self.max_per_type = max_per_type;
    }

    pub fn is_empty(&self) -> bool {
        self.booking.is_empty() && self.management.is_empty()
    }

    /// All agencies, booking first
    pub fn iter(&self) -> impl Iterator<Item = &AgencyConfig> {
        self.booking.iter().chain(self.management.iter())
    }

    fn list(&self, agency_type: AgencyType) -> &Vec<AgencyConfig> {
        match agency_type {
            AgencyType::Booking => &self.booking,
            AgencyType::Management => &self.management,
        }
    }

    fn list_mut(&mut self, agency_type: AgencyType) -> &mut Vec<AgencyConfig> {
        match agency_type {
            AgencyType::Booking => &mut self.booking,
            AgencyType::Management => &mut self.management,
        }
    }

    /// Add an agency to the list for its type.
    ///
    /// An empty id is replaced by `"{type}-{n}"`. Fails when the per-type
    /// limit is reached or the id is already taken.
    pub fn add(&mut self, mut agency: AgencyConfig) -> Result<AgencyConfig> {
        let agency_type = agency.agency_type;
        if self.list(agency_type).len() >= self.max_per_type {
            tracing::debug!(kind = agency_type.as_str(), "Agency limit reached");
            return Err(Error::RosterLimit {
                kind: agency_type.to_string(),
                max: self.max_per_type,
            });
        }

        if agency.id.trim().is_empty() {
            agency.id = self.next_id(agency_type);
        } else if self.iter().any(|a| a.id == agency.id) {
            return Err(Error::InvalidData(format!(
                "Duplicate agency id: {}",
                agency.id
            )));
        }

        // Re-clamp in case the value was built by hand
        agency.set_commission_pct(agency.commission_pct);
        self.list_mut(agency_type).push(agency.clone());
        Ok(agency)
    }

    fn next_id(&self, agency_type: AgencyType) -> String {
        let mut n = self.list(agency_type).len() + 1;
        loop {
            let candidate = format!("{}-{}", agency_type.as_str(), n);
            if !self.iter().any(|a| a.id == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Apply a patch to the agency with the given id
    pub fn update(&mut self, id: &str, patch: AgencyPatch) -> Result<()> {
        let agency = self
            .booking
            .iter_mut()
            .chain(self.management.iter_mut())
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("agency {}", id)))?;
        agency.apply(patch);
        Ok(())
    }

    /// Remove an agency by id; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.booking.len() + self.management.len();
        self.booking.retain(|a| a.id != id);
        self.management.retain(|a| a.id != id);
        before != self.booking.len() + self.management.len()
    }

    /// Resolve a show's agency reference by id, then by name (case-insensitive)
    pub fn find(&self, reference: &str) -> Option<&AgencyConfig> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        self.iter().find(|a| a.id == reference).or_else(|| {
            self.iter()
                .find(|a| a.name.trim().eq_ignore_ascii_case(reference))
        })
    }
}
