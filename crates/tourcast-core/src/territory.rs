//! Territory resolution
//!
//! Decides whether an agency's geographic scope covers a show's country.
//! Countries missing from the continent table never match a
//! continent-scoped agency.

use crate::models::{AgencyConfig, Continent, Territory};

/// Fixed country to continent table
const CONTINENT_TABLE: &[(Continent, &[&str])] = &[
    (Continent::NorthAmerica, &["US", "CA", "MX"]),
    (
        Continent::SouthAmerica,
        &[
            "BR", "AR", "CL", "CO", "PE", "VE", "EC", "BO", "PY", "UY", "GY", "SR", "GF",
        ],
    ),
    (
        Continent::Europe,
        &[
            "GB", "DE", "FR", "ES", "IT", "NL", "BE", "CH", "AT", "SE", "NO", "DK", "FI", "PL",
            "PT", "CZ", "GR", "IE", "HU", "RO",
        ],
    ),
    (
        Continent::Asia,
        &[
            "CN", "JP", "KR", "IN", "TH", "SG", "MY", "ID", "PH", "VN", "TW", "HK",
        ],
    ),
    (
        Continent::Africa,
        &["ZA", "EG", "NG", "KE", "MA", "GH", "TN", "UG", "ET", "DZ"],
    ),
    (Continent::Oceania, &["AU", "NZ", "FJ", "PG"]),
];

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Look up the continent for an ISO-2 country code
pub fn continent_of(country_code: &str) -> Option<Continent> {
    let code = normalize_code(country_code);
    CONTINENT_TABLE
        .iter()
        .find(|(_, countries)| countries.contains(&code.as_str()))
        .map(|(continent, _)| *continent)
}

/// Whether `agency` earns commission on a show in `country_code`
pub fn applies_to(agency: &AgencyConfig, country_code: &str) -> bool {
    match &agency.territory {
        Territory::Worldwide => true,
        Territory::Countries { countries } => {
            let code = normalize_code(country_code);
            !code.is_empty() && countries.iter().any(|c| normalize_code(c) == code)
        }
        Territory::Continents { continents } => match continent_of(country_code) {
            Some(continent) => continents.contains(&continent),
            None => false,
        },
    }
}
