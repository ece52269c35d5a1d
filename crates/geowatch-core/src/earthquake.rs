//! Earthquake record and cache shapes.
//!
//! The `occurred_at` / `issued_at` fields stay raw agency-local strings:
//! the bulletins print them without a timezone and the pipeline never needs
//! to do arithmetic on them, only display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One row of the per-region intensity table, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionIntensity {
    pub intensity: String,
    pub region_name: String,
}

/// One row of the per-city intensity table, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityIntensity {
    pub prefecture: String,
    pub intensity: String,
    pub city: String,
}

/// A fully populated seismic event.
///
/// Identity is the opaque source-assigned id embedded in the detail page
/// URL. `last_update` is the only field that moves once the record is
/// populated, and only when the detail page was actually re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    #[serde(rename = "uuid")]
    pub id: String,
    pub region_name: String,
    pub magnitude: f64,
    pub occurred_at: String,
    pub epicenter: GeoPoint,
    pub depth_km: u32,
    pub last_update: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_by_region: Option<Vec<RegionIntensity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_by_city: Option<Vec<CityIntensity>>,
    pub max_intensity: String,
    pub issued_at: String,
    pub url: String,
}

impl EarthquakeRecord {
    /// Structural equality excluding the `last_update` bookkeeping field.
    /// Used by the reconciliation engine to tell a real content change from
    /// a server-side touch.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.region_name == other.region_name
            && self.magnitude == other.magnitude
            && self.occurred_at == other.occurred_at
            && self.epicenter == other.epicenter
            && self.depth_km == other.depth_km
            && self.intensity_by_region == other.intensity_by_region
            && self.intensity_by_city == other.intensity_by_city
            && self.max_intensity == other.max_intensity
            && self.issued_at == other.issued_at
            && self.url == other.url
    }
}

/// Sort key for newest-first ordering: the trailing run of ASCII digits in
/// the source id, parsed as an integer. Ids look like
/// `20210213230801443-13235500`; the suffix after the dash is the newest
/// discriminator. Ids with no digits sort last (key 0).
#[must_use]
pub fn id_sort_key(id: &str) -> u64 {
    let digits: Vec<char> = id
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect();
    // Cap at 18 digits so the key always fits in a u64.
    let run: String = digits.into_iter().take(18).rev().collect();
    run.parse().unwrap_or(0)
}

/// The persisted earthquake dataset. `last_update` tracks the index page,
/// each record tracks its own detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeCache {
    pub last_update: DateTime<Utc>,
    pub data: Vec<EarthquakeRecord>,
}

#[cfg(test)]
#[path = "earthquake_test.rs"]
mod tests;
