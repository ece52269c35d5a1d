//! Volcano records, craters, and the alert severity taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// The source's page-area partitioning. `Global` is the aggregate view over
/// the seven geographic regions, not a distinct data partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Area {
    Global,
    Hokkaido,
    Tohoku,
    KantoChubu,
    IzuOgasawara,
    Chugoku,
    Kyushu,
    Okinawa,
}

impl Area {
    /// The seven geographic regions, in the source's numbering order.
    pub const REGIONS: [Self; 7] = [
        Self::Hokkaido,
        Self::Tohoku,
        Self::KantoChubu,
        Self::IzuOgasawara,
        Self::Chugoku,
        Self::Kyushu,
        Self::Okinawa,
    ];

    /// The numeric suffix the source uses in regional map page names
    /// (`map_1.html` .. `map_7.html`); `0` for the aggregate view.
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::Global => 0,
            Self::Hokkaido => 1,
            Self::Tohoku => 2,
            Self::KantoChubu => 3,
            Self::IzuOgasawara => 4,
            Self::Chugoku => 5,
            Self::Kyushu => 6,
            Self::Okinawa => 7,
        }
    }
}

/// Volcanic alert levels 1–5 as printed in "Level N" keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolcanicAlertLevel {
    PotentialActivity,
    DoNotApproachTheCrater,
    DoNotApproachTheVolcano,
    PrepareToEvacuate,
    Evacuate,
}

impl VolcanicAlertLevel {
    /// Maps the digit printed after "Level" to a level. `None` outside 1–5.
    #[must_use]
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::PotentialActivity),
            2 => Some(Self::DoNotApproachTheCrater),
            3 => Some(Self::DoNotApproachTheVolcano),
            4 => Some(Self::PrepareToEvacuate),
            5 => Some(Self::Evacuate),
            _ => None,
        }
    }
}

/// Warnings phrased without a numeric level, qualified by how close to
/// residential areas the hazard reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NonVolcanicAlertLevel {
    PotentialActivity,
    NearCraterWarning,
    NonResidentialWarning,
    ResidentialWarning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmarineWarningLevel {
    PotentialActivity,
    VolcanicWarning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolcanoKind {
    Volcano,
    SubmarineVolcano,
}

/// The severity taxonomy an alert keyword classifies into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertLevel {
    Volcanic(VolcanicAlertLevel),
    NonVolcanic(NonVolcanicAlertLevel),
    Submarine(SubmarineWarningLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertClassification {
    pub kind: VolcanoKind,
    pub alert: AlertLevel,
}

/// Free-text context fetched from a per-volcano info page (aggregate view
/// only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertContext {
    pub contents: String,
    pub link: String,
}

/// The alert exactly as the source printed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlert {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<AlertContext>,
}

/// One alert issuance. `issued_to` is the display name as printed, which may
/// be a superstring of the cached record's name. `issued_at` is absent on
/// regional pages (their layout omits timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolcanoAlert {
    pub issued_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<AlertClassification>,
    pub raw: RawAlert,
}

impl VolcanoAlert {
    /// Duplicate key for the append-only history: everything except
    /// `issued_at` must be structurally equal.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        self.issued_to == other.issued_to
            && self.classification == other.classification
            && self.raw == other.raw
    }
}

/// Append-only alert history. Entries are never rewritten, only appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertHistory {
    #[serde(rename = "data")]
    pub entries: Vec<VolcanoAlert>,
    pub last_update: DateTime<Utc>,
}

/// Elevation in both units. Feet are always derived from meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elevation {
    #[serde(rename = "meter")]
    pub meters: i32,
    pub feet: f64,
}

impl Elevation {
    #[must_use]
    pub fn from_meters(meters: i32) -> Self {
        Self {
            meters,
            feet: crate::geo::meters_to_feet(f64::from(meters)),
        }
    }
}

/// A crater or sub-volcano. A missing name means the crater shares the
/// parent volcano's name; a missing elevation means a submarine crater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<Elevation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolcanoMetadata {
    #[serde(rename = "img", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Canonical detail page URL; also the cross-region dedup key.
    pub page: String,
}

/// A tracked volcano. Identity is the `(region, id)` pair when the source
/// numbers the entry; `name` is the secondary identity used for alert
/// matching. Invariant: `craters` is non-empty for a successfully parsed
/// record — an empty list marks a parse failure that must be surfaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolcanoRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub area: Area,
    pub name: String,
    pub last_update: DateTime<Utc>,
    pub location: String,
    pub craters: Vec<CraterRecord>,
    pub metadata: VolcanoMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<AlertHistory>,
}

impl VolcanoRecord {
    /// Structural equality of everything the metadata page controls —
    /// excludes `last_update` (bookkeeping) and `alerts` (owned by the alert
    /// merge, not the metadata refresh).
    #[must_use]
    pub fn metadata_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.region == other.region
            && self.area == other.area
            && self.name == other.name
            && self.location == other.location
            && self.craters == other.craters
            && self.metadata == other.metadata
    }
}

#[cfg(test)]
#[path = "volcano_test.rs"]
mod tests;
