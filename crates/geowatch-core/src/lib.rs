//! Shared data model for the geowatch bulletin pipeline.
//!
//! Holds the persisted record shapes for both domains (seismic events and
//! volcanic activity), the coordinate codec, and the alert severity taxonomy.
//! Everything here is pure data + pure functions; fetching and parsing live
//! in `geowatch-scraper`, cache mutation in `geowatch-sync`.

pub mod earthquake;
pub mod geo;
pub mod volcano;

pub use earthquake::{
    id_sort_key, CityIntensity, EarthquakeCache, EarthquakeRecord, RegionIntensity,
};
pub use geo::{
    decimal_to_sexagesimal, degree_minutes_to_decimal, meters_to_feet, sexagesimal_to_decimal,
    Axis, DecimalDegrees, GeoPoint, SexagesimalDegrees,
};
pub use volcano::{
    AlertClassification, AlertContext, AlertHistory, AlertLevel, Area, CraterRecord, Elevation,
    NonVolcanicAlertLevel, RawAlert, SubmarineWarningLevel, VolcanicAlertLevel, VolcanoAlert,
    VolcanoKind, VolcanoMetadata, VolcanoRecord,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The string had no recognizable degree/minute/second pattern.
    /// Callers are expected to retry with [`geo::degree_minutes_to_decimal`]
    /// before giving up on the field.
    #[error("unrecognized coordinate format: {0:?}")]
    CoordinateFormat(String),
}
