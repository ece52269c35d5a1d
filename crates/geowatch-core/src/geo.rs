//! Geographic coordinate codec.
//!
//! The source bulletins print coordinates two ways: decimal degrees with a
//! trailing hemisphere letter (`37.2N`) on earthquake pages, and sexagesimal
//! degree/minute/second strings (`42°03'40.0"N`) on volcano pages. A
//! [`GeoPoint`] always carries both representations in sync — whichever side
//! was the parse source, the other is derived from it.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Which geographic axis a coordinate string describes. Picks the hemisphere
/// letter pair (`N`/`S` vs `E`/`W`) when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn hemisphere(self, negative: bool) -> char {
        match (self, negative) {
            (Self::Latitude, false) => 'N',
            (Self::Latitude, true) => 'S',
            (Self::Longitude, false) => 'E',
            (Self::Longitude, true) => 'W',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecimalDegrees {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexagesimalDegrees {
    pub latitude: String,
    pub longitude: String,
}

/// A point in both decimal and sexagesimal notation.
///
/// Invariant: the sign of `decimal.latitude` agrees with the `N`/`S` letter
/// in `sexagesimal.latitude` (same for longitude and `E`/`W`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub decimal: DecimalDegrees,
    pub sexagesimal: SexagesimalDegrees,
}

impl GeoPoint {
    /// Builds a point from decimal degrees, deriving the sexagesimal form.
    #[must_use]
    pub fn from_decimal(latitude: f64, longitude: f64) -> Self {
        Self {
            decimal: DecimalDegrees {
                latitude,
                longitude,
            },
            sexagesimal: SexagesimalDegrees {
                latitude: decimal_to_sexagesimal(latitude, Axis::Latitude),
                longitude: decimal_to_sexagesimal(longitude, Axis::Longitude),
            },
        }
    }
}

/// Renders decimal degrees as `D°MM'SS.S"H` with the hemisphere letter chosen
/// by sign and axis.
///
/// Inverse of [`sexagesimal_to_decimal`] within 1e-4 degrees (seconds are
/// rounded to one decimal place, with carry into minutes/degrees).
#[must_use]
pub fn decimal_to_sexagesimal(value: f64, axis: Axis) -> String {
    let hemisphere = axis.hemisphere(value < 0.0);
    let abs = value.abs();

    let mut degrees = abs.trunc() as u32;
    let minutes_full = (abs - f64::from(degrees)) * 60.0;
    let mut minutes = minutes_full.trunc() as u32;
    let mut seconds = (minutes_full - f64::from(minutes)) * 60.0;

    // Round to the printed precision first so 59.97" carries instead of
    // rendering as 60.0".
    seconds = (seconds * 10.0).round() / 10.0;
    if seconds >= 60.0 {
        seconds = 0.0;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes = 0;
        degrees += 1;
    }

    format!("{degrees}°{minutes:02}'{seconds:04.1}\"{hemisphere}")
}

/// Parses a sexagesimal coordinate string back to decimal degrees.
///
/// Requires a degree mark, a minute mark, and a second mark in that order.
/// The hemisphere letter is found by a case-insensitive scan anywhere in the
/// string — `S` or `W` negate the result.
///
/// # Errors
///
/// [`CoreError::CoordinateFormat`] when any of the three marks is missing or
/// a numeric component does not parse.
pub fn sexagesimal_to_decimal(input: &str) -> Result<f64, CoreError> {
    let s = input.trim();
    let err = || CoreError::CoordinateFormat(input.to_owned());

    let deg_end = s.find('°').ok_or_else(err)?;
    let degrees = numeric_part(&s[..deg_end]).ok_or_else(err)?;

    let rest = &s[deg_end + '°'.len_utf8()..];
    let min_end = rest.find('\'').ok_or_else(err)?;
    let minutes = numeric_part(&rest[..min_end]).ok_or_else(err)?;

    let rest = &rest[min_end + 1..];
    let sec_end = rest.find('"').ok_or_else(err)?;
    let seconds = numeric_part(&rest[..sec_end]).ok_or_else(err)?;

    Ok(hemisphere_sign(s) * (degrees + minutes / 60.0 + seconds / 3600.0))
}

/// Fallback parse for the degree + decimal-minute notation (`D° M.MMM'` with
/// a hemisphere letter) that some volcano pages use instead of full
/// degree/minute/second.
///
/// # Errors
///
/// [`CoreError::CoordinateFormat`] when there is no degree mark or the
/// minute component does not parse.
pub fn degree_minutes_to_decimal(input: &str) -> Result<f64, CoreError> {
    let s = input.trim();
    let err = || CoreError::CoordinateFormat(input.to_owned());

    let deg_end = s.find('°').ok_or_else(err)?;
    let degrees = numeric_part(&s[..deg_end]).ok_or_else(err)?;

    let rest = &s[deg_end + '°'.len_utf8()..];
    let minutes_str = rest.split('\'').next().unwrap_or("");
    let minutes = numeric_part(minutes_str).ok_or_else(err)?;

    Ok(hemisphere_sign(s) * (degrees + minutes / 60.0))
}

/// `1 m = 3.28084 ft`.
#[must_use]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * 3.28084
}

/// Extracts the digits-and-dot content of a coordinate component and parses
/// it. Tolerates embedded spaces and stray punctuation.
fn numeric_part(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// `-1.0` if the string mentions a southern or western hemisphere letter
/// anywhere (case-insensitive), else `1.0`.
fn hemisphere_sign(s: &str) -> f64 {
    if s.chars()
        .any(|c| matches!(c.to_ascii_lowercase(), 's' | 'w'))
    {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
#[path = "geo_test.rs"]
mod tests;
