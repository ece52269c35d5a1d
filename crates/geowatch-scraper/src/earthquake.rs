//! Parsers for the earthquake index and detail pages.
//!
//! The detail page layout is brittle by design: the metadata row has a fixed
//! column order, and a missing column is a loud [`ScraperError::PageShape`]
//! rather than a silent shift that would corrupt the cache.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use geowatch_core::{CityIntensity, GeoPoint, RegionIntensity};

use crate::error::ScraperError;
use crate::normalize::strip_tags;
use crate::rowspan::{walk_rows, SpannedCell};

static INFO_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#info table").expect("valid selector"));
static TEXTFRAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".textframe").expect("valid selector"));
static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static BORDERED_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"table[border="1"]"#).expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// One row of the earthquake index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuakeIndexEntry {
    /// Source-assigned id lifted from the detail link.
    pub id: String,
    pub max_intensity: String,
    /// Issue time as printed — agency-local, not yet time-zoned.
    pub issued_at: String,
}

/// Everything the detail page contributes to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeDetail {
    pub occurred_at: String,
    pub epicenter: GeoPoint,
    pub depth_km: u32,
    pub magnitude: f64,
    pub region_name: String,
    pub intensity_by_region: Option<Vec<RegionIntensity>>,
    pub intensity_by_city: Option<Vec<CityIntensity>>,
}

/// Parses the index page into its event rows.
///
/// # Errors
///
/// [`ScraperError::PageShape`] when the `#info` table is missing, a data row
/// is shorter than the five expected columns, or a row carries no detail
/// link.
pub fn parse_quake_index(html: &str, url: &str) -> Result<Vec<QuakeIndexEntry>, ScraperError> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&INFO_TABLE)
        .next()
        .ok_or_else(|| ScraperError::shape(url, "missing #info table", html))?;

    let mut entries = Vec::new();
    for tr in table.select(&TR) {
        let tds: Vec<ElementRef<'_>> = tr.select(&TD).collect();
        if tds.is_empty() {
            // Header row.
            continue;
        }
        if tds.len() < 5 {
            return Err(ScraperError::shape(
                url,
                format!("index row has {} cells, expected 5", tds.len()),
                html,
            ));
        }

        let anchor = tds[0]
            .select(&ANCHOR)
            .next()
            .ok_or_else(|| ScraperError::shape(url, "index row without detail link", html))?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| ScraperError::shape(url, "detail link without href", html))?;
        let id = href
            .rsplit('/')
            .next()
            .unwrap_or(href)
            .split('.')
            .next()
            .unwrap_or_default()
            .to_owned();
        if id.is_empty() {
            return Err(ScraperError::shape(
                url,
                format!("detail link {href:?} has no id segment"),
                html,
            ));
        }

        entries.push(QuakeIndexEntry {
            id,
            max_intensity: cell_text(tds[3]),
            issued_at: cell_text(tds[4]),
        });
    }

    Ok(entries)
}

/// Parses a detail page: the fixed-order metadata row, then the optional
/// region-intensity (one spanning column) and city-intensity (two spanning
/// columns) tables, distinguished by their `border="1"` attribute.
///
/// # Errors
///
/// [`ScraperError::PageShape`] when the text frame, metadata table, or any
/// expected column is missing; [`ScraperError::FieldFormat`] when a metadata
/// value does not convert.
pub fn parse_quake_detail(html: &str, url: &str) -> Result<QuakeDetail, ScraperError> {
    let doc = Html::parse_document(html);
    let frame = doc
        .select(&TEXTFRAME)
        .next()
        .ok_or_else(|| ScraperError::shape(url, "missing textframe element", html))?;

    let metadata_table = frame
        .select(&TABLE)
        .next()
        .ok_or_else(|| ScraperError::shape(url, "missing metadata table", html))?;
    let metadata_row = metadata_table
        .select(&TR)
        .nth(1)
        .ok_or_else(|| ScraperError::shape(url, "metadata table has no data row", html))?;
    let tds: Vec<ElementRef<'_>> = metadata_row.select(&TD).collect();
    if tds.len() < 6 {
        return Err(ScraperError::shape(
            url,
            format!("metadata row has {} cells, expected 6", tds.len()),
            html,
        ));
    }

    let occurred_at = cell_text(tds[0]);
    let latitude = hemisphere_decimal(&cell_text(tds[1]), 's', "latitude", url)?;
    let longitude = hemisphere_decimal(&cell_text(tds[2]), 'w', "longitude", url)?;
    let depth_km = parse_depth(&cell_text(tds[3]), url)?;
    let magnitude_text = cell_text(tds[4]);
    let magnitude: f64 = magnitude_text
        .parse()
        .map_err(|_| ScraperError::FieldFormat {
            url: url.to_owned(),
            field: "magnitude",
            value: magnitude_text.clone(),
        })?;
    let region_name = cell_text(tds[5]);

    let intensity_tables: Vec<ElementRef<'_>> = frame.select(&BORDERED_TABLE).collect();

    let intensity_by_region = intensity_tables.first().map(|table| {
        walk_rows(&spanned_rows(*table), 1)
            .into_iter()
            .filter(|r| r.len() >= 2)
            .map(|mut r| RegionIntensity {
                region_name: r.remove(1),
                intensity: r.remove(0),
            })
            .collect()
    });

    let intensity_by_city = intensity_tables.get(1).map(|table| {
        walk_rows(&spanned_rows(*table), 2)
            .into_iter()
            .filter(|r| r.len() >= 3)
            .map(|mut r| CityIntensity {
                city: r.remove(2),
                intensity: r.remove(1),
                prefecture: r.remove(0),
            })
            .collect()
    });

    Ok(QuakeDetail {
        occurred_at,
        epicenter: GeoPoint::from_decimal(latitude, longitude),
        depth_km,
        magnitude,
        region_name,
        intensity_by_region,
        intensity_by_city,
    })
}

/// Extracts `(text, rowspan)` cell rows from an intensity table, skipping
/// its header row.
fn spanned_rows(table: ElementRef<'_>) -> Vec<Vec<SpannedCell>> {
    table
        .select(&TR)
        .skip(1)
        .map(|tr| {
            tr.select(&TD)
                .map(|td| {
                    let span = td
                        .value()
                        .attr("rowspan")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(1);
                    SpannedCell::new(cell_text(td), span)
                })
                .collect()
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    strip_tags(&cell.inner_html()).trim().to_owned()
}

/// Parses a `37.2N`-style decimal-with-hemisphere coordinate. The hemisphere
/// letter is found by case-insensitive scan; `negative_letter` (s or w)
/// flips the sign.
fn hemisphere_decimal(
    raw: &str,
    negative_letter: char,
    field: &'static str,
    url: &str,
) -> Result<f64, ScraperError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c.to_ascii_lowercase(), 'n' | 's' | 'e' | 'w'))
        .collect();
    let value: f64 = cleaned
        .trim()
        .parse()
        .map_err(|_| ScraperError::FieldFormat {
            url: url.to_owned(),
            field,
            value: raw.to_owned(),
        })?;
    let negative = raw
        .chars()
        .any(|c| c.to_ascii_lowercase() == negative_letter);
    Ok(if negative { -value } else { value })
}

/// Parses a `"55 km"`-style depth cell down to its kilometre count.
fn parse_depth(raw: &str, url: &str) -> Result<u32, ScraperError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().map_err(|_| ScraperError::FieldFormat {
        url: url.to_owned(),
        field: "depth",
        value: raw.to_owned(),
    })
}

#[cfg(test)]
#[path = "earthquake_test.rs"]
mod tests;
