//! Parsers for the volcano map pages and per-volcano detail pages.
//!
//! The detail pages come in two historical layouts, detected once per page
//! (see [`LayoutKind`]). Both reduce to the same free-text form: a heading
//! paragraph `name\n(location)` followed by one paragraph per crater, which
//! a fixed-field pattern extracts.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use geowatch_core::{
    decimal_to_sexagesimal, degree_minutes_to_decimal, sexagesimal_to_decimal, Axis, CoreError,
    CraterRecord, DecimalDegrees, Elevation, GeoPoint, SexagesimalDegrees,
};

use crate::error::ScraperError;
use crate::normalize::{clean_lines, drop_breaks, fix_glyphs, strip_tags};

static MAP: LazyLock<Selector> = LazyLock::new(|| Selector::parse("map").expect("valid selector"));
static MAP_AREA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("area").expect("valid selector"));
static TITLE_L: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".titleL").expect("valid selector"));
static TITLE_2: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".title2").expect("valid selector"));
static POS: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".pos").expect("valid selector"));
static MEMO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".memo").expect("valid selector"));
static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("valid selector"));

/// The map pages link volcanoes through `javascript:jump('//host/path');`
/// hrefs rather than plain anchors.
static JUMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^javascript:jump\('(https?:)?//([A-Za-z0-9.:/\-]+)'\);$")
        .expect("valid jump regex")
});

/// Detail page URLs carry the region and the numeric volcano id:
/// `…/data/<region>/eng/<id>/<page>.htm`.
static DETAIL_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data/([A-Za-z0-9]+)/eng/([0-9A-Za-z]+)/[0-9A-Za-z\-]+\.htm$")
        .expect("valid detail path regex")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Za-z0-9\-() ]+)\n\(([A-Za-z()0-9,. \-]*)\)").expect("valid heading regex")
});

static CRATER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:\(([A-Za-z0-9\- ,.]+)\)\n)?Lat\.?:?\s*([0-9°'" .NS]+)\nLon\.?:?\s*([0-9°'" .WE]+)\nSummit\s*Elevation:?\s*([0-9,\- ]+|submarine)\s*m?"#,
    )
    .expect("valid crater regex")
});

/// Extracts the volcano detail page URLs from a regional map page's image
/// map, de-duplicated in page order. Hrefs that are not `jump` calls are
/// skipped.
///
/// # Errors
///
/// [`ScraperError::PageShape`] when the page has no `<map>` element.
pub fn parse_map_links(html: &str, url: &str) -> Result<Vec<String>, ScraperError> {
    let doc = Html::parse_document(html);
    let map = doc
        .select(&MAP)
        .next()
        .ok_or_else(|| ScraperError::shape(url, "missing map element", html))?;

    let mut links: Vec<String> = Vec::new();
    for area in map.select(&MAP_AREA) {
        let Some(href) = area.value().attr("href") else {
            continue;
        };
        let Some(captures) = JUMP.captures(href.trim()) else {
            continue;
        };
        let scheme = match captures.get(1).map(|m| m.as_str()) {
            Some("http:") => "http",
            _ => "https",
        };
        let link = format!("{scheme}://{}", captures[2].trim());
        if !links.contains(&link) {
            links.push(link);
        }
    }

    Ok(links)
}

/// `(region, id)` as derived from a detail page URL. Both absent when the
/// URL does not follow the expected path shape; `id` alone absent when its
/// path segment is not numeric (some entries are unnumbered).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionId {
    pub region: Option<String>,
    pub id: Option<u32>,
}

#[must_use]
pub fn parse_region_and_id(url: &str) -> RegionId {
    let Some(captures) = DETAIL_PATH.captures(url) else {
        return RegionId::default();
    };
    let id_segment = &captures[2];
    RegionId {
        region: Some(captures[1].to_owned()),
        id: if id_segment.chars().all(|c| c.is_ascii_digit()) {
            id_segment.parse().ok()
        } else {
            None
        },
    }
}

/// Applies the two hand-overridden ids. The generic id-from-URL heuristic
/// misidentifies these volcanoes on the source side; this is a known
/// source-data quirk, keyed by name, not something to fix generically.
#[must_use]
pub fn resolve_id(name: &str, url_id: Option<u32>) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "tenchozan" => Some(119),
        "oakandake" => Some(120),
        _ => url_id,
    }
}

/// The two historical detail page layouts, resolved once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Free text in the first table cell.
    Old,
    /// Dedicated `titleL` / `title2` / `pos` elements.
    New,
}

/// Everything a detail page contributes to a volcano record.
#[derive(Debug, Clone, PartialEq)]
pub struct VolcanoPage {
    pub name: String,
    pub location: String,
    pub memo: Option<String>,
    pub image_url: Option<String>,
    pub craters: Vec<CraterRecord>,
    pub layout: LayoutKind,
}

/// Parses a volcano detail page.
///
/// Crater paragraphs that fail the fixed-field pattern, or whose coordinates
/// fail both the sexagesimal and the degree+decimal-minute parse, are logged
/// and skipped — the containing volcano stays valid. An empty `craters` list
/// is therefore possible here; callers surface it as a parse failure.
///
/// # Errors
///
/// [`ScraperError::PageShape`] when neither layout's text source exists or
/// the heading paragraph does not match `name\n(location)`.
pub fn parse_volcano_page(html: &str, url: &str) -> Result<VolcanoPage, ScraperError> {
    let doc = Html::parse_document(html);

    let title_l = doc.select(&TITLE_L).next();
    let layout = if title_l.is_some() {
        LayoutKind::New
    } else {
        LayoutKind::Old
    };

    let memo = match doc.select(&MEMO).next() {
        Some(element) => Some(clean_memo(&element.inner_html())),
        None => doc
            .select(&TR)
            .nth(1)
            .map(|tr| clean_memo(&tr.inner_html())),
    };

    let raw_text = match title_l {
        Some(title) => {
            let name = title.inner_html();
            let location = doc
                .select(&TITLE_2)
                .next()
                .ok_or_else(|| ScraperError::shape(url, "new layout without title2 element", html))?
                .inner_html();
            let positions: String = doc.select(&POS).map(|p| p.inner_html()).collect();
            format!("{name}\n({location})\n{positions}")
        }
        None => doc
            .select(&TABLE)
            .next()
            .and_then(|table| table.select(&TD).next())
            .ok_or_else(|| ScraperError::shape(url, "old layout without a data table cell", html))?
            .inner_html(),
    };

    let image_url = doc
        .select(&IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| resolve_image_url(url, src));

    let plain = clean_lines(&fix_glyphs(&strip_tags(&drop_breaks(&raw_text))));
    let paragraphs: Vec<&str> = plain
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let heading = paragraphs
        .first()
        .and_then(|p| HEADING.captures(p))
        .ok_or_else(|| ScraperError::shape(url, "unparsable volcano heading", html))?;
    let name = heading[1].trim().to_owned();
    let location = heading[2].trim().to_owned();

    let mut craters = Vec::new();
    for paragraph in &paragraphs[1..] {
        match parse_crater(paragraph) {
            Some(crater) => craters.push(crater),
            None => {
                tracing::warn!(url, paragraph, "skipping unparsable crater paragraph");
            }
        }
    }

    Ok(VolcanoPage {
        name,
        location,
        memo,
        image_url,
        craters,
        layout,
    })
}

fn clean_memo(html: &str) -> String {
    clean_lines(&strip_tags(html)).trim().to_owned()
}

/// Resolves an image src against the detail page's directory, dropping any
/// query/fragment from the page URL first.
fn resolve_image_url(page_url: &str, src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        return src.to_owned();
    }
    let base = page_url
        .split(['?', '#'])
        .next()
        .unwrap_or(page_url);
    let dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
    format!("{dir}/{src}")
}

fn parse_crater(paragraph: &str) -> Option<CraterRecord> {
    let captures = CRATER.captures(paragraph)?;

    let name = captures.get(1).map(|m| m.as_str().trim().to_owned());
    let (latitude, latitude_text) = parse_coordinate(&captures[2], Axis::Latitude).ok()?;
    let (longitude, longitude_text) = parse_coordinate(&captures[3], Axis::Longitude).ok()?;

    let elevation_raw = captures[4].trim().replace("--", "-");
    let elevation = if elevation_raw.eq_ignore_ascii_case("submarine") {
        None
    } else {
        let digits: String = elevation_raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '-')
            .collect();
        digits.parse::<i32>().ok().map(Elevation::from_meters)
    };

    Some(CraterRecord {
        name,
        location: GeoPoint {
            decimal: DecimalDegrees {
                latitude,
                longitude,
            },
            sexagesimal: SexagesimalDegrees {
                latitude: latitude_text,
                longitude: longitude_text,
            },
        },
        elevation,
    })
}

/// Parses a printed coordinate, preferring the full sexagesimal form and
/// falling back to degree+decimal-minute notation. On fallback the
/// canonical sexagesimal string is re-rendered from the recovered decimal so
/// both representations stay in sync.
fn parse_coordinate(raw: &str, axis: Axis) -> Result<(f64, String), CoreError> {
    let cleaned = raw.trim().replace("\"\"", "\"");
    match sexagesimal_to_decimal(&cleaned) {
        Ok(decimal) => Ok((decimal, cleaned)),
        Err(_) => {
            let decimal = degree_minutes_to_decimal(&cleaned)?;
            Ok((decimal, decimal_to_sexagesimal(decimal, axis)))
        }
    }
}

#[cfg(test)]
#[path = "volcano_test.rs"]
mod tests;
