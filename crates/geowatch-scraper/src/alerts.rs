//! Alert table parsing and keyword classification.
//!
//! The aggregate view and the regional pages print the same information in
//! different shapes: the aggregate table carries a warning code, a timestamp
//! and a link to a per-volcano info page; regional tables only carry the
//! volcano name and the keyword. Classification works on the keyword text
//! alone and is deliberately forgiving — an unmatched keyword is stored
//! unclassified, never dropped.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use geowatch_core::{
    AlertClassification, AlertLevel, NonVolcanicAlertLevel, SubmarineWarningLevel,
    VolcanicAlertLevel, VolcanoKind,
};

use crate::error::ScraperError;
use crate::normalize::{breaks_to_newlines, strip_tags};

static INFOTABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".infotable").expect("valid selector"));
static TEXTFRAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".textframe").expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// One row of the aggregate alert table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalAlertRow {
    pub code: String,
    pub keyword: String,
    pub issued_to: String,
    pub issued_at: String,
    /// Href of the per-volcano info page, as printed (relative).
    pub info_href: String,
}

/// One row of a regional alert table. These layouts omit timestamps and
/// codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionAlertRow {
    pub issued_to: String,
    pub keyword: String,
}

/// Parses the aggregate alert table (the last `infotable` on the page).
///
/// # Errors
///
/// [`ScraperError::PageShape`] when no `infotable` exists, a data row is
/// shorter than four columns, or the code cell has no info link.
pub fn parse_global_alert_rows(html: &str, url: &str) -> Result<Vec<GlobalAlertRow>, ScraperError> {
    let doc = Html::parse_document(html);
    let table = last_infotable(&doc, url, html)?;

    let mut rows = Vec::new();
    for tr in table.select(&TR) {
        let tds: Vec<ElementRef<'_>> = tr.select(&TD).collect();
        if tds.is_empty() {
            continue;
        }
        if tds.len() < 4 {
            return Err(ScraperError::shape(
                url,
                format!("alert row has {} cells, expected 4", tds.len()),
                html,
            ));
        }

        let info_href = tds[0]
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| ScraperError::shape(url, "alert row without info link", html))?
            .to_owned();

        rows.push(GlobalAlertRow {
            code: cell_text(tds[0]),
            keyword: cell_text(tds[1]),
            issued_to: cell_text(tds[2]),
            issued_at: cell_text(tds[3]),
            info_href,
        });
    }

    Ok(rows)
}

/// Parses a regional alert table.
///
/// # Errors
///
/// [`ScraperError::PageShape`] when no `infotable` exists or a data row is
/// shorter than two columns.
pub fn parse_region_alert_rows(html: &str, url: &str) -> Result<Vec<RegionAlertRow>, ScraperError> {
    let doc = Html::parse_document(html);
    let table = last_infotable(&doc, url, html)?;

    let mut rows = Vec::new();
    for tr in table.select(&TR) {
        let tds: Vec<ElementRef<'_>> = tr.select(&TD).collect();
        if tds.is_empty() {
            continue;
        }
        if tds.len() < 2 {
            return Err(ScraperError::shape(
                url,
                format!("alert row has {} cells, expected 2", tds.len()),
                html,
            ));
        }
        rows.push(RegionAlertRow {
            issued_to: cell_text(tds[0]),
            keyword: cell_text(tds[1]),
        });
    }

    Ok(rows)
}

/// Extracts the free-text alert context from a per-volcano info page,
/// keeping `<br>`-driven line structure.
///
/// # Errors
///
/// [`ScraperError::PageShape`] when the page has no text frame.
pub fn parse_info_text(html: &str, url: &str) -> Result<String, ScraperError> {
    let doc = Html::parse_document(html);
    let frame = doc
        .select(&TEXTFRAME)
        .next()
        .ok_or_else(|| ScraperError::shape(url, "info page without textframe", html))?;
    Ok(strip_tags(&breaks_to_newlines(&frame.inner_html())))
}

/// Classifies a raw alert keyword into the severity taxonomy.
///
/// Case-insensitive on trimmed text. The substring checks are ordered most
/// specific first and that order is the contract — a message can satisfy
/// several predicates:
/// 1. contains `level` → digit 1–5 picks the volcanic alert level;
/// 2. contains `warning` but not `sea`: residential qualifiers pick the
///    near-crater / non-residential / residential warning, and a
///    crater-less warning falls through unclassified;
/// 3. contains `sea` → submarine volcanic warning;
/// 4. contains `potential for increased activity` → potential-activity;
/// 5. anything else is `None` — unclassified, not an error.
#[must_use]
pub fn classify_alert(text: &str) -> Option<AlertClassification> {
    let text = text.trim().to_lowercase();

    if text.contains("level") {
        for digit in (1_u8..=5).rev() {
            if text.contains(&format!("level {digit}")) {
                let level = VolcanicAlertLevel::from_digit(digit).expect("digit is 1..=5");
                return Some(AlertClassification {
                    kind: VolcanoKind::Volcano,
                    alert: AlertLevel::Volcanic(level),
                });
            }
        }
        return None;
    }

    if text.contains("warning") && !text.contains("sea") {
        if !text.contains("crater") {
            return None;
        }
        let level = if text.contains("non-residential") {
            NonVolcanicAlertLevel::NonResidentialWarning
        } else if text.contains("residential") {
            NonVolcanicAlertLevel::ResidentialWarning
        } else {
            NonVolcanicAlertLevel::NearCraterWarning
        };
        return Some(AlertClassification {
            kind: VolcanoKind::Volcano,
            alert: AlertLevel::NonVolcanic(level),
        });
    }

    if text.contains("sea") {
        return Some(AlertClassification {
            kind: VolcanoKind::SubmarineVolcano,
            alert: AlertLevel::Submarine(SubmarineWarningLevel::VolcanicWarning),
        });
    }

    if text.contains("potential for increased activity") {
        return Some(AlertClassification {
            kind: VolcanoKind::Volcano,
            alert: AlertLevel::NonVolcanic(NonVolcanicAlertLevel::PotentialActivity),
        });
    }

    None
}

fn last_infotable<'a>(
    doc: &'a Html,
    url: &str,
    html: &str,
) -> Result<ElementRef<'a>, ScraperError> {
    doc.select(&INFOTABLE)
        .last()
        .ok_or_else(|| ScraperError::shape(url, "missing infotable", html))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    strip_tags(&cell.inner_html()).trim().to_owned()
}

#[cfg(test)]
#[path = "alerts_test.rs"]
mod tests;
