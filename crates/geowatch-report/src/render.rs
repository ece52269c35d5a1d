//! Markdown rendering for a run's changed subset.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use geowatch_core::{EarthquakeRecord, GeoPoint, VolcanoRecord};
use geowatch_sync::RunReport;

use crate::nengo::nengo_for;

/// Display strings for one instant, precomputed for the report header and
/// the store's file naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanDate {
    /// `2021-02-13`
    pub ymd: String,
    /// `14:12`
    pub time: String,
    /// `令和三年`, when the era table covers the date.
    pub nengo: Option<String>,
    /// Filesystem-safe stamp, `20210213-1412`.
    pub file_stamp: String,
}

impl HumanDate {
    #[must_use]
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self {
            ymd: instant.format("%Y-%m-%d").to_string(),
            time: instant.format("%H:%M").to_string(),
            nengo: nengo_for(instant).map(|n| n.display()),
            file_stamp: instant.format("%Y%m%d-%H%M").to_string(),
        }
    }
}

/// A Google Maps place link for a point, addressed by its sexagesimal
/// rendering and centered on the decimal one.
#[must_use]
pub fn map_link(point: &GeoPoint) -> String {
    let place = format!(
        "{}+{}",
        escape_coordinate(&point.sexagesimal.latitude),
        escape_coordinate(&point.sexagesimal.longitude)
    );
    format!(
        "https://www.google.com/maps/place/{place}/@{},{},10z",
        point.decimal.latitude, point.decimal.longitude
    )
}

fn escape_coordinate(text: &str) -> String {
    text.replace('"', "%22").replace('\'', "%27")
}

/// Renders the Markdown document for a run. Only the changed subset appears;
/// an empty report still renders its header.
#[must_use]
pub fn render_report(report: &RunReport) -> String {
    let human = HumanDate::from_utc(report.run_timestamp);

    let mut md = String::new();
    let _ = writeln!(md, "# {} {} Report", human.ymd, human.time);
    if let Some(nengo) = &human.nengo {
        let _ = writeln!(md, "{nengo}");
    }
    md.push('\n');

    if !report.volcanoes_updated.is_empty() {
        md.push_str("## Volcanoes\n");
        for volcano in &report.volcanoes_updated {
            render_volcano(&mut md, volcano);
        }
    }

    if !report.earthquakes_updated.is_empty() {
        md.push_str("## Earthquakes\n");
        for quake in &report.earthquakes_updated {
            render_earthquake(&mut md, quake);
        }
    }

    md
}

fn render_volcano(md: &mut String, volcano: &VolcanoRecord) {
    let _ = writeln!(md, "### **[{}]({})**", volcano.name, volcano.metadata.page);
    if let Some(img) = &volcano.metadata.image_url {
        let _ = writeln!(md, "![{} volcano image]({img})  ", volcano.name);
    }
    if let Some(memo) = &volcano.metadata.memo {
        let _ = writeln!(md, "{memo}  ");
    }

    md.push_str("\n#### Craters / Sub-Volcanoes\n");
    for crater in &volcano.craters {
        let name = crater.name.as_deref().unwrap_or(&volcano.name);
        let elevation = crater
            .elevation
            .as_ref()
            .map_or_else(|| "submarine".to_owned(), |e| format!("{}m", e.meters));
        let _ = writeln!(
            md,
            "* [{name} @ {elevation}]({})",
            map_link(&crater.location)
        );
    }

    if let Some(history) = &volcano.alerts {
        md.push_str("\n#### Alerts\n");
        for alert in &history.entries {
            let issued = alert.issued_at.as_deref().unwrap_or("time not printed");
            let _ = writeln!(md, "* {} - {issued}  ", alert.issued_to);
            let _ = writeln!(md, "**{}**  ", alert.raw.keyword);
            if let Some(info) = &alert.raw.info {
                let _ = writeln!(md, "```\n{}\n```  ", info.contents.trim());
                let _ = writeln!(md, "[Link]({})  ", info.link);
            }
        }
    }
    md.push('\n');
}

fn render_earthquake(md: &mut String, quake: &EarthquakeRecord) {
    let _ = writeln!(md, "### {} @ M{}", quake.region_name, quake.magnitude);
    let _ = writeln!(md, "{}  ", quake.occurred_at);
    let _ = writeln!(md, "[Report Link]({})  ", quake.url);
    let _ = writeln!(
        md,
        "[epicenter @ {}km]({})",
        quake.depth_km,
        map_link(&quake.epicenter)
    );
    md.push('\n');
}

/// One-line change summary suitable for a commit message. `None` when the
/// run changed nothing.
#[must_use]
pub fn commit_summary(report: &RunReport) -> Option<String> {
    let volcanoes = &report.volcanoes_updated;
    let quakes = &report.earthquakes_updated;

    match (volcanoes.as_slice(), quakes.as_slice()) {
        ([], []) => None,
        ([_, ..], [_, ..]) => {
            Some("build: updated multiple volcanoes and earthquakes alerts".to_owned())
        }
        ([volcano], []) => Some(format!("build: updated volcano {}", volcano.name)),
        ([_, _, ..], []) => Some("build: updated multiple volcano alerts".to_owned()),
        ([], [quake]) => Some(format!(
            "build: updated earthquake at {}",
            quake.region_name
        )),
        ([], [_, _, ..]) => Some("build: updated multiple earthquake alerts".to_owned()),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
