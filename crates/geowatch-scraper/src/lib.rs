//! Fetching and parsing of the agency's HTML bulletins.
//!
//! The client speaks conditional HTTP (`If-Modified-Since` / 304); the
//! parsers are pure functions from page bodies to `geowatch-core` values and
//! never touch the caches themselves.

pub mod alerts;
pub mod client;
pub mod earthquake;
pub mod error;
pub mod normalize;
mod rate_limit;
pub mod rowspan;
pub mod volcano;

pub use alerts::{
    classify_alert, parse_global_alert_rows, parse_info_text, parse_region_alert_rows,
    GlobalAlertRow, RegionAlertRow,
};
pub use client::{BulletinClient, Endpoints, FetchOutcome};
pub use earthquake::{parse_quake_detail, parse_quake_index, QuakeDetail, QuakeIndexEntry};
pub use error::ScraperError;
pub use volcano::{
    parse_map_links, parse_region_and_id, parse_volcano_page, resolve_id, LayoutKind, RegionId,
    VolcanoPage,
};
