//! Markdown run reports and the change summary line.
//!
//! Rendering is pure string building from a [`geowatch_sync::RunReport`];
//! where the reports go on disk is `geowatch-store`'s business.

pub mod nengo;

mod render;

pub use render::{commit_summary, map_link, render_report, HumanDate};
