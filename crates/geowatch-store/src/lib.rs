//! JSON file persistence for the two bulletin caches.
//!
//! One file per domain (`earthquake.json`, `volcano.json`) under a
//! configurable data directory, plus timestamped Markdown run reports under
//! `reports/`. All writes go through a temp file in the target directory and
//! an atomic rename, so a crashed run never leaves a torn cache on disk.

mod error;
mod store;

pub use error::StoreError;
pub use store::{sort_earthquakes, sort_volcanoes, Store};
