//! Reconciliation engine: drives the scraper against the cached state and
//! produces the changed subset for reporting.
//!
//! Both domains follow the same shape: conditional fetches against cached
//! `last_update` timestamps, content-equality checks that ignore
//! bookkeeping fields, per-entity failure isolation (one broken page never
//! aborts the run), and an append-only alert history on the volcano side.

use std::time::Duration;

use chrono::{DateTime, Utc};

use geowatch_core::{EarthquakeRecord, VolcanoRecord};

mod earthquake;
mod error;
mod refresh;
mod volcano;

pub use earthquake::reconcile_earthquakes;
pub use error::SyncError;
pub use refresh::{refresh_entity, Refresh};
pub use volcano::{merge_alerts, reconcile_volcanoes, AreaMaps, SourcedAlert};

/// Pause between consecutive requests to the same host. The source is a
/// public agency site; the pipeline is a polite guest.
pub(crate) const COURTESY_DELAY: Duration = Duration::from_millis(250);

pub(crate) async fn courtesy_pause() {
    tokio::time::sleep(COURTESY_DELAY).await;
}

/// What one run changed: strictly the new-or-modified subset of each cache,
/// never the full dataset.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub earthquakes_updated: Vec<EarthquakeRecord>,
    pub volcanoes_updated: Vec<VolcanoRecord>,
    pub run_timestamp: DateTime<Utc>,
}

impl RunReport {
    #[must_use]
    pub fn new(run_timestamp: DateTime<Utc>) -> Self {
        Self {
            earthquakes_updated: Vec::new(),
            volcanoes_updated: Vec::new(),
            run_timestamp,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.earthquakes_updated.is_empty() && self.volcanoes_updated.is_empty()
    }
}
