//! Earthquake reconciliation: index-driven, one detail page per event.

use chrono::{DateTime, Utc};

use geowatch_core::{EarthquakeCache, EarthquakeRecord};
use geowatch_scraper::{
    parse_quake_detail, parse_quake_index, BulletinClient, Endpoints, FetchOutcome,
    QuakeIndexEntry, ScraperError,
};

use crate::courtesy_pause;
use crate::error::SyncError;
use crate::refresh::{refresh_entity, Refresh};

/// Reconciles the earthquake cache against the source index.
///
/// `None` cache means first run: every index entry is fetched and inserted.
/// Otherwise the index is fetched conditionally; on 304 nothing happens.
/// On fresh content each entry is either inserted (unknown id) or refreshed
/// (known id) via its detail page. A failure on one entry is logged and the
/// run continues.
///
/// Returns the changed subset: new records plus records whose content
/// actually moved.
///
/// # Errors
///
/// [`SyncError::Scraper`] when the index itself cannot be fetched or parsed.
/// Per-entry failures do not surface here.
pub async fn reconcile_earthquakes(
    client: &BulletinClient,
    endpoints: &Endpoints,
    cache: &mut Option<EarthquakeCache>,
) -> Result<Vec<EarthquakeRecord>, SyncError> {
    let index_url = endpoints.quake_index();
    let since = cache.as_ref().map(|c| c.last_update);

    let (body, index_modified) = match client.fetch(&index_url, since).await? {
        FetchOutcome::NotModified => {
            tracing::info!("earthquake index unchanged");
            return Ok(Vec::new());
        }
        FetchOutcome::Fetched {
            body,
            server_last_modified,
        } => (body, server_last_modified.unwrap_or_else(Utc::now)),
    };

    let entries = parse_quake_index(&body, &index_url)?;
    tracing::info!(entries = entries.len(), "earthquake index fetched");

    let cache = cache.get_or_insert_with(|| EarthquakeCache {
        last_update: index_modified,
        data: Vec::new(),
    });

    let mut updated = Vec::new();
    for entry in entries {
        courtesy_pause().await;
        match sync_entry(client, endpoints, cache, &entry).await {
            Ok(Some(record)) => updated.push(record),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(id = %entry.id, error = %err, "skipping earthquake entry");
            }
        }
    }

    cache.last_update = index_modified;
    Ok(updated)
}

/// Inserts `record`, replacing any existing entry with the same id. The
/// cache never holds two records for one source id.
pub(crate) fn insert_record(cache: &mut EarthquakeCache, record: EarthquakeRecord) {
    match cache.data.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record,
        None => cache.data.push(record),
    }
}

async fn sync_entry(
    client: &BulletinClient,
    endpoints: &Endpoints,
    cache: &mut EarthquakeCache,
    entry: &QuakeIndexEntry,
) -> Result<Option<EarthquakeRecord>, SyncError> {
    let detail_url = endpoints.quake_detail(&entry.id);

    let Some(position) = cache.data.iter().position(|r| r.id == entry.id) else {
        let (body, modified) = crate::refresh::fetch_fresh(client, &detail_url).await?;
        let record = build_record(&body, &detail_url, entry, modified)?;
        insert_record(cache, record.clone());
        tracing::info!(id = %record.id, region = %record.region_name, "new earthquake");
        return Ok(Some(record));
    };

    let existing = &cache.data[position];
    let outcome = refresh_entity(
        client,
        &detail_url,
        existing.last_update,
        |body, url| build_record(body, url, entry, existing.last_update),
        |candidate| existing.content_eq(candidate),
    )
    .await?;

    match outcome {
        Refresh::Unchanged => Ok(None),
        Refresh::Touched(modified) => {
            cache.data[position].last_update = modified;
            Ok(None)
        }
        Refresh::Replaced {
            mut value,
            modified,
        } => {
            value.last_update = modified;
            cache.data[position] = value.clone();
            tracing::info!(id = %value.id, "earthquake updated");
            Ok(Some(value))
        }
    }
}

fn build_record(
    body: &str,
    url: &str,
    entry: &QuakeIndexEntry,
    last_update: DateTime<Utc>,
) -> Result<EarthquakeRecord, ScraperError> {
    let detail = parse_quake_detail(body, url)?;
    Ok(EarthquakeRecord {
        id: entry.id.clone(),
        region_name: detail.region_name,
        magnitude: detail.magnitude,
        occurred_at: detail.occurred_at,
        epicenter: detail.epicenter,
        depth_km: detail.depth_km,
        last_update,
        intensity_by_region: detail.intensity_by_region,
        intensity_by_city: detail.intensity_by_city,
        max_intensity: entry.max_intensity.clone(),
        issued_at: entry.issued_at.clone(),
        url: url.to_owned(),
    })
}

#[cfg(test)]
#[path = "earthquake_test.rs"]
mod tests;
