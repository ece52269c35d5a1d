//! Volcano reconciliation: discovery via the regional maps, metadata
//! refresh per record, and the append-only alert history.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use geowatch_core::{
    AlertContext, AlertHistory, Area, RawAlert, VolcanoAlert, VolcanoMetadata, VolcanoRecord,
};
use geowatch_scraper::{
    classify_alert, parse_global_alert_rows, parse_info_text, parse_map_links,
    parse_region_alert_rows, parse_region_and_id, parse_volcano_page, resolve_id, BulletinClient,
    Endpoints, ScraperError,
};

use crate::courtesy_pause;
use crate::error::SyncError;
use crate::refresh::{fetch_fresh, refresh_entity, Refresh};

/// Per-run memo of fetched map pages. The aggregate view and the regional
/// maps are each needed by both discovery and the alert sweep; this keeps
/// every one at a single fetch per run.
#[derive(Debug, Default)]
pub struct AreaMaps {
    pages: HashMap<Area, (String, DateTime<Utc>)>,
}

impl AreaMaps {
    /// Returns the map page body and its server timestamp, fetching on
    /// first use.
    ///
    /// # Errors
    ///
    /// [`SyncError::Scraper`] on fetch failure. A failed fetch is not
    /// memoized; the next call retries.
    pub async fn get(
        &mut self,
        client: &BulletinClient,
        endpoints: &Endpoints,
        area: Area,
    ) -> Result<(String, DateTime<Utc>), SyncError> {
        if let Some(cached) = self.pages.get(&area) {
            return Ok(cached.clone());
        }
        courtesy_pause().await;
        let url = endpoints.volcano_map(area);
        let fetched = fetch_fresh(client, &url).await?;
        self.pages.insert(area, fetched.clone());
        Ok(fetched)
    }
}

/// An alert row normalized from either table layout, stamped with the
/// server time of the map page it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedAlert {
    pub alert: VolcanoAlert,
    pub stamped: DateTime<Utc>,
}

/// Reconciles the volcano cache.
///
/// First run (`None` cache): discovers every volcano through the seven
/// regional maps and inserts each successfully parsed record. Later runs:
/// refreshes each record's metadata page conditionally. Both paths finish
/// with the alert sweep, which appends novel alerts to the matched records'
/// histories.
///
/// Returns the changed subset: inserted records, records whose metadata
/// moved, and records that gained an alert.
///
/// # Errors
///
/// [`SyncError::Scraper`] when the aggregate alert view cannot be fetched
/// or parsed, or when a bootstrap finds no usable regional map at all.
/// Per-entity failures are logged and skipped.
pub async fn reconcile_volcanoes(
    client: &BulletinClient,
    endpoints: &Endpoints,
    cache: &mut Option<Vec<VolcanoRecord>>,
) -> Result<Vec<VolcanoRecord>, SyncError> {
    let mut maps = AreaMaps::default();
    let mut changed = BTreeSet::new();

    let records = match cache {
        None => {
            let bootstrapped = bootstrap(client, endpoints, &mut maps).await?;
            tracing::info!(count = bootstrapped.len(), "volcano cache bootstrapped");
            let records = cache.insert(bootstrapped);
            changed.extend(0..records.len());
            records
        }
        Some(records) => {
            refresh_metadata(client, records, &mut changed).await;
            records
        }
    };

    let alerts = collect_alerts(client, endpoints, &mut maps).await?;
    for position in merge_alerts(records, &alerts) {
        changed.insert(position);
    }

    Ok(changed
        .into_iter()
        .map(|position| records[position].clone())
        .collect())
}

/// Walks the seven regional maps and fetches every linked detail page,
/// de-duplicated by canonical URL across regions.
async fn bootstrap(
    client: &BulletinClient,
    endpoints: &Endpoints,
    maps: &mut AreaMaps,
) -> Result<Vec<VolcanoRecord>, SyncError> {
    let mut records: Vec<VolcanoRecord> = Vec::new();
    let mut any_map = false;

    for area in Area::REGIONS {
        let map_url = endpoints.volcano_map(area);
        let links = match maps.get(client, endpoints, area).await {
            Ok((body, _)) => match parse_map_links(&body, &map_url) {
                Ok(links) => links,
                Err(err) => {
                    tracing::warn!(url = %map_url, error = %err, "skipping unparsable map");
                    continue;
                }
            },
            Err(err) => {
                tracing::warn!(url = %map_url, error = %err, "skipping unreachable map");
                continue;
            }
        };
        any_map = true;

        for link in links {
            if records.iter().any(|r| r.metadata.page == link) {
                continue;
            }
            courtesy_pause().await;
            match fetch_volcano(client, &link, area).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(url = %link, error = %err, "skipping volcano page");
                }
            }
        }
    }

    if !any_map {
        return Err(SyncError::NoRegionalMaps);
    }

    Ok(records)
}

async fn fetch_volcano(
    client: &BulletinClient,
    url: &str,
    area: Area,
) -> Result<Option<VolcanoRecord>, SyncError> {
    let (body, modified) = fetch_fresh(client, url).await?;
    let record = build_record(&body, url, area, modified)?;
    if record.craters.is_empty() {
        // A record without craters is a parse failure, not a valid entry.
        tracing::warn!(url, name = %record.name, "volcano page yielded no craters");
        return Ok(None);
    }
    Ok(Some(record))
}

fn build_record(
    body: &str,
    url: &str,
    area: Area,
    last_update: DateTime<Utc>,
) -> Result<VolcanoRecord, ScraperError> {
    let page = parse_volcano_page(body, url)?;
    let derived = parse_region_and_id(url);
    let id = resolve_id(&page.name, derived.id);
    Ok(VolcanoRecord {
        id,
        region: derived.region,
        area,
        name: page.name,
        last_update,
        location: page.location,
        craters: page.craters,
        metadata: VolcanoMetadata {
            image_url: page.image_url,
            memo: page.memo,
            page: url.to_owned(),
        },
        alerts: None,
    })
}

/// Conditionally re-fetches each record's detail page, replacing records
/// whose metadata moved. Alert history is carried over untouched; it is
/// owned by the alert merge.
async fn refresh_metadata(
    client: &BulletinClient,
    records: &mut [VolcanoRecord],
    changed: &mut BTreeSet<usize>,
) {
    for position in 0..records.len() {
        courtesy_pause().await;
        let record = &records[position];
        let url = record.metadata.page.clone();
        let outcome = refresh_entity(
            client,
            &url,
            record.last_update,
            |body, url| build_record(body, url, record.area, record.last_update),
            |candidate| record.metadata_eq(candidate),
        )
        .await;

        match outcome {
            Ok(Refresh::Unchanged) => {}
            Ok(Refresh::Touched(modified)) => {
                records[position].last_update = modified;
            }
            Ok(Refresh::Replaced {
                mut value,
                modified,
            }) => {
                if value.craters.is_empty() {
                    tracing::warn!(url, "refreshed page lost its craters, keeping cached record");
                    continue;
                }
                value.last_update = modified;
                value.alerts = records[position].alerts.take();
                tracing::info!(name = %value.name, "volcano metadata updated");
                records[position] = value;
                changed.insert(position);
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "skipping volcano refresh");
            }
        }
    }
}

/// Gathers alerts from the aggregate view and all seven regional maps.
/// Aggregate rows come first and win the per-volcano de-duplication: they
/// carry timestamps, codes, and a free-text info page the regional layouts
/// omit.
async fn collect_alerts(
    client: &BulletinClient,
    endpoints: &Endpoints,
    maps: &mut AreaMaps,
) -> Result<Vec<SourcedAlert>, SyncError> {
    let mut alerts: Vec<SourcedAlert> = Vec::new();

    let global_url = endpoints.volcano_map(Area::Global);
    let (body, stamped) = maps.get(client, endpoints, Area::Global).await?;
    for row in parse_global_alert_rows(&body, &global_url)? {
        let info_url = endpoints.volcano_info(&row.info_href);
        courtesy_pause().await;
        let info = match fetch_fresh(client, &info_url).await {
            Ok((info_body, _)) => match parse_info_text(&info_body, &info_url) {
                Ok(contents) => Some(AlertContext {
                    contents,
                    link: info_url.clone(),
                }),
                Err(err) => {
                    tracing::warn!(url = %info_url, error = %err, "unparsable alert info page");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(url = %info_url, error = %err, "unreachable alert info page");
                None
            }
        };
        alerts.push(SourcedAlert {
            alert: VolcanoAlert {
                issued_to: row.issued_to,
                issued_at: Some(row.issued_at),
                classification: classify_alert(&row.keyword),
                raw: RawAlert {
                    keyword: row.keyword,
                    code: Some(row.code),
                    info,
                },
            },
            stamped,
        });
    }

    for area in Area::REGIONS {
        let map_url = endpoints.volcano_map(area);
        let rows = match maps.get(client, endpoints, area).await {
            Ok((body, stamped)) => {
                parse_region_alert_rows(&body, &map_url).map(|rows| (rows, stamped))
            }
            Err(err) => {
                tracing::warn!(url = %map_url, error = %err, "skipping regional alert table");
                continue;
            }
        };
        let (rows, stamped) = match rows {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(url = %map_url, error = %err, "skipping regional alert table");
                continue;
            }
        };
        for row in rows {
            if alerts.iter().any(|a| a.alert.issued_to == row.issued_to) {
                continue;
            }
            alerts.push(SourcedAlert {
                alert: VolcanoAlert {
                    issued_to: row.issued_to,
                    issued_at: None,
                    classification: classify_alert(&row.keyword),
                    raw: RawAlert {
                        keyword: row.keyword,
                        code: None,
                        info: None,
                    },
                },
                stamped,
            });
        }
    }

    Ok(alerts)
}

/// Appends novel alerts to the matched records' histories. Pure cache
/// mutation; returns the positions of records that actually changed.
///
/// Matching is two-tier: exact name equality first, then
/// `issued_to.contains(name)` for the rows that print a longer display
/// name. Unmatched alerts are skipped. An alert that duplicates any history
/// entry (content-equal excluding `issued_at`) is discarded.
#[must_use]
pub fn merge_alerts(records: &mut [VolcanoRecord], alerts: &[SourcedAlert]) -> Vec<usize> {
    let mut changed = Vec::new();

    for sourced in alerts {
        let issued_to = &sourced.alert.issued_to;
        let position = records
            .iter()
            .position(|r| r.name == *issued_to)
            .or_else(|| {
                records
                    .iter()
                    .position(|r| !r.name.is_empty() && issued_to.contains(&r.name))
            });
        let Some(position) = position else {
            tracing::debug!(issued_to, "alert matches no cached volcano");
            continue;
        };

        let record = &mut records[position];
        match &mut record.alerts {
            None => {
                record.alerts = Some(AlertHistory {
                    entries: vec![sourced.alert.clone()],
                    last_update: sourced.stamped,
                });
            }
            Some(history) => {
                if history
                    .entries
                    .iter()
                    .any(|existing| existing.is_duplicate_of(&sourced.alert))
                {
                    continue;
                }
                history.entries.push(sourced.alert.clone());
                history.last_update = sourced.stamped;
            }
        }
        tracing::info!(name = %record.name, keyword = %sourced.alert.raw.keyword, "alert recorded");
        if !changed.contains(&position) {
            changed.push(position);
        }
    }

    changed
}

#[cfg(test)]
#[path = "volcano_test.rs"]
mod tests;
