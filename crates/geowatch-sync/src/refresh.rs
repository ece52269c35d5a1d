//! The shared conditional-refresh primitive.
//!
//! The quake index, quake details, and volcano metadata pages all follow
//! the same lifecycle: conditional fetch against the cached timestamp,
//! re-parse on fresh content, then a content-equality check that separates a
//! server-side touch (timestamp advances, nothing to report) from a real
//! change (record replaced and reported).

use chrono::{DateTime, Utc};

use geowatch_scraper::{BulletinClient, FetchOutcome, ScraperError};

use crate::error::SyncError;

/// Outcome of refreshing one cached entity against its source page.
#[derive(Debug)]
pub enum Refresh<T> {
    /// 304 — the cached copy is current.
    Unchanged,
    /// Re-fetched and parsed, but structurally equal to the cache. Carries
    /// the server time the caller should advance `last_update` to.
    Touched(DateTime<Utc>),
    /// Content differs; `value` replaces the cached entity.
    Replaced {
        value: T,
        modified: DateTime<Utc>,
    },
}

/// Refreshes one entity: conditional fetch, parse, compare.
///
/// `parse` receives the body and the url; `same` decides content equality
/// against the cached copy (excluding bookkeeping fields).
///
/// # Errors
///
/// [`SyncError::Scraper`] on fetch or parse failure.
pub async fn refresh_entity<T, P, S>(
    client: &BulletinClient,
    url: &str,
    since: DateTime<Utc>,
    parse: P,
    same: S,
) -> Result<Refresh<T>, SyncError>
where
    P: FnOnce(&str, &str) -> Result<T, ScraperError>,
    S: FnOnce(&T) -> bool,
{
    match client.fetch(url, Some(since)).await? {
        FetchOutcome::NotModified => Ok(Refresh::Unchanged),
        FetchOutcome::Fetched {
            body,
            server_last_modified,
        } => {
            let modified = server_last_modified.unwrap_or_else(Utc::now);
            let value = parse(&body, url)?;
            if same(&value) {
                Ok(Refresh::Touched(modified))
            } else {
                Ok(Refresh::Replaced { value, modified })
            }
        }
    }
}

/// Unconditional fetch that must yield content. Shared by the bootstrap
/// paths, where there is no cached timestamp to condition on.
pub(crate) async fn fetch_fresh(
    client: &BulletinClient,
    url: &str,
) -> Result<(String, DateTime<Utc>), SyncError> {
    match client.fetch(url, None).await? {
        FetchOutcome::Fetched {
            body,
            server_last_modified,
        } => Ok((body, server_last_modified.unwrap_or_else(Utc::now))),
        // The client only maps 304 to NotModified when a `since` was sent.
        FetchOutcome::NotModified => Err(ScraperError::UnexpectedStatus {
            status: 304,
            url: url.to_owned(),
        }
        .into()),
    }
}
