use thiserror::Error;

use geowatch_scraper::ScraperError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    /// Bootstrap could not fetch a single regional map page, so there is
    /// nothing to build a cache from.
    #[error("no regional map page could be fetched")]
    NoRegionalMaps,
}
