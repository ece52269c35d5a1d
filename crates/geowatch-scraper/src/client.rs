use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;

use geowatch_core::Area;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Result of a conditional fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Fresh content. `server_last_modified` is the parsed `Last-Modified`
    /// response header when the server sent one.
    Fetched {
        body: String,
        server_last_modified: Option<DateTime<Utc>>,
    },
    /// The server answered 304 to an `If-Modified-Since` request; the cached
    /// copy is still current.
    NotModified,
}

/// URL builders for the bulletin page families, rooted at a configurable
/// base so tests can point them at a local server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    root: String,
}

impl Endpoints {
    /// The production bulletin host.
    pub const DEFAULT_ROOT: &'static str = "https://www.jma.go.jp";

    #[must_use]
    pub fn new(root: &str) -> Self {
        Self {
            root: root.trim_end_matches('/').to_owned(),
        }
    }

    /// The earthquake index page listing recent events.
    #[must_use]
    pub fn quake_index(&self) -> String {
        format!("{}/en/quake/quake_singendo_index.html", self.root)
    }

    /// A single earthquake's detail page.
    #[must_use]
    pub fn quake_detail(&self, id: &str) -> String {
        format!("{}/en/quake/{id}.html", self.root)
    }

    /// The volcano map page for an area: the aggregate index for
    /// [`Area::Global`], `map_N.html` for the regions.
    #[must_use]
    pub fn volcano_map(&self, area: Area) -> String {
        match area {
            Area::Global => format!("{}/en/volcano", self.root),
            region => format!("{}/en/volcano/map_{}.html", self.root, region.index()),
        }
    }

    /// A per-volcano info page linked from the aggregate alert table.
    /// `relative` is the href exactly as printed in the table.
    #[must_use]
    pub fn volcano_info(&self, relative: &str) -> String {
        format!("{}/en/volcano/{relative}", self.root)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}

/// HTTP client for the bulletin pages.
///
/// Implements the conditional fetch contract: callers pass the timestamp of
/// their cached copy and get either fresh content or
/// [`FetchOutcome::NotModified`]. Transient transport failures are retried
/// with exponential backoff before surfacing.
pub struct BulletinClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl BulletinClient {
    /// Creates a client with configured timeout, `User-Agent`, and retry
    /// policy. `max_retries` is the number of additional attempts after the
    /// first failure; `0` disables retries.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches `url`, conditionally when `since` is supplied.
    ///
    /// With `since`, an `If-Modified-Since` header is sent and a 304 answer
    /// maps to [`FetchOutcome::NotModified`]. A 304 without `since` is a
    /// protocol violation and reported as [`ScraperError::UnexpectedStatus`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Transport`] — network failure after all retries.
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status.
    pub async fn fetch(
        &self,
        url: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<FetchOutcome, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async {
            let mut request = self.client.get(url);
            if let Some(since) = since {
                request = request.header(
                    reqwest::header::IF_MODIFIED_SINCE,
                    format_http_date(since),
                );
            }

            let response = request.send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::NOT_MODIFIED {
                if since.is_some() {
                    tracing::debug!(url, "not modified");
                    return Ok(FetchOutcome::NotModified);
                }
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            // Read the header before consuming the response body.
            let server_last_modified = response
                .headers()
                .get(reqwest::header::LAST_MODIFIED)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_http_date);

            let body = response.text().await?;
            tracing::debug!(url, bytes = body.len(), "fetched");

            Ok(FetchOutcome::Fetched {
                body,
                server_last_modified,
            })
        })
        .await
    }
}

/// Renders an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`) for the
/// `If-Modified-Since` header.
fn format_http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses a `Last-Modified` header value. RFC 2822 parsing covers the
/// IMF-fixdate form the source emits; unparsable values are dropped rather
/// than failing the fetch.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
