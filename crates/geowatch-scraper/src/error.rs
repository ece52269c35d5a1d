use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// Network or TLS failure. Fatal to the single entity being fetched,
    /// never to the whole run.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any non-2xx status that is not a 304 answer to a conditional fetch.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// An expected table or element is missing — the source layout changed.
    /// Carries the offending URL and a payload snippet for diagnosis; a
    /// silent misparse here would corrupt the cache.
    #[error("unexpected page shape at {url}: {detail}")]
    PageShape {
        url: String,
        detail: String,
        /// Truncated raw payload for diagnosis.
        payload: String,
    },

    /// A field matched structurally but its value did not convert.
    #[error("unparsable {field} value {value:?} at {url}")]
    FieldFormat {
        url: String,
        field: &'static str,
        value: String,
    },
}

impl ScraperError {
    /// Builds a [`ScraperError::PageShape`] with the payload truncated to a
    /// diagnosable snippet.
    pub(crate) fn shape(url: &str, detail: impl Into<String>, payload: &str) -> Self {
        Self::PageShape {
            url: url.to_owned(),
            detail: detail.into(),
            payload: payload.chars().take(2048).collect(),
        }
    }
}
