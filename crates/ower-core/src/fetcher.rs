//! Upstream retrieval of career pages.
//!
//! [`Fetcher`] appends the percent-encoded tag to the configured career base URL
//! and treats any non-success status as an [`Error::Network`] failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::{Error, Result};

/// Something that can produce the raw career page for a player tag.
///
/// [`Fetcher`] is the network implementation; the cache coordinator only
/// depends on this trait.
#[async_trait]
pub trait DocumentSource: Send + Sync + 'static {
    /// Retrieve the current document for `tag`.
    async fn fetch_document(&self, tag: &str) -> Result<String>;
}

/// HTTP client for career pages
pub struct Fetcher {
    client: Client,
    base: Url,
}

impl Fetcher {
    /// Creates a fetcher for the given career page base URL
    pub fn new(base: &str) -> Result<Self> {
        Self::with_timeout(base, Duration::from_secs(30))
    }

    /// Creates a fetcher with a custom request timeout
    pub fn with_timeout(base: &str, timeout: Duration) -> Result<Self> {
        let base = parse_base(base)?;
        let client = build_client(timeout)?;
        Ok(Self { client, base })
    }

    /// Career page URL for `tag`: the base plus the percent-encoded tag and a trailing slash
    pub fn profile_url(&self, tag: &str) -> Result<Url> {
        join_segment(&self.base, tag)
    }

    /// Fetches a URL and returns its body, mapping non-success statuses to errors
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                debug!("Upstream returned 404 for {}", url);
            }
            return match response.error_for_status() {
                Ok(_) => Err(Error::Other(format!("Unexpected status {status} from {url}"))),
                Err(err) => Err(Error::Network(err)),
            };
        }

        let content = response.text().await?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

#[async_trait]
impl DocumentSource for Fetcher {
    async fn fetch_document(&self, tag: &str) -> Result<String> {
        let url = self.profile_url(tag)?;
        self.fetch(&url).await
    }
}

/// Parse a base URL that further path segments can be appended to.
pub(crate) fn parse_base(base: &str) -> Result<Url> {
    let url = Url::parse(base).map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(format!("{base}: cannot be used as a base URL")));
    }
    Ok(url)
}

/// `base` plus one percent-encoded path segment and a trailing slash.
pub(crate) fn join_segment(base: &Url, segment: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(format!("{base}: cannot be a base")))?
        .pop_if_empty()
        .push(segment)
        .push("");
    Ok(url)
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ower/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(Error::Network)
}
