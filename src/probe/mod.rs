//! HTTP probe
//!
//! Fetches one page and reports how often a marker string appears in it. A single
//! async implementation backs every caller: the shared `reqwest::Client` is safe to
//! use concurrently, so no lock is taken around requests.
//!
//! # Example
//!
//! ```no_run
//! use blueprint::probe::HttpProbe;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let probe = HttpProbe::new(
//!     "http://www.dotnetfoundation.org/",
//!     ".NET",
//!     Duration::from_secs(30),
//! )?;
//! println!("{}", probe.probe().await?);
//! # Ok(())
//! # }
//! ```

pub mod source;

pub use source::{PageSource, ReqwestSource};

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_PROBE_URL: &str = "http://www.dotnetfoundation.org/";
pub const DEFAULT_NEEDLE: &str = ".NET";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid probe URL '{0}'")]
    InvalidUrl(String),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub struct HttpProbe<S = ReqwestSource> {
    source: S,
    url: Url,
    needle: String,
}

impl HttpProbe<ReqwestSource> {
    /// Creates a probe backed by a real HTTP client
    pub fn new(url: &str, needle: &str, timeout: Duration) -> Result<Self, ProbeError> {
        Self::with_source(ReqwestSource::new(timeout)?, url, needle)
    }
}

impl<S: PageSource> HttpProbe<S> {
    pub fn with_source(source: S, url: &str, needle: &str) -> Result<Self, ProbeError> {
        let url = Url::parse(url).map_err(|_| ProbeError::InvalidUrl(url.to_string()))?;
        if url.host_str().is_none() {
            return Err(ProbeError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            source,
            url,
            needle: needle.to_string(),
        })
    }

    /// Number of times the marker appears in the page
    pub async fn count(&self) -> Result<usize, ProbeError> {
        let body = self.source.fetch(&self.url).await?;
        let count = count_occurrences(&body, &self.needle);
        debug!(url = %self.url, bytes = body.len(), count, "Fetched probe page");
        Ok(count)
    }

    /// Fetches the page and returns the summary message
    pub async fn probe(&self) -> Result<String, ProbeError> {
        let count = self.count().await?;
        let host = self.url.host_str().unwrap_or_default();
        let message = format_message(host, &self.needle, count);
        info!(url = %self.url, count, "Probe finished");
        Ok(message)
    }
}

/// Literal, non-overlapping occurrences of `needle` in `body`
pub fn count_occurrences(body: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    body.matches(needle).count()
}

pub fn format_message(host: &str, needle: &str, count: usize) -> String {
    format!("{} mentions {} {} times in its HTML!", host, needle, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedPage(&'static str);

    #[async_trait]
    impl PageSource for FixedPage {
        async fn fetch(&self, _url: &Url) -> Result<String, ProbeError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_count_is_literal() {
        assert_eq!(count_occurrences("ASP.NET and .NET Core, not xNET", ".NET"), 2);
        assert_eq!(count_occurrences("", ".NET"), 0);
        assert_eq!(count_occurrences("anything", ""), 0);
    }

    #[test]
    fn test_count_is_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
    }

    #[tokio::test]
    async fn test_probe_message_with_fixed_body() {
        let body = "<h1>.NET Foundation</h1><p>.NET is free. .NET is open.</p>";
        let probe =
            HttpProbe::with_source(FixedPage(body), DEFAULT_PROBE_URL, DEFAULT_NEEDLE).unwrap();

        let message = probe.probe().await.unwrap();
        assert_eq!(
            message,
            "www.dotnetfoundation.org mentions .NET 3 times in its HTML!"
        );
    }

    #[test]
    fn test_invalid_url() {
        let result = HttpProbe::with_source(FixedPage(""), "not a url", DEFAULT_NEEDLE);
        assert!(matches!(result, Err(ProbeError::InvalidUrl(_))));
    }
}
