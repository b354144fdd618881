//! Network access to the document context.
//!
//! `PageFetcher` is the seam between the pipeline and the outside world: the
//! production implementation goes over HTTP, tests swap in canned pages.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, warn};
use url::Url;

use crate::error::ExtractError;

/// Default bound on how long a fetch may suspend.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the rendered document for a page address.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw HTML behind `url`.
    ///
    /// Any failure to reach the document (DNS, refused connection, timeout,
    /// non-success status) is `ExtractError::ContextUnavailable`.
    async fn fetch(&self, url: &Url) -> Result<String, ExtractError>;
}

/// HTTP fetcher with browser-like request headers.
///
/// The target site serves different (and sometimes empty) markup to obvious
/// bots, so the client presents a desktop browser profile.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ExtractError> {
        debug!(url = %url, "fetching document");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "document fetch failed");
            ExtractError::ContextUnavailable(Box::new(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "document fetch returned error status");
            return Err(ExtractError::ContextUnavailable(
                format!("HTTP {status} fetching {url}").into(),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| ExtractError::ContextUnavailable(Box::new(e)))
    }
}

/// Canned-page fetcher for tests.
///
/// Pages are keyed by URL; fetching an unknown URL behaves like an
/// unreachable context. Call counts are tracked for verification.
#[derive(Default, Clone)]
pub struct MockPageFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned page (builder pattern).
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ExtractError> {
        self.calls.write().unwrap().push(url.to_string());
        self.pages
            .read()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| {
                ExtractError::ContextUnavailable(format!("no canned page for {url}").into())
            })
    }
}
