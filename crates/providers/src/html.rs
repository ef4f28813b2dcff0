//! Thin HTML document fetcher for embedded-player pages.

use tracing::debug;
use url::Url;

use crate::ProviderError;

const DEFAULT_REFERER: &str = "https://www.google.it/";

pub struct DocumentFetcher {
    client: reqwest::Client,
}

impl DocumentFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch a page as raw HTML. Fails on any non-2xx status.
    pub async fn fetch(&self, url: &Url, referer: Option<&str>) -> Result<String, ProviderError> {
        debug!(url = %url, "fetching html document");

        let resp = self
            .client
            .get(url.clone())
            .header("Accept", "text/html, application/xhtml+xml")
            .header("Accept-Language", "it-IT,it;q=0.9,en-US;q=0.8,en;q=0.7")
            .header("Referer", referer.unwrap_or(DEFAULT_REFERER))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Provider(format!(
                "fetch {url} returned {}",
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))
    }
}

impl Default for DocumentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::source::DocumentSource for DocumentFetcher {
    async fn fetch(&self, url: &Url, referer: Option<&str>) -> Result<String, ProviderError> {
        DocumentFetcher::fetch(self, url, referer).await
    }
}
