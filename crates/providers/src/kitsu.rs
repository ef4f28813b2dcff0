//! Kitsu client.
//!
//! Only used for cover artwork; shows are looked up through Kitsu's mapping
//! index by their MyAnimeList id.

use tracing::debug;

use crate::source::KitsuSource;
use crate::{KitsuShow, ProviderError};

const DEFAULT_BASE_URL: &str = "https://kitsu.io/api/edge";

pub struct KitsuClient {
    base_url: String,
    client: reqwest::Client,
}

impl KitsuClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for KitsuClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl KitsuSource for KitsuClient {
    async fn show_by_mal(&self, mal_id: u32) -> Result<KitsuShow, ProviderError> {
        let url = format!("{}/mappings", self.base_url);
        debug!(url = %url, mal_id, "kitsu request");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("filter[externalSite]", "myanimelist/anime".to_string()),
                ("filter[externalId]", mal_id.to_string()),
                ("include", "item".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Provider(format!(
                "kitsu returned {}",
                resp.status()
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Provider(format!("parse JSON: {e}")))?;

        parse_mapping(&data).ok_or(ProviderError::NotFound)
    }
}

fn parse_mapping(data: &serde_json::Value) -> Option<KitsuShow> {
    let item = data["included"].as_array()?.first()?;
    Some(KitsuShow {
        cover_url: item["attributes"]["coverImage"]["original"]
            .as_str()
            .map(|s| s.to_string()),
    })
}
