//! Jikan client — REST mirror of MyAnimeList.
//!
//! Supplies show-level score/poster enrichment and per-episode titles and
//! filler flags. Episode pages hold 100 entries, matching the season size
//! used by the catalog.

use tracing::debug;

use crate::source::MalSource;
use crate::{MalEpisode, MalShow, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

pub struct JikanClient {
    base_url: String,
    client: reqwest::Client,
}

impl JikanClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "jikan request");

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Provider(format!(
                "jikan returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| ProviderError::Provider(format!("parse JSON: {e}")))
    }
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MalSource for JikanClient {
    async fn show(&self, mal_id: u32) -> Result<MalShow, ProviderError> {
        let data = self.get_json(&format!("/anime/{mal_id}"), &[]).await?;
        Ok(parse_show(&data["data"]))
    }

    async fn episodes(&self, mal_id: u32, page: u32) -> Result<Vec<MalEpisode>, ProviderError> {
        let data = self
            .get_json(
                &format!("/anime/{mal_id}/episodes"),
                &[("page", page.to_string())],
            )
            .await?;

        Ok(parse_episodes(&data["data"]))
    }
}

fn parse_show(data: &serde_json::Value) -> MalShow {
    MalShow {
        poster_url: data["images"]["jpg"]["large_image_url"]
            .as_str()
            .map(|s| s.to_string()),
        score: data["score"].as_f64().filter(|s| s.is_finite()),
    }
}

fn parse_episodes(data: &serde_json::Value) -> Vec<MalEpisode> {
    data.as_array()
        .map(|eps| {
            eps.iter()
                .filter_map(|ep| {
                    Some(MalEpisode {
                        number: ep["mal_id"].as_u64()? as u32,
                        title: ep["title"].as_str().map(|s| s.to_string()),
                        filler: ep["filler"].as_bool(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
