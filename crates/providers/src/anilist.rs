//! AniList GraphQL client.
//!
//! Supplies banner/cover artwork and episode thumbnails. Episode numbers are
//! not first-class in the API; they are recovered from the streaming-episode
//! titles (`"Episode 12 - ..."`).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::source::AnilistSource;
use crate::{AnilistEpisode, AnilistShow, ProviderError};

const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

const SHOW_QUERY: &str = "\
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    bannerImage
    coverImage { extraLarge }
  }
}";

const EPISODES_QUERY: &str = "\
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    streamingEpisodes { title thumbnail }
  }
}";

static RE_EPISODE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)episode\s+(\d+)").unwrap());

pub struct AnilistClient {
    endpoint: String,
    client: reqwest::Client,
}

impl AnilistClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn query(
        &self,
        query: &str,
        id: u32,
    ) -> Result<serde_json::Value, ProviderError> {
        debug!(endpoint = %self.endpoint, id, "anilist request");

        let body = serde_json::json!({
            "query": query,
            "variables": { "id": id },
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Provider(format!(
                "anilist returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| ProviderError::Provider(format!("parse JSON: {e}")))
    }
}

impl Default for AnilistClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AnilistSource for AnilistClient {
    async fn show(&self, anilist_id: u32) -> Result<AnilistShow, ProviderError> {
        let data = self.query(SHOW_QUERY, anilist_id).await?;
        Ok(parse_show(&data["data"]["Media"]))
    }

    async fn episodes(&self, anilist_id: u32) -> Result<Vec<AnilistEpisode>, ProviderError> {
        let data = self.query(EPISODES_QUERY, anilist_id).await?;
        Ok(parse_episodes(&data["data"]["Media"]["streamingEpisodes"]))
    }
}

fn parse_show(media: &serde_json::Value) -> AnilistShow {
    AnilistShow {
        banner_url: media["bannerImage"].as_str().map(|s| s.to_string()),
        cover_url: media["coverImage"]["extraLarge"]
            .as_str()
            .map(|s| s.to_string()),
    }
}

fn parse_episodes(episodes: &serde_json::Value) -> Vec<AnilistEpisode> {
    episodes
        .as_array()
        .map(|eps| {
            eps.iter()
                .filter_map(|ep| {
                    let number = episode_number(ep["title"].as_str()?)?;
                    Some(AnilistEpisode {
                        number,
                        thumbnail_url: ep["thumbnail"].as_str().map(|s| s.to_string()),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn episode_number(title: &str) -> Option<u32> {
    RE_EPISODE_NUMBER
        .captures(title)
        .and_then(|c| c[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_show_from_json() {
        let json = serde_json::json!({
            "bannerImage": "https://cdn.example/banner.jpg",
            "coverImage": { "extraLarge": "https://cdn.example/cover-xl.jpg" }
        });

        let show = parse_show(&json);
        assert_eq!(show.banner_url.as_deref(), Some("https://cdn.example/banner.jpg"));
        assert_eq!(show.cover_url.as_deref(), Some("https://cdn.example/cover-xl.jpg"));
    }

    #[test]
    fn episode_numbers_come_from_titles() {
        let json = serde_json::json!([
            { "title": "Episode 1 - I'm Luffy!", "thumbnail": "https://cdn.example/1.jpg" },
            { "title": "Episode 12 - Clash!", "thumbnail": "https://cdn.example/12.jpg" },
            { "title": "Recap Special", "thumbnail": "https://cdn.example/sp.jpg" }
        ]);

        let episodes = parse_episodes(&json);
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].number, 1);
        assert_eq!(episodes[1].number, 12);
    }
}
